//! Road-sign replacement engine.
//!
//! This crate swaps placed road signs for alternates drawn from named packs
//! and reverts them to the originals later, without losing track of the
//! rotation offsets applied along the way. It provides:
//!
//! - **Catalog building**: split raw packs by category, drop rules whose
//!   workshop source is unavailable, prepend the built-in `"Vanilla"` packs
//! - **The apply pass**: one synchronous walk over every placed item,
//!   reverting superseded rules before applying the new selection
//! - **Selection state**: which pack is live per category, and which rule
//!   currently governs each original sign name
//! - **Settings persistence**: the two selected pack names, restored by
//!   name at startup
//!
//! The world is reached through trait seams ([`world::ItemSource`],
//! [`world::NameResolver`]); the crate ships a serde-backed
//! [`world::SnapshotWorld`] for tooling and tests.
//!
//! # Example
//!
//! ```
//! use signpack_engine::{Catalog, ReplacementEngine};
//! use signpack_engine::world::{AssetIndex, SnapshotItem, SnapshotWorld};
//! use signpack_model::{Pack, Rule};
//!
//! let packs = vec![Pack::new(
//!     "Alpha",
//!     vec![Rule::new("Stop Sign", "alpha.StopSignV2", 15.0)],
//! )];
//! let catalog = Catalog::build(&packs, &|_: &str| true);
//! let mut engine = ReplacementEngine::new(catalog);
//!
//! let mut world = SnapshotWorld {
//!     items: vec![SnapshotItem {
//!         primary: Some("Stop Sign".into()),
//!         variant: None,
//!         rotation: 90.0,
//!     }],
//!     assets: AssetIndex::new(
//!         ["Stop Sign".to_string(), "alpha.StopSignV2".to_string()],
//!     ),
//! };
//!
//! let report = engine.apply_by_name(&mut world.items, &world.assets, Some("Alpha"), None);
//! assert_eq!(world.items[0].primary.as_deref(), Some("alpha.StopSignV2"));
//! assert_eq!(world.items[0].rotation, 105.0);
//! assert!(!report.is_noop());
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod registry;
pub mod settings;
pub mod state;
pub mod world;

// Re-export main types
pub use catalog::Catalog;
pub use engine::{ApplyReport, ReplacementEngine};
pub use error::{Error, Result};
pub use settings::{selection_from_settings, Settings};
pub use state::SelectionState;
