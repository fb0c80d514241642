//! Collaborator abstractions for the replacement pass.
//!
//! This module defines the trait seams that decouple the engine from any
//! particular game integration:
//!
//! - [`ItemSource`] — enumerates the full working set of placeable items
//! - [`PlacedItem`] — one item: a rotation plus ordered asset slots
//! - [`NameResolver`] — resolves asset identifiers to loaded handles
//! - [`SubscriptionCheck`] — availability predicate for workshop prefixes
//!
//! The crate ships [`SnapshotWorld`], a serde-backed in-memory world used by
//! the `sign-swap` CLI and the engine tests. In-game integrations implement
//! the same traits over the live object graph.

use crate::error::Result;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Handle to a loaded asset, as returned by a [`NameResolver`].
///
/// Carries the canonical identifier of the loaded asset. Assigning a handle
/// to a slot stores that identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHandle(String);

impl AssetHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Resolves an asset identifier to a loaded handle.
///
/// Absence is expected and non-fatal: a rule referencing an asset that is
/// not currently loaded simply does not fire for that slot.
pub trait NameResolver {
    fn resolve(&self, name: &str) -> Option<AssetHandle>;
}

/// Availability predicate for workshop prefixes, consulted once per rule at
/// catalog build time. Rules whose replacement references an unavailable
/// prefix are dropped silently.
pub trait SubscriptionCheck {
    fn is_available(&self, prefix: &str) -> bool;
}

impl<F> SubscriptionCheck for F
where
    F: Fn(&str) -> bool,
{
    fn is_available(&self, prefix: &str) -> bool {
        self(prefix)
    }
}

/// One placeable item in the world: a mutable rotation plus an ordered set
/// of independently replaceable asset slots (e.g. primary and variant).
///
/// A slot may be empty ([`slot_asset`](Self::slot_asset) returns `None`);
/// empty slots are skipped by the pass.
pub trait PlacedItem {
    /// Current rotation in degrees.
    fn rotation(&self) -> f32;

    /// Commit a composed rotation. Called at most once per slot per pass.
    fn set_rotation(&mut self, degrees: f32);

    /// Number of asset slots this item carries.
    fn slot_count(&self) -> usize;

    /// Current asset identifier in the given slot, if the slot is occupied.
    fn slot_asset(&self, slot: usize) -> Option<&str>;

    /// Point the given slot at a resolved asset.
    fn set_slot_asset(&mut self, slot: usize, asset: &AssetHandle);
}

/// Enumerates the full current working set of placeable items.
///
/// The engine performs exactly one full pass per apply invocation and never
/// revisits an earlier item, so implementations only need forward iteration.
pub trait ItemSource {
    fn visit_items(&mut self, visit: &mut dyn FnMut(&mut dyn PlacedItem));
}

/// A serialized placeable item with the two slots road props carry in-game:
/// a primary asset and an optional final/variant asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    #[serde(default)]
    pub rotation: f32,
}

impl PlacedItem for SnapshotItem {
    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }

    fn slot_count(&self) -> usize {
        2
    }

    fn slot_asset(&self, slot: usize) -> Option<&str> {
        match slot {
            0 => self.primary.as_deref(),
            1 => self.variant.as_deref(),
            _ => None,
        }
    }

    fn set_slot_asset(&mut self, slot: usize, asset: &AssetHandle) {
        let value = Some(asset.name().to_string());
        match slot {
            0 => self.primary = value,
            1 => self.variant = value,
            _ => {}
        }
    }
}

impl ItemSource for Vec<SnapshotItem> {
    fn visit_items(&mut self, visit: &mut dyn FnMut(&mut dyn PlacedItem)) {
        for item in self.iter_mut() {
            visit(item);
        }
    }
}

/// The set of asset identifiers currently loaded in a snapshot world.
///
/// Doubles as the name resolver (membership lookup) and the subscription
/// check: a workshop prefix is available iff some loaded asset bears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AssetIndex {
    loaded: BTreeSet<String>,
}

impl AssetIndex {
    pub fn new(loaded: impl IntoIterator<Item = String>) -> Self {
        Self {
            loaded: loaded.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.loaded.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }
}

impl NameResolver for AssetIndex {
    fn resolve(&self, name: &str) -> Option<AssetHandle> {
        self.loaded.get(name).map(AssetHandle::new)
    }
}

impl SubscriptionCheck for AssetIndex {
    fn is_available(&self, prefix: &str) -> bool {
        let needle = format!("{prefix}.");
        self.loaded.iter().any(|name| name.starts_with(&needle))
    }
}

/// A complete serialized world: placed items plus the loaded-asset index.
///
/// The item list and the asset index are separate fields so a caller can
/// hand the engine a mutable [`ItemSource`] and a shared [`NameResolver`]
/// from the same world at the same time.
///
/// # JSON format
///
/// ```json
/// {
///   "items": [
///     { "primary": "Stop Sign", "rotation": 90.0 }
///   ],
///   "loadedAssets": ["Stop Sign", "alpha.StopSignV2"]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotWorld {
    #[serde(default)]
    pub items: Vec<SnapshotItem>,

    #[serde(default, rename = "loadedAssets")]
    pub assets: AssetIndex,
}

impl SnapshotWorld {
    /// Load a snapshot world from a JSON file.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_std_path())?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save the snapshot world as pretty-printed JSON, creating parent
    /// directories if needed.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent.as_std_path())?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_std_path(), contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use tempfile::tempdir;

    fn sample_world() -> SnapshotWorld {
        SnapshotWorld {
            items: vec![
                SnapshotItem {
                    primary: Some("Stop Sign".to_string()),
                    variant: None,
                    rotation: 90.0,
                },
                SnapshotItem {
                    primary: Some("30 Speed Limit".to_string()),
                    variant: Some("Street Name Sign".to_string()),
                    rotation: 0.0,
                },
            ],
            assets: AssetIndex::new(
                ["Stop Sign", "30 Speed Limit", "Street Name Sign", "alpha.StopSignV2"]
                    .map(String::from),
            ),
        }
    }

    #[test]
    fn test_resolve_loaded_asset() {
        let world = sample_world();
        let handle = world.assets.resolve("Stop Sign").unwrap();
        assert_eq!(handle.name(), "Stop Sign");
        assert!(world.assets.resolve("Ghost Sign").is_none());
    }

    #[test]
    fn test_prefix_availability() {
        let world = sample_world();
        assert!(world.assets.is_available("alpha"));
        assert!(!world.assets.is_available("beta"));
        // "alpha" must match as a prefix segment, not a substring.
        assert!(!world.assets.is_available("alp"));
    }

    #[test]
    fn test_slot_access() {
        let mut world = sample_world();
        let item = &mut world.items[1];
        assert_eq!(item.slot_count(), 2);
        assert_eq!(item.slot_asset(0), Some("30 Speed Limit"));
        assert_eq!(item.slot_asset(1), Some("Street Name Sign"));

        item.set_slot_asset(1, &AssetHandle::new("alpha.StopSignV2"));
        assert_eq!(item.slot_asset(1), Some("alpha.StopSignV2"));
    }

    #[test]
    fn test_empty_slot() {
        let world = sample_world();
        assert_eq!(world.items[0].slot_asset(1), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let std_path = dir.path().join("world.json");
        let path = Utf8Path::from_path(&std_path).unwrap();

        let world = sample_world();
        world.save(path).unwrap();

        let loaded = SnapshotWorld::load(path).unwrap();
        assert_eq!(loaded, world);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let std_path = dir.path().join("world.json");
        std::fs::write(&std_path, b"{ not json }").unwrap();
        let path = Utf8Path::from_path(&std_path).unwrap();

        assert!(SnapshotWorld::load(path).is_err());
    }

    #[test]
    fn test_serialization_format() {
        let world = sample_world();
        let json = serde_json::to_string(&world).unwrap();
        assert!(json.contains("\"loadedAssets\""));
        assert!(json.contains("\"primary\":\"Stop Sign\""));
    }
}
