//! Persisted pack selections.
//!
//! Two scalar fields survive between sessions: the selected sign pack name
//! and the selected speed pack name. They are written after a successful
//! category commit and read at startup to re-select the same packs by exact
//! name match against the catalog. `"Vanilla"` or an absent field means the
//! identity pack; a name no longer present in the catalog falls back to no
//! selection with a warning.

use crate::catalog::Catalog;
use crate::error::Result;
use crate::registry::VANILLA_PACK_NAME;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use signpack_model::{Category, Pack};

/// The persisted settings file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_pack_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_pack_name: Option<String>,
}

impl Settings {
    /// Load settings from disk, returning defaults if the file doesn't
    /// exist or cannot be parsed.
    pub fn load(path: &Utf8Path) -> Self {
        if !path.as_std_path().exists() {
            tracing::info!("settings file not found, using defaults");
            return Self::default();
        }

        match std::fs::read_to_string(path.as_std_path()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::error!("failed to parse settings file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("failed to read settings file: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk as pretty-printed JSON, creating parent
    /// directories if needed.
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent.as_std_path())?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_std_path(), contents)?;
        Ok(())
    }

    /// Record a committed selection for a category.
    pub fn record(&mut self, category: Category, pack_name: impl Into<String>) {
        let name = Some(pack_name.into());
        match category {
            Category::Speed => self.speed_pack_name = name,
            Category::General => self.sign_pack_name = name,
        }
    }

    /// The persisted selection for a category, if any.
    pub fn selection(&self, category: Category) -> Option<&str> {
        match category {
            Category::Speed => self.speed_pack_name.as_deref(),
            Category::General => self.sign_pack_name.as_deref(),
        }
    }
}

/// Map persisted pack names onto catalog packs for a startup re-apply.
///
/// Absent fields select the identity pack (a no-op against a fresh engine);
/// a stale name yields no selection for that category and a warning.
pub fn selection_from_settings<'c>(
    catalog: &'c Catalog,
    settings: &Settings,
) -> (Option<&'c Pack>, Option<&'c Pack>) {
    let resolve = |category: Category| -> Option<&'c Pack> {
        let name = settings.selection(category).unwrap_or(VANILLA_PACK_NAME);
        match catalog.find(category, name) {
            Some(pack) => Some(pack),
            None => {
                tracing::warn!(
                    "saved {} pack '{}' is not in the catalog, leaving selection unset",
                    category,
                    name
                );
                None
            }
        }
    };

    (resolve(Category::General), resolve(Category::Speed))
}
