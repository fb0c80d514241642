//! Pack configuration file parsing.
//!
//! A pack file is the on-disk source of raw replacement packs: a flat,
//! ordered list of named packs, each with a flat rule list. Both JSON and
//! TOML are accepted; the format is picked by file extension. Parsing does
//! no validation beyond the shape the deserializer enforces — splitting by
//! category and dropping unavailable rules happens later, at catalog build
//! time.

use crate::Pack;
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while reading a pack configuration file.
#[derive(Error, Debug)]
pub enum PackFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported pack file extension: {0}")]
    UnsupportedExtension(String),
}

/// The raw pack configuration as loaded from disk.
///
/// # JSON format
///
/// ```json
/// {
///   "packs": [
///     {
///       "name": "Alpha",
///       "rules": [
///         { "target": "Stop Sign", "replacement": "alpha.StopSignV2", "rotation": 15.0 }
///       ]
///     }
///   ]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PackFile {
    #[serde(default)]
    pub packs: Vec<Pack>,
}

impl PackFile {
    pub fn from_json_str(contents: &str) -> Result<Self, PackFileError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, PackFileError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load a pack file, picking the parser from the file extension
    /// (`.json` or `.toml`).
    pub fn load(path: &Utf8Path) -> Result<Self, PackFileError> {
        match path.extension() {
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path.as_std_path())?),
            Some("toml") => Self::from_toml_str(&std::fs::read_to_string(path.as_std_path())?),
            other => Err(PackFileError::UnsupportedExtension(
                other.unwrap_or("").to_string(),
            )),
        }
    }
}
