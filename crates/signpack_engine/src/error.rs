//! Error types for engine persistence operations.
//!
//! The replacement pass itself never fails — asset lookup misses and stale
//! selections degrade locally and are reported through `tracing` and the
//! [`ApplyReport`](crate::engine::ApplyReport). Only the file-backed pieces
//! (settings, world snapshots) return [`Result<T>`].

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or saving engine state files.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (reading or writing settings/snapshot files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize JSON (settings, world snapshot).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
