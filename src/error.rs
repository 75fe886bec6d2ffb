//! Loader error taxonomy
//!
//! Only two conditions abort a whole load operation: a missing directory and
//! a failed directory listing. Everything that goes wrong with an individual
//! candidate is captured as a human-readable message in the result's failed
//! list and never propagated.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the auto-loader
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Configured directory does not exist (preflight, fatal)
    #[error("directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Directory listing failed (fatal)
    #[error("failed to read directory {}: {source}", .dir.display())]
    ScanFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `.module` descriptor could not be read, parsed, or validated
    #[error("invalid module descriptor: {0}")]
    InvalidDescriptor(String),

    /// A candidate failed to load (per-candidate, non-fatal)
    #[error("load failed: {0}")]
    LoadFailed(String),
}

impl From<serde_json::Error> for LoaderError {
    fn from(e: serde_json::Error) -> Self {
        LoaderError::LoadFailed(e.to_string())
    }
}

impl From<libloading::Error> for LoaderError {
    fn from(e: libloading::Error) -> Self {
        LoaderError::LoadFailed(e.to_string())
    }
}
