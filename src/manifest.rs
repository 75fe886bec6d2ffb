//! Module descriptor parsing
//!
//! A `.module` file is a small TOML descriptor naming the entry point to
//! load. The descriptor itself is variant-agnostic: the cached variant
//! decides whether the entry point is opened in-process or spawned.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LoaderError;

/// Parsed `.module` descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDescriptor {
    /// Path of the unit to load, relative to the configured directory
    /// unless absolute.
    pub entry_point: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ModuleDescriptor {
    /// Load a descriptor from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LoaderError::InvalidDescriptor(format!(
                "failed to read descriptor {}: {}",
                path.display(),
                e
            ))
        })?;

        let descriptor: ModuleDescriptor = toml::from_str(&contents).map_err(|e| {
            LoaderError::InvalidDescriptor(format!(
                "failed to parse descriptor {}: {}",
                path.display(),
                e
            ))
        })?;

        if descriptor.entry_point.is_empty() {
            return Err(LoaderError::InvalidDescriptor(format!(
                "entry_point cannot be empty in {}",
                path.display()
            )));
        }

        Ok(descriptor)
    }

    /// Entry point resolved against the configured directory.
    pub fn resolve_entry(&self, base: &Path) -> PathBuf {
        let entry = Path::new(&self.entry_point);
        if entry.is_absolute() {
            entry.to_path_buf()
        } else {
            base.join(entry)
        }
    }
}
