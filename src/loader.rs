//! The auto-loader
//!
//! Owns one per-instance configuration (directory, cached variant,
//! allow-list) and runs the discovery-filter-load-aggregate pipeline:
//! preflight, variant resolution, directory scan, strictly sequential
//! per-candidate loading with error isolation, and result aggregation.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::allow::AllowList;
use crate::error::LoaderError;
use crate::ident;
use crate::options::{self, LoadOptions};
use crate::result::LoadResult;
use crate::scan;
use crate::strategy::{self, LoadedUnit};
use crate::variant::{self, Variant};

/// Per-instance configuration, never shared across loader instances.
#[derive(Debug)]
struct LoaderConfig {
    directory: PathBuf,
    variant: Option<Variant>,
    allow: AllowList,
    legacy_detection: bool,
}

/// Discovers and loads every eligible file in one configured directory.
///
/// Two loaders never interfere with each other: the cached variant and the
/// mutable allow-list live on the instance, not in process-global state.
/// `load` takes `&mut self`, so concurrent loads against one instance (and
/// the allow-list race they would cause) are ruled out at compile time.
pub struct AutoLoader {
    config: LoaderConfig,
}

impl AutoLoader {
    /// Creates a loader for `dir`. `None` or a relative path resolves
    /// against the process current directory. The directory does not have
    /// to exist until `load` is called.
    pub fn new(dir: Option<&Path>) -> Self {
        Self {
            config: LoaderConfig {
                directory: resolve_directory(dir),
                variant: None,
                allow: AllowList::new(),
                legacy_detection: false,
            },
        }
    }

    /// Enables the legacy backtrace heuristic as a variant-detection
    /// fallback. Unreliable; prefer `set_variant`.
    pub fn with_legacy_detection(mut self, enabled: bool) -> Self {
        self.config.legacy_detection = enabled;
        self
    }

    pub fn set_legacy_detection(&mut self, enabled: bool) {
        self.config.legacy_detection = enabled;
    }

    /// Copy of the current allow-list, before any per-call mutation.
    pub fn get_allow_list(&self) -> Vec<String> {
        self.config.allow.as_vec()
    }

    /// Current absolute configured directory.
    pub fn get_directory(&self) -> &Path {
        &self.config.directory
    }

    /// Resolves the variant if unset and caches it on the config.
    pub fn get_variant(&mut self) -> Variant {
        match self.config.variant {
            Some(variant) => variant,
            None => {
                let variant = variant::resolve(None, self.config.legacy_detection);
                self.config.variant = Some(variant);
                variant
            }
        }
    }

    /// Pins the loading convention explicitly. This is the reliable path;
    /// detection never runs for a pinned variant.
    pub fn set_variant(&mut self, variant: Variant) {
        self.config.variant = Some(variant);
    }

    /// Token form of `set_variant`, accepting the two case-insensitive
    /// tokens. Invalid or absent input triggers re-detection instead of
    /// raising an error.
    pub fn set_variant_token(&mut self, token: Option<&str>) {
        self.config.variant = Some(variant::resolve(token, self.config.legacy_detection));
    }

    /// Clears the cached variant; the next `load` or `get_variant`
    /// re-detects it.
    pub fn reset_variant(&mut self) {
        self.config.variant = None;
    }

    /// Reconfigures the directory; resolution rules match construction.
    pub fn set_directory(&mut self, dir: Option<&Path>) {
        self.config.directory = resolve_directory(dir);
    }

    /// Loads every eligible file in the configured directory, invoking
    /// `callback` with each non-empty loaded unit.
    ///
    /// Fails fast if the directory does not exist; every per-candidate
    /// failure is captured in the returned result instead of propagating.
    /// Candidates are processed strictly sequentially: a candidate's load,
    /// callback, and bookkeeping complete before the next one starts.
    pub async fn load<F>(
        &mut self,
        mut callback: F,
        options: Option<LoadOptions>,
    ) -> Result<LoadResult, LoaderError>
    where
        F: FnMut(LoadedUnit),
    {
        let check_first = options::resolve(options, &mut self.config.allow);

        if !self.config.directory.is_dir() {
            return Err(LoaderError::DirectoryNotFound(self.config.directory.clone()));
        }

        let variant = self.get_variant();
        let candidates = scan::candidates(&self.config.directory, &self.config.allow)?;
        info!(
            "loading {} candidates from {} ({})",
            candidates.len(),
            self.config.directory.display(),
            variant
        );

        let mut result = LoadResult::new();
        for path in candidates {
            let identifier = ident::identifier(&path);

            if !check_first(&identifier) {
                debug!("skipped by check_first: {}", identifier);
                continue;
            }

            let ext = scan::dot_extension(&path).unwrap_or_default();
            match strategy::load(&path, &ext, variant, &self.config.directory).await {
                Ok(unit) => {
                    if unit.is_empty() {
                        debug!("empty unit, callback skipped: {}", identifier);
                    } else {
                        callback(unit);
                    }
                    result.record_loaded(identifier);
                }
                Err(e) => {
                    warn!("failed to load {}: {}", identifier, e);
                    result.record_failed(identifier, e.to_string());
                }
            }
        }

        info!(
            "load complete: {} loaded, {} failed",
            result.loaded_count, result.failed_count
        );
        Ok(result)
    }
}

fn resolve_directory(dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) => ident::absolutize(dir),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")),
    }
}
