//! autoload - directory plugin auto-loader
//!
//! Discovers every eligible file in a configured directory and loads it
//! under one of two module-loading conventions, reporting per-file
//! success/failure without aborting on individual errors.
//!
//! ## Conventions
//!
//! - **in-process**: the candidate is a shared library opened with
//!   `libloading` and validated against its declared ABI revision
//! - **spawned**: the candidate is a module executable run to completion as
//!   a child process, its output captured as the loaded unit
//!
//! Which convention applies is pinned per loader instance (`set_variant`),
//! forced by extension (`.so` is always in-process, `.bin` is always
//! spawned), or, for `.module` descriptors, taken from the cached variant.
//! `.json` data files are admitted per call via [`LoadOptions::allow_data`].
//!
//! ## Example
//!
//! ```no_run
//! use autoload::{AutoLoader, LoadOptions, Variant};
//! use std::path::Path;
//!
//! # async fn run() -> Result<(), autoload::LoaderError> {
//! let mut loader = AutoLoader::new(Some(Path::new("/opt/plugins")));
//! loader.set_variant(Variant::Spawned);
//!
//! let mut units = Vec::new();
//! let result = loader
//!     .load(|unit| units.push(unit), Some(LoadOptions::new().allow_data(true)))
//!     .await?;
//! println!("{} loaded, {} failed", result.loaded_count, result.failed_count);
//! # Ok(())
//! # }
//! ```

pub mod allow;
pub mod error;
pub mod ident;
pub mod loader;
pub mod manifest;
pub mod options;
pub mod result;
pub mod scan;
pub mod strategy;
pub mod variant;

pub use allow::AllowList;
pub use error::LoaderError;
pub use loader::AutoLoader;
pub use manifest::ModuleDescriptor;
pub use options::LoadOptions;
pub use result::{FailedLoad, LoadResult};
pub use strategy::{
    LoadedLibrary, LoadedUnit, ModuleOutput, AUTOLOAD_ABI_SYMBOL, AUTOLOAD_ABI_VERSION,
};
pub use variant::Variant;
