//! Load strategies
//!
//! One mechanism per recognized extension: data files are parsed, plugin
//! libraries are opened in-process, module executables are spawned and run
//! to completion, and descriptors dispatch their entry point under the
//! cached variant.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use libloading::Library;
use tokio::process::Command;
use tracing::debug;

use crate::allow::DATA_EXTENSION;
use crate::error::LoaderError;
use crate::manifest::ModuleDescriptor;
use crate::variant::Variant;

/// ABI revision in-process plugin libraries must declare.
pub const AUTOLOAD_ABI_VERSION: u32 = 1;

/// Name of the `u32` symbol a plugin library exports to declare its ABI
/// revision, e.g. `#[no_mangle] pub static AUTOLOAD_ABI: u32 = 1;`.
pub const AUTOLOAD_ABI_SYMBOL: &[u8] = b"AUTOLOAD_ABI\0";

/// The value produced by successfully loading one candidate.
#[derive(Debug)]
pub enum LoadedUnit {
    /// Parsed content of a data file.
    Data(serde_json::Value),
    /// An open in-process plugin library.
    Library(LoadedLibrary),
    /// Captured run of a spawned module executable.
    Output(ModuleOutput),
}

impl LoadedUnit {
    /// Empty units are recorded as loaded but not handed to the callback.
    pub fn is_empty(&self) -> bool {
        match self {
            LoadedUnit::Data(value) => match value {
                serde_json::Value::Null => true,
                serde_json::Value::Bool(b) => !b,
                serde_json::Value::String(s) => s.is_empty(),
                serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
                _ => false,
            },
            LoadedUnit::Library(_) => false,
            LoadedUnit::Output(output) => output.stdout.is_empty(),
        }
    }
}

/// In-process plugin kept alive for the host. Dropping the last clone
/// unloads the library.
#[derive(Debug, Clone)]
pub struct LoadedLibrary {
    /// Name derived from the file stem.
    pub name: String,
    /// ABI revision the plugin declared.
    pub abi_version: u32,
    pub library: Arc<Library>,
}

/// Exit status and captured stdout of a spawned module run.
#[derive(Debug, Clone)]
pub struct ModuleOutput {
    pub status: ExitStatus,
    pub stdout: String,
}

/// Selects and executes the load strategy for one candidate. `base` is the
/// configured directory, used to resolve descriptor entry points.
pub(crate) async fn load(
    path: &Path,
    ext: &str,
    variant: Variant,
    base: &Path,
) -> Result<LoadedUnit, LoaderError> {
    match ext {
        DATA_EXTENSION => load_data(path).await,
        ".so" => load_in_process(path),
        ".bin" => load_spawned(path).await,
        ".module" => load_descriptor(path, variant, base).await,
        other => Err(LoaderError::LoadFailed(format!(
            "no load strategy for extension {}",
            other
        ))),
    }
}

async fn load_data(path: &Path) -> Result<LoadedUnit, LoaderError> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        LoaderError::LoadFailed(format!("failed to read {}: {}", path.display(), e))
    })?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    Ok(LoadedUnit::Data(value))
}

/// Eager convention: map the library into the host address space and check
/// its declared ABI revision.
fn load_in_process(path: &Path) -> Result<LoadedUnit, LoaderError> {
    debug!("opening plugin library {}", path.display());
    // Safety: opening a library runs its initializers. The host trusts the
    // configured plugin directory; sandboxing loaded code is a non-goal.
    let library = unsafe { Library::new(path) }?;

    // Safety: the symbol is declared as a plain u32 static by the plugin.
    let abi_version = unsafe {
        let declaration = library.get::<*const u32>(AUTOLOAD_ABI_SYMBOL)?;
        **declaration
    };
    if abi_version != AUTOLOAD_ABI_VERSION {
        return Err(LoaderError::LoadFailed(format!(
            "{} declares ABI {}, host expects {}",
            path.display(),
            abi_version,
            AUTOLOAD_ABI_VERSION
        )));
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(LoadedUnit::Library(LoadedLibrary {
        name,
        abi_version,
        library: Arc::new(library),
    }))
}

/// Deferred convention: run the module executable to completion and capture
/// its output.
async fn load_spawned(path: &Path) -> Result<LoadedUnit, LoaderError> {
    debug!("spawning module {}", path.display());
    let output = Command::new(path)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            LoaderError::LoadFailed(format!("failed to spawn {}: {}", path.display(), e))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LoaderError::LoadFailed(format!(
            "{} exited with {}: {}",
            path.display(),
            output.status,
            stderr.trim()
        )));
    }

    Ok(LoadedUnit::Output(ModuleOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    }))
}

/// Ambiguous extension: the descriptor's entry point is loaded under the
/// cached variant's mechanism.
async fn load_descriptor(
    path: &Path,
    variant: Variant,
    base: &Path,
) -> Result<LoadedUnit, LoaderError> {
    let descriptor = ModuleDescriptor::from_file(path)?;
    let entry = descriptor.resolve_entry(base);
    match variant {
        Variant::InProcess => load_in_process(&entry),
        Variant::Spawned => load_spawned(&entry).await,
    }
}
