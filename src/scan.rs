//! Directory scanning and candidate filtering

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::allow::AllowList;
use crate::error::LoaderError;

/// Lists `dir` non-recursively and keeps entries whose dot-extension is on
/// the allow-list. Ordering follows the underlying directory listing, which
/// is platform-dependent; callers must not rely on it being stable.
pub fn candidates(dir: &Path, allow: &AllowList) -> Result<Vec<PathBuf>, LoaderError> {
    let entries = fs::read_dir(dir).map_err(|source| LoaderError::ScanFailed {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if let Some(ext) = dot_extension(&path) {
            if allow.contains(&ext) {
                found.push(path);
            }
        }
    }
    Ok(found)
}

/// Extension including the leading dot. Matching is case-sensitive.
pub(crate) fn dot_extension(path: &Path) -> Option<String> {
    path.extension().map(|e| format!(".{}", e.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_only_allowed_extensions_become_candidates() {
        let dir = TempDir::new().unwrap();
        for name in ["a.so", "b.bin", "c.module", "d.json", "e.txt", "f"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let allow = AllowList::new();
        let found = candidates(dir.path(), &allow).unwrap();
        let names: HashSet<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            names,
            HashSet::from(["a.so".to_string(), "b.bin".to_string(), "c.module".to_string()])
        );
    }

    #[test]
    fn test_data_extension_requires_allow() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("d.json"), b"{}").unwrap();

        let mut allow = AllowList::new();
        assert!(candidates(dir.path(), &allow).unwrap().is_empty());

        allow.set_data_allowed(true);
        assert_eq!(candidates(dir.path(), &allow).unwrap().len(), 1);
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("a.so"), b"x").unwrap();

        let allow = AllowList::new();
        assert!(candidates(dir.path(), &allow).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone");
        let allow = AllowList::new();
        assert!(matches!(
            candidates(&gone, &allow),
            Err(LoaderError::ScanFailed { .. })
        ));
    }

    #[test]
    fn test_dot_extension() {
        assert_eq!(dot_extension(Path::new("/m/a.so")), Some(".so".to_string()));
        assert_eq!(dot_extension(Path::new("/m/a")), None);
        assert_eq!(
            dot_extension(Path::new("/m/archive.tar.json")),
            Some(".json".to_string())
        );
    }
}
