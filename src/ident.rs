//! Canonical loadable identifiers
//!
//! Converts a candidate's filesystem path into the normalized string used
//! for loading and reporting across both variants. POSIX absolute paths pass
//! through with slash normalization only; drive-letter platforms get a
//! percent-encoded `file://` URL.

use std::path::{Component, Path, PathBuf};

/// Canonical identifier for `path`: absolute, forward slashes, leading
/// slash guaranteed, URL form on drive-letter platforms.
pub fn identifier(path: &Path) -> String {
    let absolute = absolutize(path);
    let mut name = absolute.to_string_lossy().replace('\\', "/");
    if !name.starts_with('/') {
        // Drive-letter absolute paths lack a leading slash
        name.insert(0, '/');
    }
    if cfg!(windows) {
        file_url(&name)
    } else {
        name
    }
}

/// Lexical absolutization: relative paths are joined to the process current
/// directory, `.` and `..` components are folded away. No filesystem access,
/// so paths that do not exist yet can still be resolved.
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// URL form of an already-normalized pathname. Each segment is
/// percent-encoded (the drive designator is kept verbatim) and the
/// triple-slash introduced by the scheme prefix collapses back to two.
fn file_url(pathname: &str) -> String {
    let encoded = pathname
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/");
    format!("file://{}", encoded).replacen(":///", "://", 1)
}

fn encode_segment(segment: &str) -> String {
    if is_drive_designator(segment) {
        segment.to_string()
    } else {
        urlencoding::encode(segment).into_owned()
    }
}

fn is_drive_designator(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
