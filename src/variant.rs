//! Loading-convention detection
//!
//! The host process supports two mutually exclusive module-loading
//! conventions: opening a plugin library in-process, or spawning a module
//! executable and waiting for it to finish. Callers should pin the variant
//! explicitly; the backtrace heuristic exists only as an opt-in legacy
//! fallback and is unreliable by nature (it depends on frame symbolization,
//! inlining, and strip settings of the hosting binary).

use std::backtrace::Backtrace;
use std::sync::LazyLock;

use tracing::{debug, warn};

/// Environment variable that overrides the process-wide default variant.
pub const DEFAULT_VARIANT_ENV: &str = "AUTOLOAD_VARIANT";

/// One of the two module-loading conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Eager convention: the candidate is a shared library mapped into the
    /// host address space immediately.
    InProcess,
    /// Deferred convention: the candidate is an executable run as a child
    /// process; the loaded unit materializes when it completes.
    Spawned,
}

impl Variant {
    /// Parses one of the two accepted tokens, case-insensitively and with
    /// surrounding whitespace ignored. Anything else is rejected.
    pub fn from_token(token: &str) -> Option<Variant> {
        match token.trim().to_ascii_lowercase().as_str() {
            "in-process" => Some(Variant::InProcess),
            "spawned" => Some(Variant::Spawned),
            _ => None,
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            Variant::InProcess => "in-process",
            Variant::Spawned => "spawned",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

// Established once per process. The hosting code itself executes as
// statically linked in-process native code, so that is the default absent
// an explicit override.
static PROCESS_DEFAULT: LazyLock<Variant> = LazyLock::new(|| {
    std::env::var(DEFAULT_VARIANT_ENV)
        .ok()
        .and_then(|token| Variant::from_token(&token))
        .unwrap_or(Variant::InProcess)
});

/// Process-wide default variant, fixed on first use.
pub fn process_default() -> Variant {
    *PROCESS_DEFAULT
}

/// Legacy heuristic: scan the current call context for frame signatures tied
/// to one of the two conventions. Unreliable; kept only behind the loader's
/// explicit legacy-detection flag.
pub fn detect_from_backtrace() -> Option<Variant> {
    let frames = Backtrace::force_capture().to_string();
    detect_in_frames(&frames)
}

fn detect_in_frames(frames: &str) -> Option<Variant> {
    if frames.contains("libloading") {
        return Some(Variant::InProcess);
    }
    if frames.contains("tokio::process") || frames.contains("std::process") {
        return Some(Variant::Spawned);
    }
    None
}

/// Full resolution order: explicit token, then (when enabled) the legacy
/// backtrace heuristic, then the process-wide default. Invalid tokens fall
/// through instead of raising an error.
pub fn resolve(token: Option<&str>, legacy_detection: bool) -> Variant {
    if let Some(token) = token {
        if let Some(variant) = Variant::from_token(token) {
            return variant;
        }
        debug!("unrecognized variant token {:?}, falling back to detection", token);
    }
    if legacy_detection {
        if let Some(variant) = detect_from_backtrace() {
            warn!(
                "variant {} detected from backtrace frames; prefer setting it explicitly",
                variant
            );
            return variant;
        }
    }
    process_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parsing() {
        assert_eq!(Variant::from_token("in-process"), Some(Variant::InProcess));
        assert_eq!(Variant::from_token("  SPAWNED "), Some(Variant::Spawned));
        assert_eq!(Variant::from_token("In-Process"), Some(Variant::InProcess));
        assert_eq!(Variant::from_token("mjs"), None);
        assert_eq!(Variant::from_token(""), None);
    }

    #[test]
    fn test_token_round_trip() {
        for variant in [Variant::InProcess, Variant::Spawned] {
            assert_eq!(Variant::from_token(variant.as_token()), Some(variant));
        }
    }

    #[test]
    fn test_frame_signatures() {
        assert_eq!(
            detect_in_frames("12: libloading::os::unix::Library::open"),
            Some(Variant::InProcess)
        );
        assert_eq!(
            detect_in_frames("7: tokio::process::Command::output"),
            Some(Variant::Spawned)
        );
        assert_eq!(detect_in_frames("3: core::ops::function::FnOnce"), None);
    }

    #[test]
    fn test_resolution_order() {
        // Explicit token wins
        assert_eq!(resolve(Some("spawned"), false), Variant::Spawned);
        // Invalid token with the heuristic disabled lands on the default
        assert_eq!(resolve(Some("bogus"), false), process_default());
        assert_eq!(resolve(None, false), process_default());
    }
}
