//! Per-call load options
//!
//! Options are constructed fresh for every `load` invocation and never
//! persisted. Resolution normalizes missing pieces to defaults and
//! synchronizes the allow-list's data-extension membership, a deliberate
//! side effect on the loader's config state.

use std::sync::Arc;

use crate::allow::AllowList;

/// Inclusion predicate over a candidate's canonical identifier.
pub type CheckFirst = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Caller-supplied options for one `load` call.
#[derive(Clone, Default)]
pub struct LoadOptions {
    /// Admit the data extension for this call only (default false).
    pub allow_data: bool,
    /// Candidates rejected by this predicate are skipped entirely: no
    /// callback, no entry in either result list. Defaults to always-true.
    pub check_first: Option<CheckFirst>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_data(mut self, allow: bool) -> Self {
        self.allow_data = allow;
        self
    }

    pub fn check_first<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.check_first = Some(Arc::new(predicate));
        self
    }
}

impl std::fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadOptions")
            .field("allow_data", &self.allow_data)
            .field("check_first", &self.check_first.is_some())
            .finish()
    }
}

/// Normalizes `options` and updates the allow-list's data-extension
/// membership for this call. Returns the effective inclusion predicate.
pub(crate) fn resolve(options: Option<LoadOptions>, allow: &mut AllowList) -> CheckFirst {
    let options = options.unwrap_or_default();
    allow.set_data_allowed(options.allow_data);
    options
        .check_first
        .unwrap_or_else(|| Arc::new(|_identifier: &str| true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allow::DATA_EXTENSION;

    #[test]
    fn test_absent_options_use_defaults() {
        let mut allow = AllowList::new();
        let check_first = resolve(None, &mut allow);
        assert!(check_first("/anything"));
        assert!(!allow.contains(DATA_EXTENSION));
    }

    #[test]
    fn test_allow_data_synchronizes_allow_list() {
        let mut allow = AllowList::new();

        resolve(Some(LoadOptions::new().allow_data(true)), &mut allow);
        assert!(allow.contains(DATA_EXTENSION));

        // Recomputed on the next call, never left stale
        resolve(None, &mut allow);
        assert!(!allow.contains(DATA_EXTENSION));
    }

    #[test]
    fn test_custom_predicate_is_kept() {
        let mut allow = AllowList::new();
        let options = LoadOptions::new().check_first(|id| id.ends_with(".so"));
        let check_first = resolve(Some(options), &mut allow);
        assert!(check_first("/plugins/a.so"));
        assert!(!check_first("/plugins/a.bin"));
    }
}
