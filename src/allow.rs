//! Extension allow-list
//!
//! Decides which directory entries become load candidates. The three code
//! extensions are always eligible; the data extension is recomputed from the
//! call options on every load so it never goes stale across calls.

/// Extensions that are always eligible: in-process plugin libraries,
/// spawned module executables, and variant-agnostic module descriptors.
pub const CODE_EXTENSIONS: [&str; 3] = [".so", ".bin", ".module"];

/// Data files, eligible only while the current call allows them.
pub const DATA_EXTENSION: &str = ".json";

/// Mutable set of eligible file extensions, owned by one loader instance.
#[derive(Debug, Clone)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    pub fn new() -> Self {
        Self {
            entries: CODE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Defensive copy; mutating the returned vector never affects the loader.
    pub fn as_vec(&self) -> Vec<String> {
        self.entries.clone()
    }

    /// Case-sensitive membership check on the dot-extension.
    pub fn contains(&self, ext: &str) -> bool {
        self.entries.iter().any(|e| e == ext)
    }

    /// Adds or removes the data extension. Called by options resolution on
    /// every load, independent of prior calls.
    pub fn set_data_allowed(&mut self, allowed: bool) {
        let present = self.contains(DATA_EXTENSION);
        if allowed && !present {
            self.entries.push(DATA_EXTENSION.to_string());
        } else if !allowed && present {
            self.entries.retain(|e| e != DATA_EXTENSION);
        }
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_extensions_always_present() {
        let allow = AllowList::new();
        for ext in CODE_EXTENSIONS {
            assert!(allow.contains(ext));
        }
        assert!(!allow.contains(DATA_EXTENSION));
    }

    #[test]
    fn test_data_extension_toggle() {
        let mut allow = AllowList::new();

        allow.set_data_allowed(true);
        assert!(allow.contains(DATA_EXTENSION));

        // Enabling twice must not duplicate the entry
        allow.set_data_allowed(true);
        assert_eq!(
            allow.as_vec().iter().filter(|e| *e == DATA_EXTENSION).count(),
            1
        );

        allow.set_data_allowed(false);
        assert!(!allow.contains(DATA_EXTENSION));
        for ext in CODE_EXTENSIONS {
            assert!(allow.contains(ext));
        }
    }

    #[test]
    fn test_as_vec_is_a_copy() {
        let allow = AllowList::new();
        let mut copy = allow.as_vec();
        copy.clear();
        assert_eq!(allow.as_vec().len(), CODE_EXTENSIONS.len());
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let allow = AllowList::new();
        assert!(allow.contains(".so"));
        assert!(!allow.contains(".SO"));
    }
}
