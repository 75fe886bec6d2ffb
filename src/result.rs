//! Load result aggregation
//!
//! One `LoadResult` is created per `load` call and written to only by the
//! loader as it walks the candidates.

use serde::Serialize;

/// A candidate that failed to load, keyed by its canonical identifier.
#[derive(Debug, Clone, Serialize)]
pub struct FailedLoad {
    pub identifier: String,
    pub error: String,
}

/// Aggregated outcome of one `load` call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadResult {
    /// Identifiers loaded successfully, in processing order.
    pub loaded: Vec<String>,
    pub loaded_count: usize,
    /// Per-candidate failures, in processing order.
    pub failed: Vec<FailedLoad>,
    pub failed_count: usize,
}

impl LoadResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_loaded(&mut self, identifier: String) {
        self.loaded.push(identifier);
        self.loaded_count += 1;
    }

    pub(crate) fn record_failed(&mut self, identifier: String, error: String) {
        self.failed.push(FailedLoad { identifier, error });
        self.failed_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_track_lists() {
        let mut result = LoadResult::new();
        result.record_loaded("/m/a.so".to_string());
        result.record_failed("/m/b.so".to_string(), "boom".to_string());
        result.record_loaded("/m/c.bin".to_string());

        assert_eq!(result.loaded_count, result.loaded.len());
        assert_eq!(result.failed_count, result.failed.len());
        assert_eq!(result.loaded, vec!["/m/a.so", "/m/c.bin"]);
        assert_eq!(result.failed[0].identifier, "/m/b.so");
        assert_eq!(result.failed[0].error, "boom");
    }
}
