//! Ordered run log of benchmark results.

use crate::result::BenchmarkResult;

/// Append-only log of results in completion order.
///
/// The same case may appear several times; this is a log, not a map.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    results: Vec<BenchmarkResult>,
}

impl ResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result.
    pub fn push(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    /// Drop every result.
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Iterate results in completion order.
    pub fn iter(&self) -> std::slice::Iter<'_, BenchmarkResult> {
        self.results.iter()
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no result is stored.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Vec<BenchmarkResult> {
        self.results.clone()
    }
}
