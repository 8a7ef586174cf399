//! Benchmark case registry.
//!
//! The registry is the ordered, immutable list of cases a batch run walks
//! through. Order matters: it is the batch execution order.

use serde::{Deserialize, Serialize};
use shellbench_core::{Error, Result};

/// A named unit of timed work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkCase {
    /// Unique display label.
    pub name: String,
    /// Iteration count handed to the provider.
    pub workload_size: u64,
    /// Human-readable description.
    pub description: String,
}

impl BenchmarkCase {
    /// Create a new case.
    pub fn new(
        name: impl Into<String>,
        workload_size: u64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            workload_size,
            description: description.into(),
        }
    }
}

/// Ordered set of benchmark cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRegistry {
    cases: Vec<BenchmarkCase>,
}

impl Default for CaseRegistry {
    fn default() -> Self {
        Self {
            cases: vec![
                BenchmarkCase::new("light", 100_000, "100K iteration arithmetic loop"),
                BenchmarkCase::new("medium", 1_000_000, "1M iteration arithmetic loop"),
                BenchmarkCase::new("heavy", 10_000_000, "10M iteration arithmetic loop"),
            ],
        }
    }
}

impl CaseRegistry {
    /// Build a registry from an ordered list of cases.
    ///
    /// Returns `Err` on an empty name, a zero workload or a duplicate name.
    pub fn new(cases: Vec<BenchmarkCase>) -> Result<Self> {
        for (i, case) in cases.iter().enumerate() {
            if case.name.trim().is_empty() {
                return Err(Error::invalid_input(format!("case #{i} has an empty name")));
            }
            if case.workload_size == 0 {
                return Err(Error::invalid_input(format!(
                    "case '{}' has a zero workload",
                    case.name
                )));
            }
            if cases[..i].iter().any(|prev| prev.name == case.name) {
                return Err(Error::invalid_input(format!(
                    "duplicate case name '{}'",
                    case.name
                )));
            }
        }
        Ok(Self { cases })
    }

    /// Case at `index` in batch order.
    pub fn get(&self, index: usize) -> Option<&BenchmarkCase> {
        self.cases.get(index)
    }

    /// Case with the given name.
    pub fn find(&self, name: &str) -> Option<&BenchmarkCase> {
        self.cases.iter().find(|case| case.name == name)
    }

    /// Iterate cases in batch order.
    pub fn iter(&self) -> std::slice::Iter<'_, BenchmarkCase> {
        self.cases.iter()
    }

    /// Number of cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the registry has no cases.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl<'a> IntoIterator for &'a CaseRegistry {
    type Item = &'a BenchmarkCase;
    type IntoIter = std::slice::Iter<'a, BenchmarkCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let registry = CaseRegistry::default();
        let names: Vec<&str> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["light", "medium", "heavy"]);
        let sizes: Vec<u64> = registry.iter().map(|c| c.workload_size).collect();
        assert_eq!(sizes, [100_000, 1_000_000, 10_000_000]);
    }

    #[test]
    fn test_default_is_stable() {
        assert_eq!(CaseRegistry::default(), CaseRegistry::default());
    }

    #[test]
    fn test_lookup_by_index_and_name() {
        let registry = CaseRegistry::default();
        assert_eq!(registry.get(1).map(|c| c.name.as_str()), Some("medium"));
        assert!(registry.get(3).is_none());
        assert_eq!(registry.find("heavy").map(|c| c.workload_size), Some(10_000_000));
        assert!(registry.find("missing").is_none());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = CaseRegistry::new(vec![
            BenchmarkCase::new("a", 1, ""),
            BenchmarkCase::new("a", 2, ""),
        ]);
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_zero_workload() {
        let result = CaseRegistry::new(vec![BenchmarkCase::new("a", 0, "")]);
        assert!(result.unwrap_err().to_string().contains("zero workload"));
    }

    #[test]
    fn test_rejects_blank_name() {
        let result = CaseRegistry::new(vec![BenchmarkCase::new("  ", 5, "")]);
        assert!(result.is_err());
    }
}
