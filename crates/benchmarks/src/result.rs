//! Benchmark result types.
//!
//! This module provides the `BenchmarkResult` record produced by one
//! successful provider invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{classify, Classification};

/// Outcome of one successful timed invocation.
///
/// Results are created once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Name of the case that produced this result.
    pub case_name: String,
    /// Observed end-to-end latency of the provider call, in milliseconds.
    pub execution_time_ms: f64,
    /// Value returned by the provider.
    pub result_value: u64,
    /// Iteration count handed to the provider.
    pub workload_size: u64,
    /// Timestamp when the invocation completed.
    pub timestamp: DateTime<Utc>,
}

impl BenchmarkResult {
    /// Create a new BenchmarkResult stamped with the current time.
    ///
    /// Negative or non-finite timings are stored as zero.
    pub fn new(
        case_name: impl Into<String>,
        execution_time_ms: f64,
        result_value: u64,
        workload_size: u64,
    ) -> Self {
        let execution_time_ms = if execution_time_ms.is_finite() && execution_time_ms > 0.0 {
            execution_time_ms
        } else {
            0.0
        };
        Self {
            case_name: case_name.into(),
            execution_time_ms,
            result_value,
            workload_size,
            timestamp: Utc::now(),
        }
    }

    /// Throughput and tier for this result.
    pub fn classification(&self) -> Classification {
        classify(self.execution_time_ms, self.workload_size)
    }
}
