//! Presentation formatting.
//!
//! Pure helpers that turn stored numbers into display strings. Nothing here
//! touches the stored values.

use serde::Serialize;

use crate::classifier::{Classification, Tier};
use crate::result::BenchmarkResult;

/// Render a duration given in milliseconds.
///
/// Below 1 ms the value is shown in microseconds, below 1000 ms in
/// milliseconds, otherwise in seconds; always with two decimals.
pub fn format_time(ms: f64) -> String {
    if ms < 1.0 {
        format!("{:.2}μs", ms * 1000.0)
    } else if ms < 1000.0 {
        format!("{:.2}ms", ms)
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

/// Render an integer with `,` between groups of three digits.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render a throughput figure, rounded to a whole number of operations.
pub fn format_ops(classification: &Classification) -> String {
    if classification.is_saturated() {
        return "∞".to_string();
    }
    format_thousands(classification.ops_per_second.round() as u64)
}

/// Display-ready projection of a [`BenchmarkResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    /// Case label.
    pub name: String,
    /// Formatted execution time.
    pub time: String,
    /// Formatted operations per second.
    pub ops_per_second: String,
    /// Qualitative tier.
    pub tier: Tier,
    /// Formatted provider result.
    pub result_value: String,
    /// Formatted workload size.
    pub workload: String,
}

impl From<&BenchmarkResult> for ResultView {
    fn from(result: &BenchmarkResult) -> Self {
        let classification = result.classification();
        Self {
            name: result.case_name.clone(),
            time: format_time(result.execution_time_ms),
            ops_per_second: format_ops(&classification),
            tier: classification.tier,
            result_value: format_thousands(result.result_value),
            workload: format_thousands(result.workload_size),
        }
    }
}
