//! Throughput classification.
//!
//! Converts an `(elapsed, workload)` pair into operations per second and a
//! qualitative [`Tier`]. Thresholds are fixed and exclusive on their lower
//! bound: exactly 10 000 000 ops/s is [`Tier::Fast`], not [`Tier::VeryFast`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound (exclusive) for [`Tier::VeryFast`].
pub const VERY_FAST_THRESHOLD: f64 = 10_000_000.0;
/// Lower bound (exclusive) for [`Tier::Fast`].
pub const FAST_THRESHOLD: f64 = 1_000_000.0;
/// Lower bound (exclusive) for [`Tier::Moderate`].
pub const MODERATE_THRESHOLD: f64 = 100_000.0;

/// Rate reported when the elapsed time is zero.
pub const MAX_RATE: f64 = f64::MAX;

/// Qualitative performance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// At most 100 000 ops/s.
    Slow,
    /// Above 100 000 ops/s.
    Moderate,
    /// Above 1 000 000 ops/s.
    Fast,
    /// Above 10 000 000 ops/s.
    VeryFast,
}

impl Tier {
    /// Bucket a throughput figure. Highest tier is checked first.
    pub fn from_ops_per_second(ops: f64) -> Self {
        if ops > VERY_FAST_THRESHOLD {
            Tier::VeryFast
        } else if ops > FAST_THRESHOLD {
            Tier::Fast
        } else if ops > MODERATE_THRESHOLD {
            Tier::Moderate
        } else {
            Tier::Slow
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::VeryFast => "very fast",
            Tier::Fast => "fast",
            Tier::Moderate => "moderate",
            Tier::Slow => "slow",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Throughput and tier derived from one timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Operations per second; [`MAX_RATE`] when no time elapsed.
    pub ops_per_second: f64,
    /// Bucket for `ops_per_second`.
    pub tier: Tier,
}

impl Classification {
    /// Whether the rate is the zero-time sentinel.
    pub fn is_saturated(&self) -> bool {
        self.ops_per_second == MAX_RATE
    }
}

/// Compute throughput in operations per second.
///
/// Zero, negative and non-finite elapsed times yield [`MAX_RATE`], so the
/// result is always finite.
pub fn ops_per_second(execution_time_ms: f64, workload_size: u64) -> f64 {
    if !(execution_time_ms.is_finite() && execution_time_ms > 0.0) {
        return MAX_RATE;
    }
    let ops = workload_size as f64 / (execution_time_ms / 1000.0);
    if ops.is_finite() {
        ops
    } else {
        MAX_RATE
    }
}

/// Classify one timing.
pub fn classify(execution_time_ms: f64, workload_size: u64) -> Classification {
    let ops_per_second = ops_per_second(execution_time_ms, workload_size);
    Classification {
        ops_per_second,
        tier: Tier::from_ops_per_second(ops_per_second),
    }
}
