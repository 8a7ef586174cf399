// Copyright 2025 Shellbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-case outcome records for single and batch runs.
//!
//! A provider failure never aborts a batch; instead every attempted case
//! leaves a [`CaseOutcome`] in the [`BatchReport`]. Only completed outcomes
//! carry a [`BenchmarkResult`], and only those reach the result store.
//!
//! # Invariants
//!
//! ```text
//! Completed  => result.is_some()  && error_message.is_none()
//! Failed     => result.is_none()  && error_message.is_some()
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::BenchmarkResult;

/// Status of one attempted case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseStatus {
    /// Provider returned a value.
    Completed,
    /// Provider returned an error.
    Failed,
}

/// Record of one attempted case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Case label.
    pub case_name: String,
    /// Workload handed to the provider.
    pub workload_size: u64,
    /// Completed or failed.
    pub status: CaseStatus,
    /// When the provider call started.
    pub started_at: DateTime<Utc>,
    /// When the provider call resolved.
    pub finished_at: DateTime<Utc>,
    /// Result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<BenchmarkResult>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CaseOutcome {
    /// Outcome for a successful call.
    pub fn completed(started_at: DateTime<Utc>, result: BenchmarkResult) -> Self {
        Self {
            case_name: result.case_name.clone(),
            workload_size: result.workload_size,
            status: CaseStatus::Completed,
            started_at,
            finished_at: result.timestamp,
            result: Some(result),
            error_message: None,
        }
    }

    /// Outcome for a failed call.
    pub fn failed(
        case_name: impl Into<String>,
        workload_size: u64,
        started_at: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            case_name: case_name.into(),
            workload_size,
            status: CaseStatus::Failed,
            started_at,
            finished_at: Utc::now(),
            result: None,
            error_message: Some(error.into()),
        }
    }

    /// Whether the provider returned a value.
    pub fn is_completed(&self) -> bool {
        self.status == CaseStatus::Completed
    }

    /// Whether the provider returned an error.
    pub fn is_failed(&self) -> bool {
        self.status == CaseStatus::Failed
    }

    /// View as a `Result`.
    pub fn as_result(&self) -> Result<&BenchmarkResult, &str> {
        match (&self.result, &self.error_message) {
            (Some(result), _) => Ok(result),
            (None, Some(message)) => Err(message.as_str()),
            (None, None) => Err("no result recorded"),
        }
    }
}

/// Outcome of a full registry run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One entry per attempted case, in registry order.
    pub outcomes: Vec<CaseOutcome>,
    /// When the batch started.
    pub started_at: DateTime<Utc>,
    /// When the batch finished, pauses included.
    pub finished_at: DateTime<Utc>,
    /// Number of completed cases.
    pub succeeded: usize,
    /// Number of failed cases.
    pub failed: usize,
}

impl BatchReport {
    /// Summarise a finished batch.
    pub fn new(outcomes: Vec<CaseOutcome>, started_at: DateTime<Utc>) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_completed()).count();
        Self {
            failed: outcomes.len() - succeeded,
            succeeded,
            outcomes,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Results of completed cases, in order.
    pub fn results(&self) -> impl Iterator<Item = &BenchmarkResult> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref())
    }

    /// Whether every case completed.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Total wall-clock duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.finished_at
            .signed_duration_since(self.started_at)
            .num_milliseconds()
            .unsigned_abs()
    }
}
