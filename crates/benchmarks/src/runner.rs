// Copyright 2025 Shellbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark runner.
//!
//! The runner owns the only shared mutable state of the engine: the
//! [`RunState`] token and the [`ResultStore`]. Both live behind one mutex
//! that is never held across an `.await`.
//!
//! # State machine
//!
//! ```text
//! run_one:  Idle ──▶ Running(case) ──▶ Idle
//! run_all:  Idle ──▶ Running(c0) ──▶ Pausing ──▶ Running(c1) ──▶ … ──▶ Idle
//! ```
//!
//! A new run is accepted only from `Idle`. The token is released by a guard,
//! so the runner returns to `Idle` even if the run future is dropped.
//!
//! There is no timeout and no cancellation for an in-flight provider call:
//! a provider that never resolves keeps the runner busy.

use chrono::Utc;
use serde::Serialize;
use shellbench_core::config::RunnerConfig;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::outcome::{BatchReport, CaseOutcome};
use crate::provider::ComputationProvider;
use crate::registry::{BenchmarkCase, CaseRegistry};
use crate::result::BenchmarkResult;
use crate::store::ResultStore;

/// Errors surfaced to the caller of the runner.
///
/// Provider failures are not errors at this level; they are recorded as
/// failed [`CaseOutcome`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    /// No case with this name is registered.
    #[error("Unknown benchmark case: {0}")]
    UnknownCase(String),

    /// Another run holds the runner.
    #[error("Benchmark runner is busy ({0})")]
    AlreadyRunning(RunState),
}

/// Explicit run token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// Nothing in flight; a new run may start.
    #[default]
    Idle,
    /// A provider call for `case` is in flight.
    Running {
        /// Case being executed.
        case: String,
    },
    /// A batch is sleeping between two cases.
    Pausing {
        /// Index of the next case in the batch.
        next: usize,
    },
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => f.write_str("idle"),
            RunState::Running { case } => write!(f, "running '{case}'"),
            RunState::Pausing { next } => write!(f, "batch paused before case #{next}"),
        }
    }
}

/// Snapshot of the runner's state for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RunSession {
    /// Whether a provider call is in flight.
    pub is_running: bool,
    /// Label of the case in flight.
    pub current_case: Option<String>,
}

#[derive(Debug, Default)]
struct Shared {
    state: RunState,
    store: ResultStore,
}

/// Returns the runner to `Idle` when dropped.
struct RunGuard<'a> {
    shared: &'a Mutex<Shared>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        lock(self.shared).state = RunState::Idle;
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // The critical sections never panic midway; recover rather than cascade.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Executes registry cases against a [`ComputationProvider`].
pub struct BenchmarkRunner<P> {
    provider: P,
    registry: CaseRegistry,
    config: RunnerConfig,
    shared: Mutex<Shared>,
}

impl<P: ComputationProvider> BenchmarkRunner<P> {
    /// Create a runner over `registry`.
    pub fn new(provider: P, registry: CaseRegistry, config: RunnerConfig) -> Self {
        Self {
            provider,
            registry,
            config,
            shared: Mutex::new(Shared::default()),
        }
    }

    /// Create a runner over the default registry with default settings.
    pub fn with_defaults(provider: P) -> Self {
        Self::new(provider, CaseRegistry::default(), RunnerConfig::default())
    }

    /// The registered cases.
    pub fn registry(&self) -> &CaseRegistry {
        &self.registry
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Runner settings.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Current run token.
    pub fn state(&self) -> RunState {
        lock(&self.shared).state.clone()
    }

    /// Whether a provider call is in flight and which case it serves.
    pub fn session(&self) -> RunSession {
        match &lock(&self.shared).state {
            RunState::Running { case } => RunSession {
                is_running: true,
                current_case: Some(case.clone()),
            },
            RunState::Idle | RunState::Pausing { .. } => RunSession::default(),
        }
    }

    /// Whether any run, including a paused batch, holds the runner.
    pub fn is_busy(&self) -> bool {
        lock(&self.shared).state != RunState::Idle
    }

    /// Copy of the stored results in completion order.
    pub fn results(&self) -> Vec<BenchmarkResult> {
        lock(&self.shared).store.snapshot()
    }

    /// Number of stored results.
    pub fn result_count(&self) -> usize {
        lock(&self.shared).store.len()
    }

    /// Clear stored results. Does not look at or change the run state.
    pub fn reset(&self) {
        lock(&self.shared).store.clear();
        debug!("benchmark results cleared");
    }

    /// Run a single case by name.
    ///
    /// Returns `Err` when the case is unknown or another run holds the
    /// runner. A provider failure is logged and reported as a failed
    /// [`CaseOutcome`]; nothing is appended to the store in that case.
    pub async fn run_one(&self, name: &str) -> Result<CaseOutcome, RunnerError> {
        let case = self
            .registry
            .find(name)
            .ok_or_else(|| RunnerError::UnknownCase(name.to_string()))?;

        let _guard = self.acquire(RunState::Running {
            case: case.name.clone(),
        })?;
        Ok(self.execute(case).await)
    }

    /// Run every registered case in order, strictly one after another.
    ///
    /// Clears the store first. Each case is followed by the configured
    /// pause. A failing case is recorded and the batch moves on.
    pub async fn run_all(&self) -> Result<BatchReport, RunnerError> {
        let started_at = Utc::now();
        let first = match self.registry.get(0) {
            Some(case) => RunState::Running {
                case: case.name.clone(),
            },
            None => RunState::Pausing { next: 0 },
        };
        let _guard = self.acquire(first)?;
        lock(&self.shared).store.clear();

        info!(
            cases = self.registry.len(),
            pause_ms = self.config.inter_case_pause_ms,
            "starting benchmark batch"
        );

        let mut outcomes = Vec::with_capacity(self.registry.len());
        for (index, case) in self.registry.iter().enumerate() {
            self.set_state(RunState::Running {
                case: case.name.clone(),
            });
            outcomes.push(self.execute(case).await);

            self.set_state(RunState::Pausing { next: index + 1 });
            tokio::time::sleep(self.config.inter_case_pause()).await;
        }

        let report = BatchReport::new(outcomes, started_at);
        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            duration_ms = report.duration_ms(),
            "benchmark batch finished"
        );
        Ok(report)
    }

    fn acquire(&self, next: RunState) -> Result<RunGuard<'_>, RunnerError> {
        let mut shared = lock(&self.shared);
        if shared.state != RunState::Idle {
            return Err(RunnerError::AlreadyRunning(shared.state.clone()));
        }
        shared.state = next;
        Ok(RunGuard {
            shared: &self.shared,
        })
    }

    fn set_state(&self, state: RunState) {
        lock(&self.shared).state = state;
    }

    async fn execute(&self, case: &BenchmarkCase) -> CaseOutcome {
        debug!(case = %case.name, workload = case.workload_size, "invoking provider");

        let started_at = Utc::now();
        let start = Instant::now();
        let value = self.provider.compute(case.workload_size).await;
        let elapsed = start.elapsed();

        match value {
            Ok(value) => {
                let result = BenchmarkResult::new(
                    &case.name,
                    elapsed.as_secs_f64() * 1000.0,
                    value,
                    case.workload_size,
                );
                lock(&self.shared).store.push(result.clone());

                let classification = result.classification();
                info!(
                    case = %case.name,
                    execution_time_ms = result.execution_time_ms,
                    ops_per_second = classification.ops_per_second,
                    tier = %classification.tier,
                    "benchmark case completed"
                );
                CaseOutcome::completed(started_at, result)
            }
            Err(err) => {
                warn!(case = %case.name, error = %err, "benchmark case failed");
                CaseOutcome::failed(&case.name, case.workload_size, started_at, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CaseStatus;
    use crate::provider::{MockComputationProvider, ProviderError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn echo_provider() -> MockComputationProvider {
        let mut provider = MockComputationProvider::new();
        provider.expect_compute().returning(|w| Ok(w * 2));
        provider
    }

    /// Wakes current `entered` waiters, then blocks until `release` is notified.
    #[derive(Default)]
    struct GatedProvider {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ComputationProvider for GatedProvider {
        async fn compute(&self, workload_size: u64) -> Result<u64, ProviderError> {
            self.entered.notify_waiters();
            self.release.notified().await;
            Ok(workload_size)
        }
    }

    /// Sleeps per call and records the peak number of overlapping calls.
    #[derive(Default)]
    struct SlowProvider {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        order: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl ComputationProvider for SlowProvider {
        async fn compute(&self, workload_size: u64) -> Result<u64, ProviderError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            self.order.lock().unwrap().push(workload_size);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(workload_size)
        }
    }

    #[tokio::test]
    async fn test_run_one_appends_result() {
        let runner = BenchmarkRunner::with_defaults(echo_provider());

        let outcome = runner.run_one("medium").await.unwrap();
        assert_eq!(outcome.status, CaseStatus::Completed);
        let result = outcome.result.unwrap();
        assert_eq!(result.case_name, "medium");
        assert_eq!(result.result_value, 2_000_000);
        assert_eq!(result.workload_size, 1_000_000);
        assert!(result.execution_time_ms >= 0.0);

        assert_eq!(runner.result_count(), 1);
        assert_eq!(runner.session(), RunSession::default());
        assert_eq!(runner.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn test_run_one_accumulates_repeated_runs() {
        let runner = BenchmarkRunner::with_defaults(echo_provider());
        runner.run_one("light").await.unwrap();
        runner.run_one("light").await.unwrap();
        assert_eq!(runner.result_count(), 2);
    }

    #[tokio::test]
    async fn test_run_one_unknown_case_is_an_error() {
        let mut provider = MockComputationProvider::new();
        provider.expect_compute().never();
        let runner = BenchmarkRunner::with_defaults(provider);

        let err = runner.run_one("nope").await.unwrap_err();
        assert_eq!(err, RunnerError::UnknownCase("nope".to_string()));
        assert_eq!(runner.result_count(), 0);
        assert!(!runner.is_busy());
    }

    #[tokio::test]
    async fn test_run_one_swallows_provider_failure() {
        let mut provider = MockComputationProvider::new();
        provider
            .expect_compute()
            .returning(|_| Err(ProviderError::Computation("overflow".into())));
        let runner = BenchmarkRunner::with_defaults(provider);

        let outcome = runner.run_one("heavy").await.unwrap();
        assert!(outcome.is_failed());
        assert_eq!(
            outcome.error_message.as_deref(),
            Some("Computation failed: overflow")
        );
        assert_eq!(runner.result_count(), 0);
        assert_eq!(runner.session(), RunSession::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_all_runs_every_case_in_order() {
        let runner = BenchmarkRunner::with_defaults(echo_provider());

        let report = runner.run_all().await.unwrap();
        assert_eq!(report.succeeded, 3);
        assert_eq!(report.failed, 0);

        let names: Vec<String> = runner.results().into_iter().map(|r| r.case_name).collect();
        assert_eq!(names, ["light", "medium", "heavy"]);
        assert!(!runner.session().is_running);
        assert!(!runner.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_all_continues_after_failure() {
        let mut provider = MockComputationProvider::new();
        provider.expect_compute().returning(|w| {
            if w == 1_000_000 {
                Err(ProviderError::Computation("second case fails".into()))
            } else {
                Ok(w)
            }
        });
        let runner = BenchmarkRunner::with_defaults(provider);

        let report = runner.run_all().await.unwrap();
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.succeeded, 2);
        assert!(report.outcomes[1].is_failed());

        let names: Vec<String> = runner.results().into_iter().map(|r| r.case_name).collect();
        assert_eq!(names, ["light", "heavy"]);
        assert!(!runner.session().is_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_all_clears_previous_results() {
        let runner = BenchmarkRunner::with_defaults(echo_provider());
        runner.run_one("light").await.unwrap();
        runner.run_one("light").await.unwrap();

        runner.run_all().await.unwrap();
        assert_eq!(runner.result_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_all_is_sequential_with_pauses() {
        let runner = BenchmarkRunner::with_defaults(SlowProvider::default());

        let start = Instant::now();
        runner.run_all().await.unwrap();
        let elapsed = start.elapsed();

        // three 100ms calls plus three 500ms pauses
        assert!(elapsed >= Duration::from_millis(1800), "elapsed {elapsed:?}");
        assert_eq!(runner.provider().peak.load(Ordering::SeqCst), 1);
        assert_eq!(
            *runner.provider().order.lock().unwrap(),
            vec![100_000, 1_000_000, 10_000_000]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_execution_time_is_measured_around_provider_call() {
        let runner = BenchmarkRunner::with_defaults(SlowProvider::default());
        let outcome = runner.run_one("light").await.unwrap();
        let result = outcome.result.unwrap();
        assert!(result.execution_time_ms >= 100.0);
        assert!(result.execution_time_ms < 500.0);
    }

    #[tokio::test]
    async fn test_concurrent_run_is_refused() {
        let runner = Arc::new(BenchmarkRunner::with_defaults(GatedProvider::default()));

        let task = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.run_one("light").await }
        });
        runner.provider().entered.notified().await;

        let session = runner.session();
        assert!(session.is_running);
        assert_eq!(session.current_case.as_deref(), Some("light"));

        let err = runner.run_one("medium").await.unwrap_err();
        assert!(matches!(err, RunnerError::AlreadyRunning(RunState::Running { .. })));
        assert!(matches!(
            runner.run_all().await,
            Err(RunnerError::AlreadyRunning(_))
        ));

        runner.provider().release.notify_one();
        let outcome = task.await.unwrap().unwrap();
        assert!(outcome.is_completed());
        assert!(!runner.session().is_running);
        assert_eq!(runner.result_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_one_refused_while_batch_pauses() {
        let runner = Arc::new(BenchmarkRunner::with_defaults(echo_provider()));

        let task = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.run_all().await }
        });
        // Let the batch finish its first case and enter the pause.
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(runner.state(), RunState::Pausing { next: 1 });
        assert!(!runner.session().is_running);
        assert!(matches!(
            runner.run_one("heavy").await,
            Err(RunnerError::AlreadyRunning(RunState::Pausing { .. }))
        ));

        let report = task.await.unwrap().unwrap();
        assert_eq!(report.succeeded, 3);
        assert_eq!(runner.state(), RunState::Idle);
    }

    #[tokio::test]
    async fn test_reset_while_running() {
        let runner = Arc::new(BenchmarkRunner::with_defaults(GatedProvider::default()));

        // Pre-release one call so the first run passes straight through.
        runner.provider().release.notify_one();
        runner.run_one("light").await.unwrap();
        assert_eq!(runner.result_count(), 1);

        let task = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move { runner.run_one("medium").await }
        });
        runner.provider().entered.notified().await;
        assert!(runner.session().is_running);

        runner.reset();
        assert_eq!(runner.result_count(), 0);
        assert!(runner.session().is_running);

        runner.provider().release.notify_one();
        task.await.unwrap().unwrap();
        assert_eq!(runner.result_count(), 1);
        assert_eq!(runner.results()[0].case_name, "medium");
    }

    #[tokio::test]
    async fn test_reset_when_idle_restores_empty_state() {
        let runner = BenchmarkRunner::with_defaults(echo_provider());
        runner.run_one("light").await.unwrap();
        runner.reset();
        assert!(runner.results().is_empty());
        assert_eq!(runner.state(), RunState::Idle);
        runner.reset();
        assert!(runner.results().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_run_releases_token() {
        let runner = BenchmarkRunner::with_defaults(GatedProvider::default());
        {
            let fut = runner.run_one("light");
            tokio::pin!(fut);
            let polled = tokio::time::timeout(Duration::from_millis(10), &mut fut).await;
            assert!(polled.is_err());
            assert!(runner.is_busy());
        }
        assert!(!runner.is_busy());
    }
}
