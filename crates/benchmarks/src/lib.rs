//! Benchmark orchestration and counter animation for shellbench.
//!
//! This crate times calls to a computation provider, classifies the
//! results and keeps them in an ordered run log. Independently it drives
//! numeric counters through short ease-out animations.
//!
//! # Quick Start
//!
//! ```no_run
//! use shellbench_benchmarks::{BenchmarkRunner, NativeProvider, ResultView};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = BenchmarkRunner::with_defaults(NativeProvider::new());
//! let report = runner.run_all().await?;
//!
//! for result in report.results() {
//!     let view = ResultView::from(result);
//!     println!("{}: {} ({})", view.name, view.time, view.tier);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`registry`] - The ordered benchmark case list
//! - [`provider`] - The computation provider seam and the native provider
//! - [`runner`] - Single and batch execution with an explicit run token
//! - [`classifier`] - Throughput and tier classification
//! - [`store`] - The ordered result log
//! - [`format`] - Display formatting
//! - [`outcome`] - Per-case and batch outcome records
//! - [`animator`] - Ease-out counter animation
//! - [`io`] - Reading and writing results
//! - [`markdown`] - Markdown report generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod animator;
pub mod classifier;
pub mod format;
pub mod io;
pub mod markdown;
pub mod outcome;
pub mod provider;
pub mod registry;
pub mod result;
pub mod runner;
pub mod store;

pub use animator::{Animation, FigureSet, Timeline};
pub use classifier::{classify, Classification, Tier};
pub use format::{format_thousands, format_time, ResultView};
pub use io::{OutputFormat, OutputLayout};
pub use outcome::{BatchReport, CaseOutcome, CaseStatus};
pub use provider::{ComputationProvider, NativeProvider, ProviderError};
pub use registry::{BenchmarkCase, CaseRegistry};
pub use result::BenchmarkResult;
pub use runner::{BenchmarkRunner, RunSession, RunState, RunnerError};
pub use store::ResultStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_native_batch_end_to_end() {
        let registry = CaseRegistry::new(vec![
            BenchmarkCase::new("tiny", 10, "ten iterations"),
            BenchmarkCase::new("small", 1_000, "a thousand iterations"),
        ])
        .unwrap();
        let runner = BenchmarkRunner::new(
            NativeProvider::new(),
            registry,
            shellbench_core::config::RunnerConfig {
                inter_case_pause_ms: 0,
            },
        );

        let report = runner.run_all().await.unwrap();
        assert!(report.all_succeeded());

        let results = runner.results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].result_value, NativeProvider::heavy_computation(10));
        assert_eq!(results[1].result_value, NativeProvider::heavy_computation(1_000));
    }
}
