//! Batch behaviour through the public API.

use async_trait::async_trait;
use shellbench_benchmarks::{
    classify, BenchmarkCase, BenchmarkRunner, CaseRegistry, ComputationProvider, ProviderError,
    Tier,
};
use shellbench_core::config::RunnerConfig;

/// Fails for one workload size, succeeds for every other.
struct FailOn(u64);

#[async_trait]
impl ComputationProvider for FailOn {
    async fn compute(&self, workload_size: u64) -> Result<u64, ProviderError> {
        if workload_size == self.0 {
            Err(ProviderError::Computation(format!("refused {workload_size}")))
        } else {
            Ok(workload_size + 1)
        }
    }
}

fn three_cases() -> CaseRegistry {
    CaseRegistry::new(vec![
        BenchmarkCase::new("first", 1, "one"),
        BenchmarkCase::new("second", 2, "two"),
        BenchmarkCase::new("third", 3, "three"),
    ])
    .unwrap()
}

fn runner(fail_on: u64) -> BenchmarkRunner<FailOn> {
    BenchmarkRunner::new(FailOn(fail_on), three_cases(), RunnerConfig::default())
}

#[tokio::test(start_paused = true)]
async fn batch_of_three_succeeds_in_registry_order() {
    let runner = runner(0);
    let report = runner.run_all().await.unwrap();

    assert_eq!(report.succeeded, 3);
    let values: Vec<u64> = runner.results().iter().map(|r| r.result_value).collect();
    assert_eq!(values, [2, 3, 4]);
    assert!(!runner.session().is_running);
}

#[tokio::test(start_paused = true)]
async fn failure_in_the_middle_does_not_abort_batch() {
    let runner = runner(2);
    let report = runner.run_all().await.unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.failed, 1);
    let names: Vec<String> = runner.results().into_iter().map(|r| r.case_name).collect();
    assert_eq!(names, ["first", "third"]);
    assert!(!runner.session().is_running);
}

#[tokio::test(start_paused = true)]
async fn reset_after_batch_restores_empty_log() {
    let runner = runner(0);
    runner.run_all().await.unwrap();
    runner.reset();

    assert!(runner.results().is_empty());
    assert_eq!(runner.session().current_case, None);

    runner.run_one("second").await.unwrap();
    assert_eq!(runner.results().len(), 1);
}

#[test]
fn tier_boundary_at_ten_million() {
    // 10_000_000 iterations: just under one second is very fast, one second is fast.
    assert_eq!(classify(999.9999, 10_000_000).tier, Tier::VeryFast);
    assert_eq!(classify(1000.0, 10_000_000).tier, Tier::Fast);
}
