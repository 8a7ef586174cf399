//! Markdown output generation for benchmark results.
//!
//! Tables are built from [`ResultView`]s so the report shows exactly what
//! the terminal and UI show.

use crate::format::ResultView;
use crate::outcome::BatchReport;
use crate::result::BenchmarkResult;
use std::fmt::Write;

/// Generate a markdown summary table from stored results.
pub fn generate_summary(results: &[BenchmarkResult]) -> String {
    let mut output = String::new();

    writeln!(output, "# Benchmark Summary").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "## Results").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "| Case | Workload | Time | Ops/s | Tier | Result |").unwrap();
    writeln!(output, "|------|----------|------|-------|------|--------|").unwrap();

    for result in results {
        let view = ResultView::from(result);
        writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} |",
            view.name, view.workload, view.time, view.ops_per_second, view.tier, view.result_value
        ).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "---").unwrap();
    writeln!(output, "Total results: {}", results.len()).unwrap();

    output
}

/// Generate a detailed report of a batch, failures included.
pub fn generate_batch_report(report: &BatchReport) -> String {
    let mut output = String::new();

    writeln!(output, "# Batch Report").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "**Started:** {}", report.started_at.to_rfc3339()).unwrap();
    writeln!(output, "**Finished:** {}", report.finished_at.to_rfc3339()).unwrap();
    writeln!(
        output,
        "**Cases:** {} succeeded, {} failed",
        report.succeeded, report.failed
    ).unwrap();
    writeln!(output).unwrap();

    for outcome in &report.outcomes {
        writeln!(output, "## {}", outcome.case_name).unwrap();
        writeln!(output).unwrap();
        match outcome.as_result() {
            Ok(result) => {
                let view = ResultView::from(result);
                writeln!(output, "- Time: {}", view.time).unwrap();
                writeln!(output, "- Ops/s: {}", view.ops_per_second).unwrap();
                writeln!(output, "- Tier: {}", view.tier).unwrap();
                writeln!(output, "- Result: {}", view.result_value).unwrap();
            }
            Err(message) => {
                writeln!(output, "- Failed: {message}").unwrap();
            }
        }
        writeln!(output).unwrap();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::CaseOutcome;
    use chrono::Utc;

    #[test]
    fn test_summary_contains_formatted_rows() {
        let results = vec![
            BenchmarkResult::new("light", 0.5, 1_234, 100_000),
            BenchmarkResult::new("heavy", 2_500.0, 42, 10_000_000),
        ];
        let summary = generate_summary(&results);

        assert!(summary.contains("| light | 100,000 | 500.00μs | 200,000,000 | very fast | 1,234 |"));
        assert!(summary.contains("| heavy | 10,000,000 | 2.50s | 4,000,000 | fast | 42 |"));
        assert!(summary.contains("Total results: 2"));
    }

    #[test]
    fn test_empty_summary_has_header_only() {
        let summary = generate_summary(&[]);
        assert!(summary.starts_with("# Benchmark Summary\n\nGenerated: "));
        assert!(summary.contains("|------|----------|------|-------|------|--------|\n\n---\n"));
        assert!(summary.ends_with("Total results: 0\n"));
    }

    #[test]
    fn test_batch_report_lists_failures() {
        let report = BatchReport::new(
            vec![
                CaseOutcome::completed(Utc::now(), BenchmarkResult::new("light", 10.0, 1, 100_000)),
                CaseOutcome::failed("medium", 1_000_000, Utc::now(), "provider crashed"),
            ],
            Utc::now(),
        );
        let text = generate_batch_report(&report);

        assert!(text.contains("**Cases:** 1 succeeded, 1 failed"));
        assert!(text.contains("## medium"));
        assert!(text.contains("- Failed: provider crashed"));
        assert!(text.contains("- Tier: fast"));
    }
}
