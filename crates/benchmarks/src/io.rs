//! I/O operations for benchmark results.
//!
//! This module reads and writes benchmark results under an output
//! directory laid out as:
//!
//! ```text
//! <dir>/all_results.json
//! <dir>/summary.md
//! <dir>/batch.md          (batch runs only)
//! <dir>/raw/<case>.json
//! ```

use crate::markdown;
use crate::outcome::BatchReport;
use crate::result::BenchmarkResult;
use shellbench_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which report files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON files only.
    Json,
    /// Markdown files only.
    Markdown,
    /// JSON and markdown.
    #[default]
    Both,
}

impl OutputFormat {
    fn json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    fn markdown(self) -> bool {
        matches!(self, OutputFormat::Markdown | OutputFormat::Both)
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "both" => Ok(OutputFormat::Both),
            other => Err(Error::invalid_input(format!(
                "unknown output format '{other}' (expected json, markdown or both)"
            ))),
        }
    }
}

/// Paths of the files inside one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory of per-case JSON files.
    pub fn raw_dir(&self) -> PathBuf {
        self.dir.join("raw")
    }

    /// Combined JSON file.
    pub fn all_results_file(&self) -> PathBuf {
        self.dir.join("all_results.json")
    }

    /// Markdown summary file.
    pub fn summary_file(&self) -> PathBuf {
        self.dir.join("summary.md")
    }

    /// Markdown batch report file.
    pub fn batch_report_file(&self) -> PathBuf {
        self.dir.join("batch.md")
    }

    /// Create the output directories.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::create_dir_all(self.raw_dir())?;
        Ok(())
    }

    /// Write one result to the raw directory, named after its case.
    ///
    /// Later results of the same case overwrite earlier ones.
    pub fn write_raw_result(&self, result: &BenchmarkResult) -> Result<PathBuf> {
        self.ensure_dirs()?;
        let path = self
            .raw_dir()
            .join(format!("{}.json", result.case_name.replace(['/', '\\'], "_")));
        fs::write(&path, serde_json::to_string_pretty(result)?)?;
        Ok(path)
    }

    /// Write the markdown summary.
    pub fn write_summary(&self, results: &[BenchmarkResult]) -> Result<()> {
        self.ensure_dirs()?;
        fs::write(self.summary_file(), markdown::generate_summary(results))?;
        Ok(())
    }

    /// Write every requested output for `results`, plus the batch report
    /// when one is given.
    pub fn write_all(
        &self,
        results: &[BenchmarkResult],
        batch: Option<&BatchReport>,
        format: OutputFormat,
    ) -> Result<()> {
        self.ensure_dirs()?;

        if format.json() {
            for result in results {
                self.write_raw_result(result)?;
            }
            write_results_json(results, self.all_results_file())?;
        }

        if format.markdown() {
            self.write_summary(results)?;
            if let Some(report) = batch {
                fs::write(
                    self.batch_report_file(),
                    markdown::generate_batch_report(report),
                )?;
            }
        }

        Ok(())
    }
}

/// Write benchmark results to a JSON file.
pub fn write_results_json(results: &[BenchmarkResult], path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read results from a JSON file.
pub fn read_results_json(path: impl AsRef<Path>) -> Result<Vec<BenchmarkResult>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
