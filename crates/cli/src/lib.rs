//! CLI for shellbench.
//!
//! This crate provides the `shellbench` command: listing the benchmark
//! cases, running one or all of them, animating comparison figures and
//! showing the resolved configuration.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::{Color, Colorize};
use shellbench_benchmarks::{
    format_thousands, BenchmarkCase, BenchmarkResult, BenchmarkRunner, CaseOutcome, CaseRegistry,
    FigureSet, NativeProvider, OutputFormat, OutputLayout, ResultView, Tier, Timeline,
};
use shellbench_core::config::AppConfig;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Figures animated by `shellbench animate` when none are given:
/// installer sizes in MB of three desktop shells.
pub const DEFAULT_FIGURES: [(&str, u64); 3] = [("Tauri", 12), ("Electron", 130), ("Flutter", 45)];

/// shellbench CLI.
#[derive(Parser, Debug)]
#[command(name = "shellbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./shellbench.toml when present).
    #[arg(short, long, global = true, env = "SHELLBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the registered benchmark cases in batch order.
    List,

    /// Run one case, or every case in order, and write the results.
    ///
    /// Results are written to the configured output directory:
    /// - raw/<case>.json - One JSON file per case
    /// - all_results.json - Combined JSON file
    /// - summary.md - Markdown summary
    /// - batch.md - Batch report (full runs only)
    Run {
        /// Run only this case.
        #[arg(long)]
        case: Option<String>,

        /// Output directory override.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: json, markdown, or both.
        #[arg(short, long, default_value = "both")]
        format: OutputFormat,

        /// Print results without writing any file.
        #[arg(long)]
        no_write: bool,

        /// Verbose output.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Animate counters from zero to their targets.
    Animate {
        /// Figure as NAME=VALUE; may be repeated.
        #[arg(long = "figure", value_parser = parse_figure)]
        figures: Vec<(String, u64)>,
    },

    /// Show configuration and output locations.
    Status {
        /// Print the full resolved configuration.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Parse a `NAME=VALUE` figure argument.
pub fn parse_figure(raw: &str) -> Result<(String, u64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing figure name in '{raw}'"));
    }
    let value = value
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid value in '{raw}': {e}"))?;
    Ok((name.to_string(), value))
}

/// Terminal colour for a tier.
pub fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::VeryFast => Color::Green,
        Tier::Fast => Color::Blue,
        Tier::Moderate => Color::Yellow,
        Tier::Slow => Color::Red,
    }
}

/// One formatted result line.
pub fn render_result(result: &BenchmarkResult) -> String {
    let view = ResultView::from(result);
    format!(
        "{:<10} {:>12} iters  {:>10}  {:>16} ops/s  {:<9}  result {}",
        view.name,
        view.workload,
        view.time,
        view.ops_per_second,
        view.tier.label().color(tier_color(view.tier)),
        view.result_value
    )
}

/// One numbered line of `shellbench list`.
pub fn render_case(index: usize, case: &BenchmarkCase) -> String {
    format!(
        "{:>2}. {:<10} {:>12} iters  {}",
        index + 1,
        case.name,
        format_thousands(case.workload_size),
        case.description
    )
}

fn render_outcome(outcome: &CaseOutcome) -> String {
    match outcome.as_result() {
        Ok(result) => render_result(result),
        Err(message) => format!("{:<10} {} {}", outcome.case_name, "failed:".red(), message.red()),
    }
}

/// Run the CLI with the process arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    shellbench_core::telemetry::init(&config)?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::List => {
            for (index, case) in CaseRegistry::default().iter().enumerate() {
                println!("{}", render_case(index, case));
            }
            Ok(())
        }
        Commands::Run {
            case,
            output,
            format,
            no_write,
            verbose,
        } => {
            let runner = BenchmarkRunner::new(
                NativeProvider::new(),
                Default::default(),
                config.runner.clone(),
            );

            let batch = match case {
                Some(name) => {
                    if verbose {
                        println!("Running {name}...");
                    }
                    let outcome = runner.run_one(&name).await?;
                    println!("{}", render_outcome(&outcome));
                    None
                }
                None => {
                    if verbose {
                        println!("Running {} benchmarks...", runner.registry().len());
                    }
                    let report = runner.run_all().await?;
                    for outcome in &report.outcomes {
                        println!("{}", render_outcome(outcome));
                    }
                    println!(
                        "Completed {} of {} benchmarks",
                        report.succeeded,
                        report.outcomes.len()
                    );
                    Some(report)
                }
            };

            if no_write {
                return Ok(());
            }

            let results = runner.results();
            if results.is_empty() {
                bail!("no benchmark completed; nothing written");
            }
            let layout = OutputLayout::new(output.unwrap_or_else(|| config.output.dir.clone().into()));
            layout
                .write_all(&results, batch.as_ref(), format)
                .with_context(|| format!("writing results to {}", layout.dir().display()))?;
            println!("Results written to {}", layout.dir().display());

            if verbose {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            Ok(())
        }
        Commands::Animate { figures } => {
            let template = Timeline::from_config(0, &config.animation)?;
            let mut set = FigureSet::new(template);
            if figures.is_empty() {
                for (name, target) in DEFAULT_FIGURES {
                    set.insert(name, target);
                }
            } else {
                for (name, target) in figures {
                    set.insert(name, target);
                }
            }

            set.start_all();
            let mut ticker = tokio::time::interval(template.tick_interval());
            let mut stdout = std::io::stdout();
            loop {
                ticker.tick().await;
                let line = set
                    .snapshot()
                    .iter()
                    .map(|(name, value)| format!("{name}: {value:>6}"))
                    .collect::<Vec<_>>()
                    .join("   ");
                write!(stdout, "\r{line}")?;
                stdout.flush()?;
                if !set.is_active() {
                    break;
                }
            }
            writeln!(stdout)?;
            Ok(())
        }
        Commands::Status { detailed } => {
            let layout = OutputLayout::new(config.output.dir.clone());
            println!("shellbench benchmark system");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("\nOutput files:");
            println!("  - {}", layout.all_results_file().display());
            println!("  - {}", layout.summary_file().display());
            println!("  - {}", layout.batch_report_file().display());
            println!("  - {}/<case>.json", layout.raw_dir().display());

            if detailed {
                println!("\nConfiguration:");
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            Ok(())
        }
    }
}
