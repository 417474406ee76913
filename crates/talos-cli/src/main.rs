//! `talos-conformance`: run a vector file and optionally write a report.
//!
//! Exit codes: 0 when every vector passes, 1 when any vector fails, 2 when
//! the vector file cannot be loaded or the report cannot be written.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use talos_conformance::{
    format_seconds, ConformanceRunner, RunReport, RunnerConfig, VectorCorpus, DEFAULT_SUITE_NAME,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const EXIT_FAILURES: u8 = 1;
const EXIT_UNUSABLE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Junit,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "talos-conformance", version)]
#[command(about = "Check the Rust Talos SDK against a conformance vector file")]
struct Args {
    /// Path to the test vector JSON file.
    #[arg(long)]
    vectors: PathBuf,

    /// Write a report to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ReportFormat::Junit)]
    format: ReportFormat,

    #[arg(long, default_value = DEFAULT_SUITE_NAME)]
    suite_name: String,

    /// Log filter; `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log);

    let corpus = match VectorCorpus::from_path(&args.vectors) {
        Ok(corpus) => corpus,
        Err(err) => {
            error!(path = %args.vectors.display(), error = %err, "cannot load vectors");
            eprintln!("Error: {err}");
            return ExitCode::from(EXIT_UNUSABLE);
        }
    };

    let runner = ConformanceRunner::new(RunnerConfig {
        suite_name: args.suite_name.clone(),
    });
    let report = runner.run(&corpus);

    for outcome in report.failures() {
        println!(
            "[FAIL] {}: {}",
            outcome.vector_id,
            outcome.failure_detail.as_deref().unwrap_or_default()
        );
    }

    if let Some(path) = &args.report {
        if let Err(err) = write_report(&report, path, args.format) {
            eprintln!("Error: {err:#}");
            return ExitCode::from(EXIT_UNUSABLE);
        }
        println!("Report written to {}", path.display());
    }

    println!(
        "Ran {} tests in {}",
        report.total_count,
        format_seconds(report.total_duration)
    );
    println!("{}", report.summary_line());

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_FAILURES)
    }
}

fn write_report(report: &RunReport, path: &Path, format: ReportFormat) -> Result<()> {
    let body = match format {
        ReportFormat::Junit => report.to_junit_xml(),
        ReportFormat::Json => report.to_json().context("failed to serialize report")?,
    };
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), ?format, "report written");
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
