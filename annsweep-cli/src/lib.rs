#![warn(missing_docs)]
//! AnnSweep CLI Library
//!
//! Command-line front end for the sweep pipeline: parses arguments, loads
//! `sweep.toml`, selects and filters a campaign, drives the `GridRunner`,
//! and hands the frozen results table to the report emitters.

mod campaign;
mod config;
mod runner;

pub use campaign::{comparison, hyperparameter, HYPER_TESTS};
pub use config::{BuildConfig, PathsConfig, RunnerConfig, SweepConfig};
pub use runner::{GridRunner, Toolchain};

use std::path::{Path, PathBuf};

use annsweep_core::{build_plan, Campaign, ResultsTable};
use annsweep_report::{append_table_report, render_charts, write_csv_report};
use anyhow::Context;
use clap::{Parser, Subcommand};
use regex::Regex;

/// AnnSweep CLI arguments
#[derive(Parser, Debug)]
#[command(name = "annsweep")]
#[command(author, version, about = "Parameter-sweep benchmarks for ANN search executables")]
pub struct Cli {
    /// Sweep mode; defaults to the cross-variant comparison
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Filter variants by regex on their series label
    #[arg(long, default_value = ".*")]
    pub filter: String,

    /// Output root directory (overrides sweep.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List the execution plan without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Concurrent process executions (1 = strictly sequential);
    /// overrides sweep.toml when passed
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sweep training sizes across all four variants (default)
    Comparison,
    /// Sweep one variant's own hyperparameter in self-report mode
    Hyper {
        /// Which test to sweep: lsh, cube, graph-gnns, graph-mrng
        test: String,
    },
}

/// Run the AnnSweep CLI. This is the binary's entire entry point.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the AnnSweep CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("annsweep=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("annsweep=info")
            .init();
    }

    // Discover sweep.toml configuration (CLI flags override)
    let config = SweepConfig::discover().unwrap_or_default();
    let jobs = effective_jobs(&cli, &config);

    let mut campaign = match &cli.command {
        Some(Commands::Hyper { test }) => campaign::hyperparameter(&config, test)?,
        Some(Commands::Comparison) | None => campaign::comparison(&config),
    };
    apply_filter(&mut campaign, &cli.filter)?;

    if cli.dry_run {
        print_plan(&campaign, Path::new(&config.paths.bin_dir));
        return Ok(());
    }

    let toolchain = Toolchain::new(&config.build.command, &config.build.directory);
    let runner = GridRunner::new(toolchain, &config.paths.bin_dir, jobs);
    let table = runner.run(&campaign)?;

    let root = cli
        .output
        .unwrap_or_else(|| PathBuf::from(&config.paths.output_root));
    let out_dir = root.join(&campaign.output_subdir);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    emit_reports(&table, &out_dir)
}

/// An explicit `--jobs` flag wins over sweep.toml, even `--jobs 1`.
fn effective_jobs(cli: &Cli, config: &SweepConfig) -> usize {
    cli.jobs.unwrap_or(config.runner.jobs)
}

/// Retain only the variants whose label matches the filter regex.
fn apply_filter(campaign: &mut Campaign, filter: &str) -> anyhow::Result<()> {
    if filter == ".*" {
        return Ok(());
    }
    let re = Regex::new(filter).context("invalid --filter regex")?;
    campaign.variants.retain(|v| re.is_match(&v.label));
    anyhow::ensure!(
        !campaign.variants.is_empty(),
        "no variant matches filter '{}'",
        filter
    );
    Ok(())
}

fn print_plan(campaign: &Campaign, bin_dir: &Path) {
    let plan = build_plan(campaign, bin_dir);
    println!("Sweep plan: {} ({} runs)", campaign.name, plan.len());
    for spec in &plan {
        println!(
            "  {} {} {}",
            spec.describe(),
            spec.program.display(),
            spec.args.join(" ")
        );
    }
}

/// Emit all three artifacts into `out_dir`. An I/O failure aborts only
/// the affected emitter; artifacts already written stay valid.
pub fn emit_reports(table: &ResultsTable, out_dir: &Path) -> anyhow::Result<()> {
    let mut failures = 0;

    match append_table_report(table, &out_dir.join("table.md")) {
        Ok(()) => println!("Tables were saved"),
        Err(e) => {
            eprintln!("Failed to write tables: {}", e);
            failures += 1;
        }
    }

    match render_charts(table, out_dir) {
        Ok(()) => println!("Line charts were saved"),
        Err(e) => {
            eprintln!("Failed to render charts: {}", e);
            failures += 1;
        }
    }

    match write_csv_report(table, &out_dir.join("eval.csv")) {
        Ok(()) => println!("CSV file was saved"),
        Err(e) => {
            eprintln!("Failed to write CSV: {}", e);
            failures += 1;
        }
    }

    anyhow::ensure!(failures == 0, "{} report artifact(s) failed", failures);
    Ok(())
}
