//! Grid Runner
//!
//! Executes one external process per RunSpec and captures its stdout. The
//! build target runs before the first run; the clean target runs after the
//! last run on every exit path, including after a fatal parse error, via a
//! drop guard.
//!
//! Runs execute strictly sequentially by default. With `jobs > 1` process
//! executions run on a bounded rayon pool, but parsing and table appends
//! stay single-writer: captured outputs are folded back in plan order.

use std::path::PathBuf;
use std::process::Command;

use annsweep_core::{
    build_plan, Campaign, MetricParser, ResultAggregator, ResultsTable, RunSpec, SweepError,
};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Build/clean toolchain boundary (external make targets)
#[derive(Debug, Clone)]
pub struct Toolchain {
    command: Vec<String>,
    directory: PathBuf,
}

impl Toolchain {
    /// Create a toolchain from a command prefix (e.g. "make -s") and the
    /// directory it runs in
    pub fn new(command: &str, directory: impl Into<PathBuf>) -> Self {
        Self {
            command: command.split_whitespace().map(str::to_string).collect(),
            directory: directory.into(),
        }
    }

    /// Invoke `<command> <target>` in the configured directory.
    /// An empty command disables the toolchain entirely.
    pub fn invoke(&self, target: &str) -> Result<(), SweepError> {
        let Some((program, args)) = self.command.split_first() else {
            return Ok(());
        };

        let describe = || format!("{} {}", self.command.join(" "), target);
        debug!(target = target, "invoking toolchain");

        let status = Command::new(program)
            .args(args)
            .arg(target)
            .current_dir(&self.directory)
            .status()
            .map_err(|e| SweepError::Execution {
                run: describe(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(SweepError::Execution {
                run: describe(),
                reason: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

/// Runs the clean target when dropped, so cleanup happens on every exit path
struct CleanGuard<'a>(&'a Toolchain);

impl Drop for CleanGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.0.invoke("clean") {
            warn!("clean step failed: {}", e);
        }
    }
}

/// Executes a campaign's plan and folds the results into a table.
pub struct GridRunner {
    toolchain: Toolchain,
    bin_dir: PathBuf,
    jobs: usize,
}

impl GridRunner {
    /// Create a runner. `jobs == 1` keeps execution strictly sequential.
    pub fn new(toolchain: Toolchain, bin_dir: impl Into<PathBuf>, jobs: usize) -> Self {
        Self {
            toolchain,
            bin_dir: bin_dir.into(),
            jobs: jobs.max(1),
        }
    }

    /// Run the full sweep: build, execute every RunSpec, parse, aggregate,
    /// clean. Any execution/format/schema error aborts the whole sweep; the
    /// error names the offending run.
    pub fn run(&self, campaign: &Campaign) -> anyhow::Result<ResultsTable> {
        self.toolchain
            .invoke(&campaign.build_target)
            .context("build step failed")?;
        let _clean = CleanGuard(&self.toolchain);

        // Absolute executable paths: nothing downstream depends on the CWD
        let bin_dir = self
            .bin_dir
            .canonicalize()
            .unwrap_or_else(|_| self.bin_dir.clone());
        let plan = build_plan(campaign, &bin_dir);

        let outputs = self.capture_all(&plan)?;

        // Single-writer fold, in plan order, regardless of completion order
        let mut parser = MetricParser::for_axis(&campaign.axis);
        let mut aggregator = ResultAggregator::new(&campaign.axis);
        for (spec, stdout) in plan.iter().zip(&outputs) {
            let record = parser
                .parse(stdout)
                .with_context(|| format!("rejecting run {}", spec.describe()))?;
            aggregator
                .append(spec, record)
                .with_context(|| format!("rejecting run {}", spec.describe()))?;
        }

        let table = aggregator.finish();
        debug_assert_eq!(table.rows.len(), campaign.run_count());
        Ok(table)
    }

    /// Capture the stdout of every run, in plan order.
    fn capture_all(&self, plan: &[RunSpec]) -> anyhow::Result<Vec<String>> {
        let pb = ProgressBar::new(plan.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let outputs: Vec<Result<String, SweepError>> = if self.jobs == 1 {
            plan.iter()
                .map(|spec| {
                    pb.set_message(spec.describe());
                    let out = execute_one(spec);
                    pb.inc(1);
                    out
                })
                .collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs.min(plan.len()))
                .build()
                .context("failed to build worker pool")?;
            pool.install(|| {
                plan.par_iter()
                    .map(|spec| {
                        let out = execute_one(spec);
                        pb.inc(1);
                        out
                    })
                    .collect()
            })
        };

        pb.finish_with_message("Complete");

        let mut captured = Vec::with_capacity(outputs.len());
        for out in outputs {
            captured.push(out?);
        }
        Ok(captured)
    }
}

/// Execute one RunSpec and capture its stdout.
///
/// A missing executable, a non-zero exit, or empty stdout is an execution
/// failure — never silently coerced to an empty record.
fn execute_one(spec: &RunSpec) -> Result<String, SweepError> {
    let output = Command::new(&spec.program)
        .args(&spec.args)
        .output()
        .map_err(|e| SweepError::Execution {
            run: spec.describe(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SweepError::Execution {
            run: spec.describe(),
            reason: format!("exited with {} ({})", output.status, stderr.trim()),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if stdout.trim().is_empty() {
        return Err(SweepError::Execution {
            run: spec.describe(),
            reason: "produced no output".to_string(),
        });
    }

    Ok(stdout)
}
