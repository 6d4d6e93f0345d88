//! Sweep Grid Instantiation
//!
//! Builds the execution plan for a campaign: one `RunSpec` per
//! (sweep value, variant) pair, in grid-major order. Comparison campaigns
//! sweep a training-size grid over several variants; hyperparameter
//! campaigns sweep one hyperparameter over a single variant.
//!
//! RunSpecs carry absolute executable paths so no component depends on the
//! working directory.

use std::path::{Path, PathBuf};

/// One benchmark algorithm family with its argument template
#[derive(Debug, Clone)]
pub struct Variant {
    /// Series label used in every report artifact (e.g. "LSH")
    pub label: String,
    /// Executable file name inside the bin directory (e.g. "lsh_test")
    pub program: String,
    /// Fixed flags, excluding the swept flag
    pub base_args: Vec<String>,
}

/// The independent variable varied across runs
#[derive(Debug, Clone)]
pub struct SweepAxis {
    /// Axis label for report headers (e.g. "Training Size" or "w")
    pub label: String,
    /// Key under which self-report mode echoes the swept value back,
    /// if the campaign runs with `-s`
    pub echo_key: Option<String>,
}

/// A full sweep campaign: axis, grid, variants, and instantiation rules
#[derive(Debug, Clone)]
pub struct Campaign {
    /// Campaign name (e.g. "comparison", "lsh")
    pub name: String,
    /// Group-by axis shared by all report emitters
    pub axis: SweepAxis,
    /// Ordered sweep values (the ParameterGrid)
    pub grid: Vec<i64>,
    /// Flag the sweep value is passed under (e.g. "-f", "-w")
    pub sweep_flag: String,
    /// Whether to append `-s` so the executable echoes the swept key
    pub self_report: bool,
    /// Variants to run at every sweep value; a single variant in
    /// hyperparameter mode
    pub variants: Vec<Variant>,
    /// Make target that builds the executables for this campaign
    pub build_target: String,
    /// Subdirectory of the output root the artifacts go to
    pub output_subdir: String,
}

impl Campaign {
    /// Number of runs a full sweep of this campaign performs
    pub fn run_count(&self) -> usize {
        self.grid.len() * self.variants.len()
    }
}

/// A fully-instantiated invocation. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Sweep value this run was instantiated at
    pub sweep_value: i64,
    /// Series label inherited from the variant
    pub label: String,
    /// Absolute path to the executable
    pub program: PathBuf,
    /// Complete argument list
    pub args: Vec<String>,
}

impl RunSpec {
    /// Short description used in error messages and progress output
    pub fn describe(&self) -> String {
        format!("{} @ {}", self.label, self.sweep_value)
    }
}

/// Build the execution plan for a campaign.
///
/// Runs are ordered grid-major: all variants at the first sweep value, then
/// all variants at the second, and so on. This order is what the results
/// table preserves; presentation order is the emitters' concern.
pub fn build_plan(campaign: &Campaign, bin_dir: &Path) -> Vec<RunSpec> {
    let mut plan = Vec::with_capacity(campaign.run_count());

    for &value in &campaign.grid {
        for variant in &campaign.variants {
            let mut args = variant.base_args.clone();
            args.push(campaign.sweep_flag.clone());
            args.push(value.to_string());
            if campaign.self_report {
                args.push("-s".to_string());
            }

            plan.push(RunSpec {
                sweep_value: value,
                label: variant.label.clone(),
                program: bin_dir.join(&variant.program),
                args,
            });
        }
    }

    plan
}
