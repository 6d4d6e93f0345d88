//! Campaign Definitions
//!
//! The two sweep modes of the benchmark suite, expressed as `Campaign`
//! values over one shared abstraction:
//!
//! - Comparison mode: training-size grid × the four algorithm variants
//!   (LSH, CUBE, GNNS, MRNG), each with its fixed argument template.
//! - Hyperparameter mode: one variant, sweeping its own hyperparameter
//!   (`w`, `R`, or `l`) in self-report mode so the executable echoes the
//!   swept value back.

use annsweep_core::{Campaign, SweepAxis, Variant};

use crate::config::SweepConfig;

/// Training sizes swept in comparison mode
const TRAINING_SIZES: &[i64] = &[
    100, 500, 1000, 2000, 5000, 10000, 20000, 30000, 40000, 50000, 60000,
];

/// Window widths swept for LSH and CUBE
const WINDOW_WIDTHS: &[i64] = &[10, 100, 200, 300, 500, 1000, 1500, 2000, 2240, 2500, 3000];

/// Search radii swept for GNNS
const SEARCH_RADII: &[i64] = &[1, 2, 5, 10, 15, 20, 30, 40, 50, 100, 200, 500, 1000, 2000];

/// Candidate-list lengths swept for MRNG
const CANDIDATE_LENGTHS: &[i64] = &[20, 100, 300, 500, 600, 700, 800, 900, 1000, 2000, 2500];

/// Hyperparameter tests known to `annsweep hyper`
pub const HYPER_TESTS: &[&str] = &["lsh", "cube", "graph-gnns", "graph-mrng"];

fn dataset_args(config: &SweepConfig) -> Vec<String> {
    vec![
        "-d".to_string(),
        config.paths.dataset.clone(),
        "-q".to_string(),
        config.paths.queries.clone(),
    ]
}

fn args(config: &SweepConfig, tail: &[&str]) -> Vec<String> {
    let mut args = dataset_args(config);
    args.extend(tail.iter().map(|s| s.to_string()));
    args
}

/// The cross-variant comparison campaign: training sizes × four variants.
pub fn comparison(config: &SweepConfig) -> Campaign {
    Campaign {
        name: "comparison".to_string(),
        axis: SweepAxis {
            label: "Training Size".to_string(),
            echo_key: None,
        },
        grid: TRAINING_SIZES.to_vec(),
        sweep_flag: "-f".to_string(),
        self_report: false,
        variants: vec![
            Variant {
                label: "LSH".to_string(),
                program: "lsh_test".to_string(),
                base_args: args(config, &["-k", "4", "-L", "5", "-N", "3", "-w", "2240"]),
            },
            Variant {
                label: "CUBE".to_string(),
                program: "cube_test".to_string(),
                base_args: args(
                    config,
                    &["-k", "14", "-M", "6000", "-probes", "15", "-N", "3", "-w", "2240"],
                ),
            },
            Variant {
                label: "GNNS".to_string(),
                program: "graph_test".to_string(),
                base_args: args(
                    config,
                    &["-k", "40", "-E", "30", "-R", "10", "-N", "3", "-l", "2000", "-m", "1"],
                ),
            },
            Variant {
                label: "MRNG".to_string(),
                program: "graph_test".to_string(),
                base_args: args(
                    config,
                    &["-k", "40", "-E", "30", "-R", "10", "-N", "3", "-l", "2000", "-m", "2"],
                ),
            },
        ],
        build_target: "tests".to_string(),
        output_subdir: "EVALUATION".to_string(),
    }
}

/// A single-variant hyperparameter campaign for one of [`HYPER_TESTS`].
pub fn hyperparameter(config: &SweepConfig, test: &str) -> anyhow::Result<Campaign> {
    let campaign = match test {
        "lsh" => Campaign {
            name: "lsh".to_string(),
            axis: SweepAxis {
                label: "w".to_string(),
                echo_key: Some("w".to_string()),
            },
            grid: WINDOW_WIDTHS.to_vec(),
            sweep_flag: "-w".to_string(),
            self_report: true,
            variants: vec![Variant {
                label: "LSH".to_string(),
                program: "lsh_test".to_string(),
                base_args: args(config, &["-k", "4", "-L", "5", "-N", "3"]),
            }],
            build_target: "lsh-test".to_string(),
            output_subdir: "LSH".to_string(),
        },
        "cube" => Campaign {
            name: "cube".to_string(),
            axis: SweepAxis {
                label: "w".to_string(),
                echo_key: Some("w".to_string()),
            },
            grid: WINDOW_WIDTHS.to_vec(),
            sweep_flag: "-w".to_string(),
            self_report: true,
            variants: vec![Variant {
                label: "CUBE".to_string(),
                program: "cube_test".to_string(),
                base_args: args(config, &["-k", "14", "-M", "6000", "-probes", "15", "-N", "3"]),
            }],
            build_target: "cube-test".to_string(),
            output_subdir: "CUBE".to_string(),
        },
        "graph-gnns" => Campaign {
            name: "graph-gnns".to_string(),
            axis: SweepAxis {
                label: "R".to_string(),
                echo_key: Some("R".to_string()),
            },
            grid: SEARCH_RADII.to_vec(),
            sweep_flag: "-R".to_string(),
            self_report: true,
            variants: vec![Variant {
                label: "GNNS".to_string(),
                program: "graph_test".to_string(),
                base_args: args(
                    config,
                    &["-k", "40", "-E", "30", "-N", "3", "-l", "10", "-m", "1"],
                ),
            }],
            build_target: "graph-test".to_string(),
            output_subdir: "GNNS".to_string(),
        },
        "graph-mrng" => Campaign {
            name: "graph-mrng".to_string(),
            axis: SweepAxis {
                label: "l".to_string(),
                echo_key: Some("l".to_string()),
            },
            grid: CANDIDATE_LENGTHS.to_vec(),
            sweep_flag: "-l".to_string(),
            self_report: true,
            variants: vec![Variant {
                label: "MRNG".to_string(),
                program: "graph_test".to_string(),
                // MRNG sweeps l at a fixed training size
                base_args: args(
                    config,
                    &["-k", "40", "-E", "30", "-R", "1", "-N", "3", "-m", "2", "-f", "20000"],
                ),
            }],
            build_target: "graph-test".to_string(),
            output_subdir: "MRNG".to_string(),
        },
        other => {
            anyhow::bail!(
                "Unknown hyperparameter test '{}'; expected one of: {}",
                other,
                HYPER_TESTS.join(", ")
            )
        }
    };

    Ok(campaign)
}
