//! Configuration loading from sweep.toml
//!
//! Sweep configuration can be specified in a `sweep.toml` file, discovered by
//! walking up from the current directory. Every field has a default matching
//! the canonical dataset layout, so the file is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// AnnSweep configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SweepConfig {
    /// Dataset and output paths
    #[serde(default)]
    pub paths: PathsConfig,
    /// Build/clean toolchain configuration
    #[serde(default)]
    pub build: BuildConfig,
    /// Run execution configuration
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Dataset and output paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Training dataset passed to every executable via `-d`
    #[serde(default = "default_dataset")]
    pub dataset: String,
    /// Query dataset passed via `-q`
    #[serde(default = "default_queries")]
    pub queries: String,
    /// Directory holding the built benchmark executables
    #[serde(default = "default_bin_dir")]
    pub bin_dir: String,
    /// Root directory for report artifacts; each campaign writes to its own
    /// subdirectory underneath
    #[serde(default = "default_output_root")]
    pub output_root: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            queries: default_queries(),
            bin_dir: default_bin_dir(),
            output_root: default_output_root(),
        }
    }
}

fn default_dataset() -> String {
    "datasets/train-images.idx3-ubyte".to_string()
}
fn default_queries() -> String {
    "datasets/t10k-images.idx3-ubyte".to_string()
}
fn default_bin_dir() -> String {
    "bin".to_string()
}
fn default_output_root() -> String {
    ".".to_string()
}

/// Build/clean toolchain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Command prefix invoked with the campaign's build target and, on exit,
    /// with "clean" (e.g. "make -s")
    #[serde(default = "default_make")]
    pub command: String,
    /// Directory the build command runs in (where the Makefile lives)
    #[serde(default = "default_build_dir")]
    pub directory: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_make(),
            directory: default_build_dir(),
        }
    }
}

fn default_make() -> String {
    "make -s".to_string()
}
fn default_build_dir() -> String {
    ".".to_string()
}

/// Run execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of concurrent process executions (1 = strictly sequential)
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
        }
    }
}

fn default_jobs() -> usize {
    1
}

impl SweepConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("sweep.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# AnnSweep Configuration

[paths]
# Training dataset (-d) and query dataset (-q)
dataset = "datasets/train-images.idx3-ubyte"
queries = "datasets/t10k-images.idx3-ubyte"
# Directory holding the built benchmark executables
bin_dir = "bin"
# Root for report artifacts (EVALUATION/, LSH/, CUBE/, GNNS/, MRNG/)
output_root = "."

[build]
# Invoked as "<command> <target>" before the sweep and "<command> clean" after
command = "make -s"
# Directory the build command runs in
directory = "."

[runner]
# Concurrent process executions; 1 keeps runs strictly sequential
jobs = 1
"#
        .to_string()
    }
}
