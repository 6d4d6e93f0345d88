//! Sweep Error Taxonomy
//!
//! All failures in the pipeline fall into four categories. Execution,
//! format, and schema errors are fatal to the whole sweep; I/O errors
//! abort only the report artifact being written.

use thiserror::Error;

/// Errors produced by the sweep pipeline
#[derive(Debug, Error)]
pub enum SweepError {
    /// The external executable was missing, exited non-zero, or wrote no output
    #[error("Failed to execute {run}: {reason}")]
    Execution {
        /// Which run failed (variant label plus sweep value)
        run: String,
        /// What went wrong (spawn error, exit status, empty stdout)
        reason: String,
    },

    /// A stdout line does not match the `key:value` numeric shape
    #[error("Malformed metric line {line:?}: expected key:value with a numeric value")]
    Format {
        /// The offending line, verbatim
        line: String,
    },

    /// A run's key set differs from the canonical schema established by the
    /// first successfully parsed run
    #[error("Metric schema mismatch: expected [{expected}], got [{got}]")]
    Schema {
        /// Canonical key set, comma-joined
        expected: String,
        /// Key set of the rejected run, comma-joined
        got: String,
    },

    /// An output artifact could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
