#![warn(missing_docs)]
//! AnnSweep Report - Sweep Report Emitters
//!
//! Re-materializes a frozen `ResultsTable` into three artifacts:
//! - Text tables, one block per group-by value, appended to a cumulative file
//! - One line chart per metric key, overwritten each run
//! - A sectioned flat CSV file, overwritten each run
//!
//! All emitters are pure functions of the table plus its axis configuration;
//! the only side effects are the file writes. An I/O failure aborts the
//! affected emitter only — artifacts already written stay valid.

mod chart;
mod csv;
mod table;

pub use chart::render_charts;
pub use csv::write_csv_report;
pub use table::append_table_report;
