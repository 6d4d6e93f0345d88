#![warn(missing_docs)]
//! AnnSweep Core - Sweep Data Model and Result Aggregation
//!
//! This crate provides the result-aggregation pipeline shared by both sweep
//! modes:
//! - `Campaign` / `Variant` / `RunSpec` for instantiating a parameter grid
//! - `MetricParser` for turning one process's stdout into a validated record
//! - `ResultAggregator` / `ResultsTable` for folding records into a single
//!   ordered table consumed by the report emitters
//!
//! ## Pipeline Overview
//!
//! ```text
//! Campaign (axis + grid + variants)
//!       │
//!       ▼
//! ┌─────────────┐
//! │    grid     │  Instantiate one RunSpec per (sweep value, variant)
//! └──────┬──────┘
//!        │  (external process execution happens in annsweep-cli)
//!        ▼
//! ┌─────────────┐
//! │   metrics   │  Parse key:value stdout, enforce canonical schema
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │    table    │  Append-only ResultsTable, row order = execution order
//! └─────────────┘
//! ```

mod error;
mod grid;
mod metrics;
mod table;

pub use error::SweepError;
pub use grid::{build_plan, Campaign, RunSpec, SweepAxis, Variant};
pub use metrics::{MetricParser, MetricRecord, MetricValue};
pub use table::{ResultAggregator, ResultsTable, Row};
