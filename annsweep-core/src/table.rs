//! Results Table and Aggregation
//!
//! An explicit, append-only table value owned by the aggregator and threaded
//! through the pipeline. Row order equals append order, which equals the
//! grid-iteration order chosen by the runner. Emitters must not assume
//! value-sorted order.

use crate::error::SweepError;
use crate::grid::{RunSpec, SweepAxis};
use crate::metrics::{MetricRecord, MetricValue};

/// One table row: sweep value, series label, metric values in canonical order
#[derive(Debug, Clone)]
pub struct Row {
    /// Group-by axis value this run was instantiated at
    pub sweep_value: i64,
    /// Series label (variant label)
    pub series: String,
    /// Metric values in canonical schema order
    pub values: Vec<MetricValue>,
}

/// Ordered sequence of rows, one per RunSpec, frozen before any emitter runs
#[derive(Debug, Clone)]
pub struct ResultsTable {
    /// Group-by axis label
    pub axis_label: String,
    /// Schema key under which self-report mode echoed the swept value,
    /// if the sweep ran with `-s`
    pub echo_key: Option<String>,
    /// Canonical metric keys, column order of every row
    pub schema: Vec<String>,
    /// Rows in execution order
    pub rows: Vec<Row>,
}

impl ResultsTable {
    /// Distinct group-by values in ascending numeric order
    pub fn group_values(&self) -> Vec<i64> {
        let mut values: Vec<i64> = self.rows.iter().map(|r| r.sweep_value).collect();
        values.sort_unstable();
        values.dedup();
        values
    }

    /// Rows at a given group-by value, in execution order
    pub fn rows_at(&self, value: i64) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |r| r.sweep_value == value)
    }

    /// Distinct series labels in first-appearance order
    pub fn series_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !labels.contains(&row.series.as_str()) {
                labels.push(&row.series);
            }
        }
        labels
    }
}

/// Folds one (RunSpec, MetricRecord) pair at a time into the table.
///
/// Purely append-only: no sorting, no deduplication, no index lookup.
#[derive(Debug)]
pub struct ResultAggregator {
    table: ResultsTable,
}

impl ResultAggregator {
    /// Create an aggregator for a sweep over the given axis
    pub fn new(axis: &SweepAxis) -> Self {
        Self {
            table: ResultsTable {
                axis_label: axis.label.clone(),
                echo_key: axis.echo_key.clone(),
                schema: Vec::new(),
                rows: Vec::new(),
            },
        }
    }

    /// Append exactly one row. The first record fixes the table schema;
    /// later records must carry the same key set.
    pub fn append(&mut self, spec: &RunSpec, record: MetricRecord) -> Result<(), SweepError> {
        let keys: Vec<String> = record.keys().map(str::to_string).collect();
        if self.table.schema.is_empty() {
            self.table.schema = keys;
        } else if self.table.schema != keys {
            return Err(SweepError::Schema {
                expected: self.table.schema.join(", "),
                got: keys.join(", "),
            });
        }

        self.table.rows.push(Row {
            sweep_value: spec.sweep_value,
            series: spec.label.clone(),
            values: record.values().collect(),
        });
        Ok(())
    }

    /// Freeze the table. Emitters consume it read-only after this point.
    pub fn finish(self) -> ResultsTable {
        self.table
    }
}
