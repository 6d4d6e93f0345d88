//! Cumulative Text Tables
//!
//! Emits one aligned table block per distinct group-by value, in ascending
//! numeric order. Blocks are appended to the report file with a blank-line
//! separator and prior content is never truncated, so successive sweep
//! invocations build up a history.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use annsweep_core::{ResultsTable, SweepError};

/// Append one table block per group-by value to the cumulative report file.
pub fn append_table_report(table: &ResultsTable, path: &Path) -> Result<(), SweepError> {
    let blocks: Vec<String> = table
        .group_values()
        .into_iter()
        .map(|value| render_block(table, value))
        .collect();

    let existing_len = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if existing_len > 0 {
        file.write_all(b"\n\n")?;
    }
    file.write_all(blocks.join("\n\n").as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Render the aligned table for a single group-by value.
///
/// Columns: series label under a `<axis> = <value>` header, then one column
/// per metric key. All cells are right-aligned.
fn render_block(table: &ResultsTable, value: i64) -> String {
    let header = format!("{} = {}", table.axis_label, value);
    let rows: Vec<_> = table.rows_at(value).collect();

    let mut widths = vec![header.len()];
    for key in &table.schema {
        widths.push(key.len());
    }
    for row in &rows {
        widths[0] = widths[0].max(row.series.len());
        for (i, v) in row.values.iter().enumerate() {
            widths[i + 1] = widths[i + 1].max(v.to_string().len());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);

    // Header row
    let mut cells = vec![format!("{:>w$}", header, w = widths[0])];
    for (i, key) in table.schema.iter().enumerate() {
        cells.push(format!("{:>w$}", key, w = widths[i + 1]));
    }
    lines.push(cells.join(" | "));

    // Separator
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(dashes.join("-+-"));

    // Data rows, in execution order within the group
    for row in rows {
        let mut cells = vec![format!("{:>w$}", row.series, w = widths[0])];
        for (i, v) in row.values.iter().enumerate() {
            cells.push(format!("{:>w$}", v.to_string(), w = widths[i + 1]));
        }
        lines.push(cells.join(" | "));
    }

    lines.join("\n")
}
