//! Sectioned CSV Output
//!
//! One section per distinct group-by value: a header line naming the axis
//! value and the metric columns, one line per row (series label plus values),
//! then a blank line. The file is overwritten each run — the text table is
//! the artifact that keeps history.
//!
//! No escaping is needed: every field is numeric or a short alphanumeric
//! token.

use std::path::Path;

use annsweep_core::{ResultsTable, SweepError};

/// Write the sectioned CSV file, replacing any previous content.
pub fn write_csv_report(table: &ResultsTable, path: &Path) -> Result<(), SweepError> {
    let mut out = String::new();

    for value in table.group_values() {
        out.push_str(&format!(
            "{}={},{}\n",
            table.axis_label,
            value,
            table.schema.join(",")
        ));

        for row in table.rows_at(value) {
            let values: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
            out.push_str(&format!("{},{}\n", row.series, values.join(",")));
        }

        out.push('\n');
    }

    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use annsweep_core::{MetricValue, Row};

    fn sample_table() -> ResultsTable {
        ResultsTable {
            axis_label: "Training Size".to_string(),
            echo_key: None,
            schema: vec!["AAF".to_string(), "MAF".to_string()],
            rows: [500, 100, 1000]
                .into_iter()
                .flat_map(|v| {
                    ["LSH", "CUBE"].into_iter().map(move |s| Row {
                        sweep_value: v,
                        series: s.to_string(),
                        values: vec![
                            MetricValue::Float(v as f64 / 100.0),
                            MetricValue::Float(2.0),
                        ],
                    })
                })
                .collect(),
        }
    }

    #[test]
    fn sections_are_ascending_and_blank_line_separated() {
        let table = sample_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.csv");

        write_csv_report(&table, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        let headers: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("Training Size="))
            .collect();
        assert_eq!(
            headers,
            vec![
                "Training Size=100,AAF,MAF",
                "Training Size=500,AAF,MAF",
                "Training Size=1000,AAF,MAF",
            ]
        );
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn section_bodies_recover_the_row_multiset() {
        let table = sample_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.csv");

        write_csv_report(&table, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        // Reparse: section header carries the group value, body lines the rows
        let mut recovered: Vec<(i64, String, Vec<f64>)> = Vec::new();
        let mut current_value = 0i64;
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix("Training Size=") {
                current_value = rest.split(',').next().unwrap().parse().unwrap();
            } else {
                let mut fields = line.split(',');
                let series = fields.next().unwrap().to_string();
                let values: Vec<f64> = fields.map(|f| f.parse().unwrap()).collect();
                recovered.push((current_value, series, values));
            }
        }

        let mut expected: Vec<(i64, String, Vec<f64>)> = table
            .rows
            .iter()
            .map(|r| {
                (
                    r.sweep_value,
                    r.series.clone(),
                    r.values.iter().map(|v| v.as_f64()).collect(),
                )
            })
            .collect();

        recovered.sort_by(|a, b| a.partial_cmp(b).unwrap());
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(recovered, expected);
    }

    #[test]
    fn rerun_overwrites_the_file() {
        let table = sample_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.csv");

        write_csv_report(&table, &path).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        write_csv_report(&table, &path).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
    }
}
