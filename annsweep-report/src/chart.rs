//! Per-Metric Line Charts
//!
//! One SVG per metric key: x = group-by axis, one polyline per series label,
//! a circle marker at every sample. Table rows arrive in execution order, so
//! points are explicitly re-sorted ascending by x before rendering.
//! Re-running a sweep overwrites the previous image for each metric.

use std::path::Path;

use annsweep_core::{ResultsTable, SweepError};
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (750, 480);

/// Render one chart per metric key into `out_dir` as `<metric>.svg`.
///
/// The echoed hyperparameter column is the x axis itself, so no chart is
/// rendered for it.
pub fn render_charts(table: &ResultsTable, out_dir: &Path) -> Result<(), SweepError> {
    for (idx, key) in table.schema.iter().enumerate() {
        if table.echo_key.as_deref() == Some(key.as_str()) {
            continue;
        }
        let path = out_dir.join(format!("{}.svg", key));
        render_metric_chart(table, idx, key, &path)?;
    }
    Ok(())
}

/// Points per series for one metric column, sorted ascending by x.
fn sorted_series(table: &ResultsTable, idx: usize) -> Vec<(String, Vec<(f64, f64)>)> {
    table
        .series_labels()
        .into_iter()
        .map(|label| {
            let mut points: Vec<(f64, f64)> = table
                .rows
                .iter()
                .filter(|r| r.series == label)
                .map(|r| (r.sweep_value as f64, r.values[idx].as_f64()))
                .collect();
            points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            (label.to_string(), points)
        })
        .collect()
}

fn render_metric_chart(
    table: &ResultsTable,
    idx: usize,
    key: &str,
    path: &Path,
) -> Result<(), SweepError> {
    let series = sorted_series(table, idx);

    let all_points: Vec<(f64, f64)> = series.iter().flat_map(|(_, p)| p.iter().copied()).collect();
    if all_points.is_empty() {
        return Ok(());
    }

    let (x_range, y_range) = axis_ranges(&all_points);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(key, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_error)?;

    chart
        .configure_mesh()
        .x_desc(table.axis_label.as_str())
        .y_desc(format!("{} values", key))
        .draw()
        .map_err(draw_error)?;

    for (i, (label, points)) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(draw_error)?
            .label(label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
            });

        chart
            .draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))
            .map_err(draw_error)?;
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .draw()
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;
    Ok(())
}

/// Axis ranges with a small padding; degenerate ranges are widened so
/// plotters always gets a non-empty span.
fn axis_ranges(points: &[(f64, f64)]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let x_pad = ((x_max - x_min) * 0.05).max(1.0);
    let y_pad = ((y_max - y_min) * 0.05).max(0.5);
    (
        (x_min - x_pad)..(x_max + x_pad),
        (y_min - y_pad)..(y_max + y_pad),
    )
}

fn draw_error<E: std::error::Error>(e: E) -> SweepError {
    SweepError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        e.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use annsweep_core::{MetricValue, Row};

    fn arrival_order_table() -> ResultsTable {
        // Rows arrive execution-ordered: 500, 100, 1000
        ResultsTable {
            axis_label: "Training Size".to_string(),
            echo_key: None,
            schema: vec!["AAF".to_string()],
            rows: [500, 100, 1000]
                .into_iter()
                .flat_map(|v| {
                    ["LSH", "CUBE"].into_iter().map(move |s| Row {
                        sweep_value: v,
                        series: s.to_string(),
                        values: vec![MetricValue::Float(v as f64 / 100.0)],
                    })
                })
                .collect(),
        }
    }

    #[test]
    fn points_are_sorted_ascending_by_x() {
        let table = arrival_order_table();
        let series = sorted_series(&table, 0);

        assert_eq!(series.len(), 2);
        for (_, points) in &series {
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            assert_eq!(xs, vec![100.0, 500.0, 1000.0]);
        }
    }

    #[test]
    fn one_image_per_metric_key() {
        let mut table = arrival_order_table();
        table.schema.push("MAF".to_string());
        for row in &mut table.rows {
            row.values.push(MetricValue::Float(2.0));
        }

        let dir = tempfile::tempdir().unwrap();
        render_charts(&table, dir.path()).unwrap();

        for key in ["AAF", "MAF"] {
            let path = dir.path().join(format!("{}.svg", key));
            let svg = std::fs::read_to_string(&path).unwrap();
            assert!(svg.contains("<svg"));
        }
    }

    #[test]
    fn echoed_key_column_gets_no_chart() {
        let table = ResultsTable {
            axis_label: "w".to_string(),
            echo_key: Some("w".to_string()),
            schema: vec!["w".to_string(), "AAF".to_string()],
            rows: [10, 100, 1000]
                .into_iter()
                .map(|w| Row {
                    sweep_value: w,
                    series: "LSH".to_string(),
                    values: vec![MetricValue::Int(w), MetricValue::Float(1.2)],
                })
                .collect(),
        };

        let dir = tempfile::tempdir().unwrap();
        render_charts(&table, dir.path()).unwrap();

        assert!(!dir.path().join("w.svg").exists());
        assert!(dir.path().join("AAF.svg").exists());
    }

    #[test]
    fn rerender_overwrites_previous_image() {
        let table = arrival_order_table();
        let dir = tempfile::tempdir().unwrap();

        render_charts(&table, dir.path()).unwrap();
        let first = std::fs::read_to_string(dir.path().join("AAF.svg")).unwrap();
        render_charts(&table, dir.path()).unwrap();
        let second = std::fs::read_to_string(dir.path().join("AAF.svg")).unwrap();

        assert_eq!(first, second);
    }
}
