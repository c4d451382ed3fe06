use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use worldbank_dashboard::{ChartDescriptor, TraceSpec};

// ---------------------------------------------------------------------------
// Point table (bottom panel)
// ---------------------------------------------------------------------------

/// One table line: series name, x, y.
type PointRow = [String; 3];

/// Render every point of `chart`, one row per point.
pub fn point_table(ui: &mut Ui, chart: &ChartDescriptor) {
    let rows = point_rows(chart);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Series");
            });
            header.col(|ui| {
                ui.strong(axis_heading(chart.layout.x_axis.title.as_deref(), "x"));
            });
            header.col(|ui| {
                ui.strong(axis_heading(chart.layout.y_axis.title.as_deref(), "y"));
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let cells = &rows[row.index()];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.as_str());
                    });
                }
            });
        });
}

fn axis_heading(title: Option<&str>, fallback: &str) -> String {
    title.unwrap_or(fallback).to_string()
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "–".to_string(), |v| format!("{v}"))
}

/// Flatten all traces of a chart into table rows, trace by trace.
pub fn point_rows(chart: &ChartDescriptor) -> Vec<PointRow> {
    let mut rows = Vec::new();
    for trace in &chart.traces {
        match trace {
            TraceSpec::Line { name, x, y } => {
                for (xi, yi) in x.iter().zip(y) {
                    rows.push([name.clone(), xi.to_string(), format_value(*yi)]);
                }
            }
            TraceSpec::Bar { name, x, y } => {
                for (xi, yi) in x.iter().zip(y) {
                    rows.push([name.clone(), xi.clone(), format_value(*yi)]);
                }
            }
            TraceSpec::Markers { name, x, y } => {
                for (xi, yi) in x.iter().zip(y) {
                    rows.push([name.clone(), format_value(*xi), format_value(*yi)]);
                }
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldbank_dashboard::Layout;

    #[test]
    fn test_point_rows_flatten_traces() {
        let chart = ChartDescriptor {
            traces: vec![
                TraceSpec::Bar {
                    name: "2015".into(),
                    x: vec!["China".into(), "India".into()],
                    y: vec![Some(0.5), None],
                },
                TraceSpec::Line {
                    name: "Japan".into(),
                    x: vec![1990],
                    y: vec![Some(2.0)],
                },
            ],
            layout: Layout::default(),
        };

        let rows = point_rows(&chart);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ["2015".to_string(), "China".into(), "0.5".into()]);
        assert_eq!(rows[1][2], "–");
        assert_eq!(rows[2], ["Japan".to_string(), "1990".into(), "2".into()]);
    }
}
