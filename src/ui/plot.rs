use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use worldbank_dashboard::{ChartDescriptor, TraceSpec};

use crate::state::AppState;

/// Share of a category slot covered by its bars.
const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Chart plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected chart in the central panel.
pub fn chart_plot(ui: &mut Ui, state: &AppState) {
    let Some(chart) = state.selected_chart() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a folder of indicator files  (File → Open folder…)");
        });
        return;
    };

    ui.heading(display_title(chart.title()));

    let layout = &chart.layout;
    let x_log = layout.x_axis.is_log();
    let y_log = layout.y_axis.is_log();
    let categories = bar_categories(chart);

    let mut plot = Plot::new("chart_plot")
        .legend(Legend::default())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if let Some(title) = &layout.x_axis.title {
        plot = plot.x_axis_label(title.clone());
    }
    if let Some(title) = &layout.y_axis.title {
        plot = plot.y_axis_label(title.clone());
    }

    // Bars put countries at integer x positions; label them by name.
    if !categories.is_empty() {
        let labels = categories.clone();
        plot = plot.x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        });
    } else if x_log {
        plot = plot.x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            log_label(mark.value)
        });
    }
    if y_log {
        plot = plot.y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            log_label(mark.value)
        });
    }

    let bar_count = chart
        .traces
        .iter()
        .filter(|t| matches!(t, TraceSpec::Bar { .. }))
        .count();

    plot.show(ui, |plot_ui| {
        let mut bar_slot = 0;
        for trace in &chart.traces {
            let color = state.color_map.color_for(trace.name());
            match trace {
                TraceSpec::Line { name, x, y } => {
                    let points: PlotPoints = x
                        .iter()
                        .zip(y)
                        .filter_map(|(&xi, yi)| Some([xi as f64, to_axis((*yi)?, y_log)?]))
                        .collect();
                    plot_ui.line(Line::new(points).name(name).color(color).width(2.0));
                }
                TraceSpec::Bar { name, x, y } => {
                    let (offset, width) = bar_offset(bar_slot, bar_count);
                    bar_slot += 1;
                    let bars: Vec<Bar> = x
                        .iter()
                        .zip(y)
                        .filter_map(|(country, value)| {
                            let slot = categories.iter().position(|c| c == country)? as f64;
                            Some(Bar::new(slot + offset, (*value)?).width(width))
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(name).color(color));
                }
                TraceSpec::Markers { name, x, y } => {
                    let points: PlotPoints = x
                        .iter()
                        .zip(y)
                        .filter_map(|(xi, yi)| {
                            Some([to_axis((*xi)?, x_log)?, to_axis((*yi)?, y_log)?])
                        })
                        .collect();
                    plot_ui.points(Points::new(points).name(name).color(color).radius(3.0));
                }
            }
        }
    });
}

// -- helpers --

/// Plot titles carry `<br>` breaks meant for HTML renderers.
pub fn display_title(title: &str) -> String {
    title
        .split("<br>")
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Countries on the x axis of bar traces, in first-seen order.
fn bar_categories(chart: &ChartDescriptor) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for trace in &chart.traces {
        if let TraceSpec::Bar { x, .. } = trace {
            for country in x {
                if !categories.contains(country) {
                    categories.push(country.clone());
                }
            }
        }
    }
    categories
}

/// Position a value on a linear or log10 axis. Non-positive values have no
/// place on a log axis.
fn to_axis(value: f64, log: bool) -> Option<f64> {
    if !log {
        return Some(value);
    }
    (value > 0.0).then(|| value.log10())
}

fn log_label(exponent: f64) -> String {
    format!("{:.2e}", 10f64.powf(exponent))
}

fn category_label(categories: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    categories
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

/// Offset from the category centre and width for bar group `slot` of `count`.
fn bar_offset(slot: usize, count: usize) -> (f64, f64) {
    let width = GROUP_WIDTH / count.max(1) as f64;
    (-GROUP_WIDTH / 2.0 + width * (slot as f64 + 0.5), width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_drops_html_break() {
        assert_eq!(
            display_title("Change in Rural Population <br> (Percent of Total Population)"),
            "Change in Rural Population (Percent of Total Population)"
        );
    }

    #[test]
    fn test_log_axis_skips_non_positive() {
        assert_eq!(to_axis(1000.0, true), Some(3.0));
        assert_eq!(to_axis(0.0, true), None);
        assert_eq!(to_axis(-2.0, false), Some(-2.0));
    }

    #[test]
    fn test_bar_offsets_centre_the_group() {
        let (a, w) = bar_offset(0, 2);
        let (b, _) = bar_offset(1, 2);
        assert!((w - 0.4).abs() < 1e-12);
        assert!((a + 0.2).abs() < 1e-12);
        assert!((b - 0.2).abs() < 1e-12);
        assert_eq!(bar_offset(0, 1), (0.0, GROUP_WIDTH));
    }

    #[test]
    fn test_category_label_only_on_slots() {
        let cats = vec!["China".to_string(), "India".to_string()];
        assert_eq!(category_label(&cats, 1.0), "India");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 5.0), "");
        assert_eq!(category_label(&cats, -1.0), "");
    }
}
