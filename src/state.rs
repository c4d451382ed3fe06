use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use worldbank_dashboard::{figures, ChartDescriptor, DashboardConfig, FigureAssembler};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Folder the current charts were built from.
    pub data_dir: Option<PathBuf>,

    /// The assembled charts; empty until a folder loads completely.
    pub charts: Vec<ChartDescriptor>,

    /// Index into `charts` of the chart in the central panel.
    pub selected: usize,

    /// Colour per trace name, shared across charts.
    pub color_map: ColorMap,

    /// Show the point table under the plot.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Assemble the dashboard from `dir`. On failure every chart is dropped.
    pub fn load_data_dir(&mut self, dir: &Path) {
        match assemble(dir) {
            Ok(charts) => {
                log::info!("Loaded {} charts from {}", charts.len(), dir.display());
                self.set_charts(charts);
                self.data_dir = Some(dir.to_path_buf());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to build charts: {e:#}");
                self.set_charts(Vec::new());
                self.data_dir = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a chart list and rebuild colours.
    pub fn set_charts(&mut self, charts: Vec<ChartDescriptor>) {
        self.color_map = ColorMap::from_charts(&charts);
        self.charts = charts;
        self.selected = 0;
    }

    /// The chart shown in the central panel.
    pub fn selected_chart(&self) -> Option<&ChartDescriptor> {
        self.charts.get(self.selected)
    }

    /// Write all charts as plotly JSON.
    pub fn export_json(&mut self, path: &Path) {
        let result = figures::to_json(&self.charts)
            .context("serializing charts")
            .and_then(|json| {
                std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
            });
        match result {
            Ok(()) => {
                log::info!("Exported {} charts to {}", self.charts.len(), path.display());
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn assemble(dir: &Path) -> Result<Vec<ChartDescriptor>> {
    let config = DashboardConfig::for_data_dir(dir)
        .with_context(|| format!("reading configuration in {}", dir.display()))?;
    FigureAssembler::new(config)
        .assemble()
        .context("assembling charts")
}
