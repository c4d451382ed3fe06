use std::path::Path;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Start with the charts of `data_dir` already assembled (or an error
    /// message if that folder is incomplete).
    pub fn new(data_dir: &Path) -> Self {
        let mut state = AppState::default();
        state.load_data_dir(data_dir);
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: chart list and legend ----
        egui::SidePanel::left("chart_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: point table ----
        if self.state.show_table {
            if let Some(chart) = self.state.selected_chart() {
                egui::TopBottomPanel::bottom("point_table")
                    .resizable(true)
                    .default_height(220.0)
                    .show(ctx, |ui| {
                        table::point_table(ui, chart);
                    });
            }
        }

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_plot(ui, &self.state);
        });
    }
}
