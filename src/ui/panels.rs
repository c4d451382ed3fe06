use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::plot::display_title;

// ---------------------------------------------------------------------------
// Left side panel – chart list and country legend
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Charts");
    ui.separator();

    if state.charts.is_empty() {
        ui.label("No charts loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let titles: Vec<String> = state
                .charts
                .iter()
                .map(|c| display_title(c.title()))
                .collect();

            for (i, title) in titles.iter().enumerate() {
                if ui
                    .selectable_label(state.selected == i, format!("{}. {title}", i + 1))
                    .clicked()
                {
                    state.selected = i;
                }
            }

            ui.separator();
            ui.strong("Legend");
            for (name, color) in state.color_map.legend_entries() {
                ui.label(RichText::new(format!("■ {name}")).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.data_dir.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                if let Some(dir) = state.data_dir.clone() {
                    state.load_data_dir(&dir);
                }
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.charts.is_empty(), egui::Button::new("Export JSON…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(dir) = &state.data_dir {
            ui.label(format!("{} charts from {}", state.charts.len(), dir.display()));
        }

        ui.separator();

        if ui.selectable_label(state.show_table, "Point table").clicked() {
            state.show_table = !state.show_table;
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open folder of World Bank indicator files")
        .pick_folder();

    if let Some(dir) = folder {
        state.load_data_dir(&dir);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export charts as JSON")
        .set_file_name("figures.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        state.export_json(&path);
    }
}
