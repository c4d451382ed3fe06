mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::DashboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let data_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "data".to_string()));
    log::info!("Reading indicator files from {}", data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "World Bank Indicators – Rural Land Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(&data_dir)))),
    )
}
