mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod error;
mod format;
mod state;
mod ui;

use std::path::PathBuf;

use app::ExportDashApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional first argument: dataset to open on start.
    let dataset_arg = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DashboardConfig::discover(dataset_arg.clone()).unwrap_or_else(|e| {
        log::error!("{e}; continuing with default settings");
        DashboardConfig {
            dataset_path: dataset_arg,
            ..DashboardConfig::default()
        }
    });

    let mut state = AppState::new(config);
    if let Some(path) = state.config.dataset_path.clone() {
        state.open(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Export Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(ExportDashApp::new(state)))),
    )
}
