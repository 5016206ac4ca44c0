mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::RustyDashboardApp;
use eframe::egui;
use rusty_dashboard::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env().unwrap_or_else(|e| {
        log::error!("{e:#}; using default settings");
        DashboardConfig::default()
    });
    // Optional file to open straight away.
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Dashboard – Data Explorer",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(RustyDashboardApp::new(
                &config,
                initial_file.as_deref(),
            )))
        }),
    )
}
