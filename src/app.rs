use std::path::Path;

use eframe::egui;
use rusty_dashboard::config::DashboardConfig;

use crate::state::AppState;
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyDashboardApp {
    pub state: AppState,
}

impl RustyDashboardApp {
    pub fn new(config: &DashboardConfig, initial_file: Option<&Path>) -> Self {
        let mut state = AppState::new(config);
        if let Some(path) = initial_file {
            state.open_path(path);
        }
        Self { state }
    }
}

impl eframe::App for RustyDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Settings changed during the previous frame are applied first, so
        // everything drawn below shows the same working set.
        self.state.refresh_if_changed();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: rows and sorting ----
        egui::SidePanel::left("settings_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            tabs::central_panel(ui, &mut self.state);
        });

        if self.state.refresh_if_changed() {
            ctx.request_repaint();
        }
    }
}
