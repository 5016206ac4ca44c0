use std::path::Path;

use rusty_dashboard::config::DashboardConfig;
use rusty_dashboard::session::{Dashboard, DashboardSession, ViewSettings};
use rusty_dashboard::view::chart::{ChartKind, ChartRequest};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Preview,
    Summary,
    Filter,
    Visualizations,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Preview, Tab::Summary, Tab::Filter, Tab::Visualizations];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Preview => "📋 Preview",
            Tab::Summary => "📊 Summary",
            Tab::Filter => "🔎 Filter",
            Tab::Visualizations => "📈 Visualizations",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table and the user's pipeline settings.
    pub session: DashboardSession,

    /// Views of the current working set (recomputed when settings change).
    pub dashboard: Option<Dashboard>,

    pub tab: Tab,

    /// Chart choices not yet submitted with "Generate Plot".
    pub chart_kind: ChartKind,
    pub chart_x: Option<String>,
    pub chart_y: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Settings the current `dashboard` was computed from.
    computed_for: Option<ViewSettings>,
}

impl AppState {
    pub fn new(config: &DashboardConfig) -> Self {
        let delimiter = config.delimiter().unwrap_or_else(|e| {
            log::error!("{e:#}; using ','");
            b','
        });
        Self {
            session: DashboardSession::new(config, delimiter),
            dashboard: None,
            tab: Tab::Preview,
            chart_kind: ChartKind::default(),
            chart_x: None,
            chart_y: None,
            status_message: None,
            computed_for: None,
        }
    }

    /// Load a file from disk and reset per-file choices.
    pub fn open_path(&mut self, path: &Path) {
        match self.session.load_path(path) {
            Ok(()) => {
                log::info!(
                    "Opened {} ({} tables cached)",
                    path.display(),
                    self.session.cached_tables()
                );
                let first = self
                    .session
                    .table()
                    .and_then(|t| t.column_names().into_iter().next());
                self.chart_x = first.clone();
                self.chart_y = first;
                self.status_message = None;
                self.computed_for = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Submit the chart choices ("Generate Plot").
    pub fn request_chart(&mut self) {
        let Some(y) = self.chart_y.clone() else {
            return;
        };
        let x = if self.chart_kind.needs_x() {
            self.chart_x.as_deref()
        } else {
            None
        };
        self.session.settings.chart = Some(ChartRequest::new(self.chart_kind, x, &y));
    }

    /// Re-run the pipeline if any setting changed since the last run.
    pub fn refresh_if_changed(&mut self) -> bool {
        if self.computed_for.as_ref() == Some(&self.session.settings) {
            return false;
        }
        self.dashboard = self.session.refresh();
        self.computed_for = Some(self.session.settings.clone());
        if let Some(dash) = &self.dashboard {
            log::debug!(
                "Recomputed dashboard: {}/{} rows, {} notices",
                dash.working_set.len(),
                dash.working_set.unfiltered_rows,
                dash.notices.len()
            );
        }
        true
    }

    /// Write the working set to `path`.
    pub fn export_to(&mut self, path: &Path) {
        let Some(dash) = &self.dashboard else {
            return;
        };
        match dash.write_csv(path) {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::error!("Failed to export {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
