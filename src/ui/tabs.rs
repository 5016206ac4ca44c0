use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use rusty_dashboard::data::filter::FilterMode;
use rusty_dashboard::session::NoticeLevel;
use rusty_dashboard::view::chart::{ChartKind, PlotHeight};

use super::{panels, plot, table};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Central panel – notices, tab strip and the active tab
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(dash) = &state.dashboard else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Choose a CSV file to explore  (File → Open…)");
        });
        return;
    };

    for notice in &dash.notices {
        let color = match notice.level {
            NoticeLevel::Warning => Color32::from_rgb(230, 160, 0),
            NoticeLevel::Error => Color32::RED,
        };
        ui.label(RichText::new(&notice.message).color(color));
    }

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
    ui.separator();

    match state.tab {
        Tab::Preview => preview_tab(ui, state),
        Tab::Summary => summary_tab(ui, state),
        Tab::Filter => filter_tab(ui, state),
        Tab::Visualizations => {
            ScrollArea::vertical()
                .id_salt("visualizations")
                .show(ui, |ui: &mut Ui| visualizations_tab(ui, state));
        }
    }
}

fn preview_tab(ui: &mut Ui, state: &AppState) {
    let Some(dash) = &state.dashboard else {
        return;
    };
    ui.heading("Data Preview");
    table::data_table(ui, "preview", &dash.preview, f32::INFINITY);
}

fn summary_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Summary");
    ui.checkbox(
        &mut state.session.settings.detailed_stats,
        "Show detailed statistics",
    );
    if let Some(dash) = &state.dashboard {
        table::summary_table(ui, &dash.summary);
    }
}

// ---------------------------------------------------------------------------
// Filter tab
// ---------------------------------------------------------------------------

fn filter_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    let columns = state
        .session
        .table()
        .map(|t| t.column_names())
        .unwrap_or_default();

    let current = state.session.settings.filter.as_ref().map(|f| f.column.clone());
    let mut chosen = current.clone();
    egui::ComboBox::from_label("Select column to filter")
        .selected_text(chosen.clone().unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for col in &columns {
                ui.selectable_value(&mut chosen, Some(col.clone()), col);
            }
        });
    if chosen != current {
        if let Some(col) = &chosen {
            state.session.set_filter_column(col);
        }
    }

    // Choices for a newly picked column arrive with the next refresh.
    let choices = match &state.dashboard {
        Some(dash) if chosen == current => dash.filter_choices.clone(),
        _ => Vec::new(),
    };

    if let Some(filter) = state.session.settings.filter.as_mut() {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Select values (multiple)");
            if ui.small_button("All").clicked() {
                filter.values = choices.iter().cloned().collect();
            }
            if ui.small_button("None").clicked() {
                filter.values.clear();
            }
        });
        ScrollArea::vertical()
            .id_salt("filter_values")
            .max_height(160.0)
            .show(ui, |ui: &mut Ui| {
                for value in &choices {
                    let mut checked = filter.values.contains(value);
                    if ui.checkbox(&mut checked, value.to_string()).changed() {
                        filter.toggle(value);
                    }
                }
            });

        ui.strong("Filter type");
        for mode in [FilterMode::Include, FilterMode::Exclude] {
            ui.radio_value(&mut filter.mode, mode, mode.label());
        }
    }
    ui.separator();

    let mut download = false;
    if let Some(dash) = &state.dashboard {
        ui.label(format!("Filtered Data ({} rows)", dash.working_set.len()));
        table::data_table(ui, "filtered", &dash.working_set.table, 360.0);
        download = ui.button("Download filtered data as CSV").clicked();
    }
    if download {
        panels::save_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// Visualizations tab
// ---------------------------------------------------------------------------

fn column_combo(ui: &mut Ui, label: &str, columns: &[String], selected: &mut Option<String>) {
    egui::ComboBox::from_label(label)
        .selected_text(selected.clone().unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                ui.selectable_value(selected, Some(col.clone()), col);
            }
        });
}

fn visualizations_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Visualization");
    let columns = state
        .session
        .table()
        .map(|t| t.column_names())
        .unwrap_or_default();

    ui.horizontal(|ui: &mut Ui| {
        egui::ComboBox::from_label("Select plot type")
            .selected_text(state.chart_kind.label())
            .show_ui(ui, |ui: &mut Ui| {
                for kind in ChartKind::ALL {
                    ui.selectable_value(&mut state.chart_kind, kind, kind.label());
                }
            });

        let mut height = state.session.settings.plot_height.get();
        let slider = Slider::new(&mut height, PlotHeight::MIN..=PlotHeight::MAX)
            .step_by(PlotHeight::STEP as f64)
            .text("Plot height");
        if ui.add(slider).changed() {
            state.session.settings.plot_height = PlotHeight::new(height);
        }
    });

    if state.chart_kind.needs_x() {
        column_combo(ui, "Select x-axis column", &columns, &mut state.chart_x);
        column_combo(ui, "Select y-axis column", &columns, &mut state.chart_y);
    } else {
        column_combo(ui, "Select column for histogram", &columns, &mut state.chart_y);
    }

    if ui.button("Generate Plot").clicked() {
        state.request_chart();
    }

    if let Some(spec) = state.dashboard.as_ref().and_then(|d| d.chart.as_ref()) {
        plot::chart(ui, spec);
    }

    ui.separator();
    ui.heading("Correlation Heatmap");
    ui.checkbox(
        &mut state.session.settings.show_correlation,
        "Show correlation heatmap",
    );
    if let Some(matrix) = state.dashboard.as_ref().and_then(|d| d.correlation.as_ref()) {
        plot::heatmap(ui, matrix);
    }
}
