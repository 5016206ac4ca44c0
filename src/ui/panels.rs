use eframe::egui::{self, Color32, RichText, Slider, Ui};
use rusty_dashboard::data::export::DOWNLOAD_FILE_NAME;
use rusty_dashboard::view::preview::PreviewRows;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – rows and sorting
// ---------------------------------------------------------------------------

/// Render the left settings panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard Settings");
    ui.separator();

    let columns = match state.session.table() {
        Some(table) => table.column_names(),
        None => {
            ui.label("No file loaded.");
            return;
        }
    };
    let settings = &mut state.session.settings;

    ui.strong("Number of rows to display");
    let mut rows = settings.preview_rows.get();
    let slider = Slider::new(&mut rows, PreviewRows::MIN..=PreviewRows::MAX)
        .step_by(PreviewRows::STEP as f64);
    if ui.add(slider).changed() {
        settings.preview_rows = PreviewRows::new(rows);
    }
    ui.add_space(8.0);

    ui.strong("Sort data by");
    let selected = settings.sort.column.clone().unwrap_or_else(|| "None".to_string());
    egui::ComboBox::from_id_salt("sort_column")
        .selected_text(selected)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut settings.sort.column, None, "None");
            for col in &columns {
                ui.selectable_value(&mut settings.sort.column, Some(col.clone()), col);
            }
        });

    ui.strong("Sort order");
    ui.radio_value(&mut settings.sort.ascending, true, "Ascending");
    ui.radio_value(&mut settings.sort.ascending, false, "Descending");
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_save = state.dashboard.is_some();
            if ui
                .add_enabled(can_save, egui::Button::new("Download filtered data…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        match (state.session.source_name(), &state.dashboard) {
            (Some(name), Some(dash)) => {
                ui.label(format!(
                    "{name}: {} rows loaded, {} in working set",
                    dash.working_set.unfiltered_rows,
                    dash.working_set.len()
                ));
            }
            _ => {
                ui.label("Waiting on file upload...");
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open data file")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(DOWNLOAD_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
