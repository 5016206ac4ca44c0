use eframe::egui::{Id, Ui};
use egui_extras::{Column, TableBuilder};
use rusty_dashboard::data::model::{CellValue, Table};
use rusty_dashboard::view::summary::{Summary, STAT_LABELS};

const ROW_HEIGHT: f32 = 18.0;

fn cell_label(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => "None".to_string(),
        other => other.to_string(),
    }
}

/// Scrollable grid of a table's rows, with a leading row-number column.
pub fn data_table(ui: &mut Ui, id: &str, table: &Table, max_height: f32) {
    if table.width() == 0 {
        ui.label("No columns.");
        return;
    }
    let headers = table.column_names();

    ui.push_id(Id::new(id), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(max_height)
            .column(Column::auto().at_least(32.0))
            .columns(Column::auto().at_least(60.0), headers.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for name in &headers {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let i = row.index();
                    row.col(|ui| {
                        ui.weak(i.to_string());
                    });
                    for cell in table.row(i) {
                        row.col(|ui| {
                            ui.label(cell_label(cell));
                        });
                    }
                });
            });
    });
}

/// One row per described column, one column per statistic that applies to
/// at least one of them.
pub fn summary_table(ui: &mut Ui, summary: &Summary) {
    if summary.is_empty() {
        ui.label("Nothing to describe.");
        return;
    }
    let labels: Vec<&str> = STAT_LABELS
        .iter()
        .copied()
        .filter(|label| {
            summary
                .columns
                .iter()
                .any(|c| !c.display_stat(label).is_empty())
        })
        .collect();

    ui.push_id(Id::new("summary_table"), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto().at_least(80.0))
            .columns(Column::auto().at_least(60.0), labels.len())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("column");
                });
                for label in &labels {
                    header.col(|ui| {
                        ui.strong(*label);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, summary.columns.len(), |mut row| {
                    let col = &summary.columns[row.index()];
                    row.col(|ui| {
                        ui.strong(&col.name);
                    });
                    for label in &labels {
                        row.col(|ui| {
                            ui.label(col.display_stat(label));
                        });
                    }
                });
            });
    });
}
