use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{format_number, MovieTable};
use crate::data::stats::{SummaryTable, SUMMARY_ROWS};

const ROW_HEIGHT: f32 = 20.0;
const MAX_TABLE_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Movie rows
// ---------------------------------------------------------------------------

/// Render the given rows of `table` with every column.
pub fn movie_table(ui: &mut Ui, id: &str, table: &MovieTable, rows: &[usize]) {
    if rows.is_empty() {
        ui.weak("No movies match.");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(36.0))
            .columns(
                Column::auto().at_least(60.0).clip(true),
                table.columns.len(),
            )
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.weak("#");
                });
                for col in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let idx = rows[row.index()];
                    let record = &table.records[idx];
                    row.col(|ui: &mut Ui| {
                        ui.weak(idx.to_string());
                    });
                    for col in 0..table.columns.len() {
                        row.col(|ui: &mut Ui| {
                            ui.label(record.get(col).to_string());
                        });
                    }
                });
            });
    });
    ui.weak(format!("{} row(s)", rows.len()));
}

// ---------------------------------------------------------------------------
// Statistics summary
// ---------------------------------------------------------------------------

/// Render `describe()`-style statistics: one row per statistic, one column
/// per numeric column.
pub fn summary_table(ui: &mut Ui, summary: &SummaryTable) {
    if summary.columns.is_empty() {
        ui.weak("No numeric columns.");
        return;
    }

    ui.push_id("summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(50.0))
            .columns(Column::auto().at_least(90.0), summary.columns.len())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|_ui: &mut Ui| {});
                for col in &summary.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&col.column);
                    });
                }
            })
            .body(|mut body| {
                for (stat_idx, stat) in SUMMARY_ROWS.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.strong(*stat);
                        });
                        for col in &summary.columns {
                            let value = col.row_values()[stat_idx];
                            row.col(|ui: &mut Ui| {
                                ui.monospace(format_stat(value));
                            });
                        }
                    });
                }
            });
    });
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

/// Year shown in headings and the selector.
pub fn format_year(year: f64) -> String {
    format_number(year)
}
