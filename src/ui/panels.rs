use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::FAN_RATING;
use crate::export::ExportStatus;
use crate::state::AppState;
use crate::ui::tables::{format_year, movie_table, summary_table};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Left side panel – selectors and export
// ---------------------------------------------------------------------------

/// Render the left panel: year / age-rating selectors and the upload button.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.strong("Select a Year");
    let current_year = state
        .selected_year
        .map(format_year)
        .unwrap_or_default();
    let mut picked_year = None;
    egui::ComboBox::from_id_salt("select_year")
        .selected_text(current_year)
        .height(320.0)
        .show_ui(ui, |ui: &mut Ui| {
            for &year in &state.years {
                if ui
                    .selectable_label(state.selected_year == Some(year), format_year(year))
                    .clicked()
                {
                    picked_year = Some(year);
                }
            }
        });
    if let Some(year) = picked_year {
        state.select_year(year);
    }

    ui.add_space(6.0);
    ui.strong("Age Rating");
    let mut picked_label = None;
    egui::ComboBox::from_id_salt("select_rating")
        .selected_text(state.selected_rating.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for label in &state.rating_labels {
                let text = RichText::new(label).color(state.color_map.color_for(label));
                if ui
                    .selectable_label(state.selected_rating == *label, text)
                    .clicked()
                {
                    picked_label = Some(label.clone());
                }
            }
        });
    if let Some(label) = picked_label {
        state.select_rating(label);
    }

    ui.add_space(12.0);
    ui.heading("Upload to MongoDB");
    ui.separator();
    export_controls(ui, state);
}

fn export_controls(ui: &mut Ui, state: &mut AppState) {
    let config = state.exporter.config();
    ui.label(format!("Target: {}", config.target()));
    if config.clear_before_insert {
        ui.weak("Existing documents are deleted first.");
    }

    let idle = !state.exporter.is_submitting();
    if ui
        .add_enabled(idle, egui::Button::new("Upload cleaned data to MongoDB"))
        .clicked()
    {
        state.request_export();
    }

    match state.exporter.status() {
        ExportStatus::Idle => {}
        ExportStatus::Submitting => {
            ui.horizontal(|ui: &mut Ui| {
                ui.spinner();
                ui.label("Uploading…");
            });
        }
        ExportStatus::Succeeded(receipt) => {
            let mut msg = format!(
                "Data uploaded to MongoDB successfully! ({} documents)",
                receipt.inserted
            );
            if let Some(cleared) = receipt.cleared {
                msg.push_str(&format!(", {cleared} removed first"));
            }
            ui.label(RichText::new(msg).color(Color32::GREEN));
        }
        ExportStatus::Failed(err) => {
            ui.label(RichText::new(format!("MongoDB upload failed: {err}")).color(Color32::RED));
        }
    }
}

// ---------------------------------------------------------------------------
// Central panel – tables and charts
// ---------------------------------------------------------------------------

/// Render the scrollable main area.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("IMDb Top Movies Analysis");

    let Some(table) = state.table.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view movies  (File → Open…)");
        });
        return;
    };

    if table.is_empty() {
        ui.label(format!("{} has no rows.", state.store.path().display()));
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.show_raw {
                ui.add_space(8.0);
                ui.strong("Raw data");
                let all_rows: Vec<usize> = (0..table.len()).collect();
                movie_table(ui, "raw_data", &table, &all_rows);
            }

            ui.add_space(12.0);
            let year = state.selected_year.map(format_year).unwrap_or_default();
            ui.heading(format!("Movies Released in {year}"));
            movie_table(ui, "year_rows", &table, &state.year_rows);

            ui.add_space(12.0);
            ui.heading(format!("{} Movies", state.selected_rating));
            movie_table(ui, "rating_rows", &table, &state.rating_rows);

            ui.add_space(12.0);
            ui.heading("Statistics Summary");
            summary_table(ui, &state.summary);

            ui.add_space(12.0);
            ui.heading("Visualizations");
            plot::charts(ui, state);
        });
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
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} movies loaded from {}",
                table.len(),
                state.store.path().display()
            ));
            if let Some(rating) = state.summary.get(FAN_RATING) {
                ui.label(format!("mean {FAN_RATING}: {:.2}", rating.mean));
            }
        }

        ui.separator();

        if ui
            .selectable_label(state.show_raw, "Show raw data")
            .clicked()
        {
            state.show_raw = !state.show_raw;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(path);
    }
}
