use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyReelsApp {
    pub state: AppState,
    /// Set once the "Uploading…" frame has been shown.
    export_frame_shown: bool,
}

impl RustyReelsApp {
    pub fn new(config: &AppConfig) -> Self {
        let mut state = AppState::new(config);
        state.refresh();
        Self {
            state,
            export_frame_shown: false,
        }
    }

    /// The upload blocks the UI thread, so it runs one frame after the
    /// request to let the spinner paint first.
    fn drive_export(&mut self, ctx: &egui::Context) {
        if !self.state.exporter.is_submitting() {
            self.export_frame_shown = false;
            return;
        }
        if self.export_frame_shown {
            self.export_frame_shown = false;
            // Outcome is recorded on the exporter and shown by the side panel.
            self.state.run_pending_export();
            ctx.request_repaint();
        } else {
            self.export_frame_shown = true;
            ctx.request_repaint();
        }
    }
}

impl eframe::App for RustyReelsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Picks up edits to the source file (mtime change).
        self.state.refresh();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selectors and export ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &mut self.state);
        });

        self.drive_export(ctx);
    }
}
