mod app;
mod color;
mod config;
mod data;
mod error;
mod export;
mod state;
mod ui;

use app::RustyReelsApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    // Read `.env` before the logger so RUST_LOG from it applies.
    let config = AppConfig::load_with_dotenv();
    env_logger::init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}; falling back to defaults");
            AppConfig::default()
        }
    };
    log::debug!("{config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Reels – IMDb Top Movies Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(RustyReelsApp::new(&config)))),
    )
}
