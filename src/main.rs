mod app;
mod color;
mod config;
mod data;
mod error;
mod predict;
mod resources;
mod router;
mod state;
mod ui;

use app::CarResaleApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!(
        "Dataset {}, model {}",
        config.dataset_path.display(),
        config.model_path.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Car Resale Price Prediction",
        options,
        Box::new(|_cc| Ok(Box::new(CarResaleApp::new(config)))),
    )
}
