mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::CreditLensApp;
use color::ChartPalette;
use credit_lens::summary::SummaryConfig;
use eframe::egui;

/// Loaded at startup when no path is given and the file exists.
const DEFAULT_DATA_FILE: &str = "german_credit_data.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let initial_path = std::env::args_os().nth(1).map(PathBuf::from).or_else(|| {
        let default = PathBuf::from(DEFAULT_DATA_FILE);
        default.exists().then_some(default)
    });
    let summary_config = SummaryConfig::from_env();
    if summary_config.api_key.is_none() {
        log::info!("OPENAI_API_KEY not set; analysis will use the local template");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Credit Lens – Credit Risk Dashboard",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            let mut app = CreditLensApp::new(summary_config, ChartPalette::default());
            if let Some(path) = initial_path {
                app.state.load_path(&path);
                app.state.request_summary(&cc.egui_ctx);
            }
            Ok(Box::new(app))
        }),
    )
}
