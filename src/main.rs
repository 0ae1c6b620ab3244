mod config;
mod core;
mod rendering;
mod storage;
mod ui;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::grid::load_grid_config;
use ui::app::ThiingsApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = match load_grid_config() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "grid.json 配置非法");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Thiings Grid")
            .with_inner_size([1200.0, 800.0])
            .with_app_id("thiings-grid"),
        ..Default::default()
    };

    eframe::run_native(
        "Thiings Grid",
        options,
        Box::new(move |cc| Box::new(ThiingsApp::new(cc, config))),
    )
}
