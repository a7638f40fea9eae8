mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::GapViewApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let mut config = DashboardConfig::from_env().context("loading dashboard config")?;
    // A dataset given on the command line wins over the config file.
    if let Some(path) = std::env::args_os().nth(1) {
        config.dataset_path = Some(PathBuf::from(path));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GapView – Gapminder Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(GapViewApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
