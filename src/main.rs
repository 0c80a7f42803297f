mod app;
mod background;
mod calibration;
mod canvas;
mod config;
mod controller;
mod error;
mod geometry;
mod measurement;
mod ui;
mod units;

use anyhow::anyhow;
use app::MeasureApp;
use background::{Background, StartupChoice};
use clap::Parser;
use config::{Args, WINDOW_HEIGHT, WINDOW_WIDTH};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let known_distance = args.known_distance()?;
    let display_unit = args.display_unit;

    let path = match background::choose_image(args.image) {
        StartupChoice::Open(path) => path,
        StartupChoice::Cancelled => {
            info!("no image selected, exiting");
            return Ok(());
        }
    };
    let background = Background::load(&path)?;
    info!(
        known_meters = known_distance.meters(),
        display_unit = %display_unit,
        "starting in calibration mode"
    );

    let native_options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(WINDOW_WIDTH, WINDOW_HEIGHT)),
        min_window_size: Some(egui::vec2(640.0, 480.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Map Distance Measurement Tool",
        native_options,
        Box::new(move |cc| {
            Box::new(MeasureApp::new(cc, background, known_distance, display_unit))
        }),
    )
    .map_err(|err| anyhow!("window event loop failed: {err}"))
}
