use std::path::PathBuf;

use clap::Parser;
use egui::Color32;

use crate::calibration::KnownDistance;
use crate::error::{Error, Result};
use crate::units::Unit;

pub const WINDOW_WIDTH: f32 = 1200.0;
pub const WINDOW_HEIGHT: f32 = 800.0;

pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 10.0;
pub const ZOOM_STEP: f32 = 1.1;

pub const BACKGROUND_COLOR: Color32 = Color32::from_rgb(30, 30, 30);
pub const LINE_COLOR: Color32 = Color32::from_rgb(0, 255, 0);
pub const POINT_COLOR: Color32 = Color32::from_rgb(255, 50, 50);
pub const CALIBRATION_COLOR: Color32 = Color32::from_rgb(50, 150, 255);
pub const CROSSHAIR_COLOR: Color32 = Color32::from_rgb(255, 0, 0);

pub const LINE_WIDTH: f32 = 2.0;
pub const POINT_RADIUS: f32 = 4.0;

/// Measure real-world distances on a map image.
///
/// Calibrate first by clicking both ends of a stretch of known length, then
/// click along a path to measure it.
#[derive(Debug, Parser)]
#[command(name = "map_measure", version, about)]
pub struct Args {
    /// Map image to open. A file dialog is shown when omitted.
    pub image: Option<PathBuf>,

    /// Real length of the calibration reference.
    #[arg(long, default_value_t = 100.0)]
    pub distance: f64,

    /// Unit of the calibration reference (mm, cm, m, km, in, ft, yd, mi, nmi).
    #[arg(long, default_value = "m", value_parser = parse_unit)]
    pub unit: Unit,

    /// Unit lengths are shown in at startup.
    #[arg(long, default_value = "m", value_parser = parse_unit)]
    pub display_unit: Unit,
}

impl Args {
    pub fn known_distance(&self) -> Result<KnownDistance> {
        KnownDistance::new(self.distance, self.unit)
    }
}

pub fn parse_unit(symbol: &str) -> Result<Unit> {
    symbol
        .trim()
        .parse()
        .map_err(|_| Error::UnknownUnit(symbol.to_string()))
}
