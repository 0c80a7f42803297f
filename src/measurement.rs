use std::fmt::Write as _;

use egui::Pos2;

use crate::geometry::polyline_meter_length;
use crate::units::Unit;

/// The polyline being drawn plus every polyline finished so far.
#[derive(Debug, Clone, Default)]
pub struct Measurements {
    current: Vec<Pos2>,
    finished: Vec<Vec<Pos2>>,
}

impl Measurements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &[Pos2] {
        &self.current
    }

    pub fn finished(&self) -> &[Vec<Pos2>] {
        &self.finished
    }

    pub fn push_point(&mut self, world: Pos2) {
        self.current.push(world);
    }

    /// Removes the last point of the current polyline, if there is one.
    pub fn undo(&mut self) -> Option<Pos2> {
        self.current.pop()
    }

    /// Stores the current polyline and starts a new one. Returns false when the
    /// current polyline is too short to measure anything.
    pub fn finish_line(&mut self) -> bool {
        if self.current.len() < 2 {
            return false;
        }
        self.finished.push(std::mem::take(&mut self.current));
        true
    }

    pub fn reset(&mut self) {
        self.current.clear();
        self.finished.clear();
    }

    pub fn current_meters(&self, meters_per_pixel: Option<f64>) -> f64 {
        polyline_meter_length(&self.current, meters_per_pixel)
    }

    pub fn total_meters(&self, meters_per_pixel: Option<f64>) -> f64 {
        self.finished
            .iter()
            .map(|line| polyline_meter_length(line, meters_per_pixel))
            .sum::<f64>()
            + self.current_meters(meters_per_pixel)
    }

    pub fn current_length(&self, meters_per_pixel: Option<f64>, unit: Unit) -> f64 {
        unit.from_meters(self.current_meters(meters_per_pixel))
    }

    pub fn total_length(&self, meters_per_pixel: Option<f64>, unit: Unit) -> f64 {
        unit.from_meters(self.total_meters(meters_per_pixel))
    }

    /// Plain-text report of every line, suitable for the clipboard.
    pub fn summary(&self, meters_per_pixel: Option<f64>, unit: Unit) -> String {
        let mut text = String::new();
        let Some(scale) = meters_per_pixel else {
            text.push_str("Not calibrated\n");
            return text;
        };

        for (i, line) in self.finished.iter().enumerate() {
            let length = unit.from_meters(polyline_meter_length(line, Some(scale)));
            let _ = writeln!(text, "Line {}: {:.2} {}", i + 1, length, unit);
        }
        if self.current.len() > 1 {
            let _ = writeln!(
                text,
                "Current: {:.2} {}",
                self.current_length(Some(scale), unit),
                unit
            );
        }
        let _ = writeln!(text, "Total: {:.2} {}", self.total_length(Some(scale), unit), unit);
        let _ = writeln!(text, "Scale: {:.6} m/pixel", scale);
        text
    }
}
