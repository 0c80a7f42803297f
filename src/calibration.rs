//! Two-point scale calibration.
//!
//! The user clicks both ends of a stretch whose real length is known; the
//! ratio of that length to the pixel distance gives meters per pixel.

use egui::Pos2;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geometry::distance;
use crate::units::Unit;

/// A real-world reference length entered by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownDistance {
    value: f64,
    unit: Unit,
}

impl KnownDistance {
    pub fn new(value: f64, unit: Unit) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidDistance(value));
        }
        Ok(Self { value, unit })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn meters(&self) -> f64 {
        self.unit.to_meters(self.value)
    }
}

impl Default for KnownDistance {
    fn default() -> Self {
        Self {
            value: 100.0,
            unit: Unit::Meter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    Idle,
    OnePoint,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    /// Waiting for the second point.
    Pending,
    Calibrated(f64),
    /// Both points landed on the same pixel; the previous scale is kept.
    Degenerate,
}

impl CalibrationOutcome {
    pub fn is_finished(self) -> bool {
        !matches!(self, CalibrationOutcome::Pending)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Calibration {
    points: Vec<Pos2>,
    known_distance: KnownDistance,
    meters_per_pixel: Option<f64>,
}

impl Calibration {
    pub fn new(known_distance: KnownDistance) -> Self {
        Self {
            points: Vec::with_capacity(2),
            known_distance,
            meters_per_pixel: None,
        }
    }

    pub fn known_distance(&self) -> KnownDistance {
        self.known_distance
    }

    /// Takes effect on the next calibration; an existing scale is left as is.
    pub fn set_known_distance(&mut self, known_distance: KnownDistance) {
        self.known_distance = known_distance;
    }

    pub fn meters_per_pixel(&self) -> Option<f64> {
        self.meters_per_pixel
    }

    pub fn pending_points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn state(&self) -> CalibrationState {
        match (self.points.len(), self.meters_per_pixel) {
            (0, None) => CalibrationState::Idle,
            (0, Some(_)) => CalibrationState::Complete,
            _ => CalibrationState::OnePoint,
        }
    }

    /// Drops pending points without forgetting the current scale.
    pub fn restart(&mut self) {
        self.points.clear();
    }

    pub fn add_point(&mut self, world: Pos2) -> CalibrationOutcome {
        self.points.push(world);
        if self.points.len() < 2 {
            return CalibrationOutcome::Pending;
        }

        let pixels = distance(self.points[0], self.points[1]);
        self.points.clear();

        if pixels > 0.0 {
            let scale = self.known_distance.meters() / pixels;
            self.meters_per_pixel = Some(scale);
            info!(pixels, meters_per_pixel = scale, "calibration complete");
            CalibrationOutcome::Calibrated(scale)
        } else {
            warn!("calibration points coincide, keeping previous scale");
            CalibrationOutcome::Degenerate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_known_distance_validation() {
        assert!(KnownDistance::new(0.0, Unit::Meter).is_err());
        assert!(KnownDistance::new(-3.0, Unit::Meter).is_err());
        assert!(KnownDistance::new(f64::NAN, Unit::Meter).is_err());
        assert!(KnownDistance::new(f64::INFINITY, Unit::Meter).is_err());

        let km = KnownDistance::new(1.5, Unit::Kilometer).unwrap();
        assert!((km.meters() - 1500.0).abs() < 1e-9);
        assert_eq!(KnownDistance::default().meters(), 100.0);
    }

    #[test]
    fn test_two_points_give_scale() {
        let mut calibration = Calibration::new(KnownDistance::default());
        assert_eq!(calibration.state(), CalibrationState::Idle);
        assert_eq!(calibration.meters_per_pixel(), None);

        assert_eq!(calibration.add_point(pos2(10.0, 10.0)), CalibrationOutcome::Pending);
        assert_eq!(calibration.state(), CalibrationState::OnePoint);
        assert_eq!(calibration.pending_points(), &[pos2(10.0, 10.0)]);

        let outcome = calibration.add_point(pos2(40.0, 50.0));
        assert_eq!(outcome, CalibrationOutcome::Calibrated(2.0));
        assert_eq!(calibration.meters_per_pixel(), Some(2.0));
        assert_eq!(calibration.state(), CalibrationState::Complete);
        assert!(calibration.pending_points().is_empty());
    }

    #[test]
    fn test_known_distance_unit_is_converted() {
        let known = KnownDistance::new(50.0, Unit::Centimeter).unwrap();
        let mut calibration = Calibration::new(known);
        calibration.add_point(pos2(0.0, 0.0));
        calibration.add_point(pos2(0.0, 100.0));
        let scale = calibration.meters_per_pixel().unwrap();
        assert!((scale - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_points_leave_scale_unset() {
        let mut calibration = Calibration::new(KnownDistance::default());
        calibration.add_point(pos2(5.0, 5.0));
        let outcome = calibration.add_point(pos2(5.0, 5.0));

        assert_eq!(outcome, CalibrationOutcome::Degenerate);
        assert!(outcome.is_finished());
        assert_eq!(calibration.meters_per_pixel(), None);
        assert!(calibration.pending_points().is_empty());
    }

    #[test]
    fn test_coincident_points_keep_previous_scale() {
        let mut calibration = Calibration::new(KnownDistance::default());
        calibration.add_point(pos2(0.0, 0.0));
        calibration.add_point(pos2(0.0, 25.0));
        assert_eq!(calibration.meters_per_pixel(), Some(4.0));

        calibration.add_point(pos2(3.0, 3.0));
        calibration.add_point(pos2(3.0, 3.0));
        assert_eq!(calibration.meters_per_pixel(), Some(4.0));
    }

    #[test]
    fn test_restart_keeps_scale() {
        let mut calibration = Calibration::new(KnownDistance::default());
        calibration.add_point(pos2(0.0, 0.0));
        calibration.add_point(pos2(50.0, 0.0));

        calibration.add_point(pos2(1.0, 1.0));
        calibration.restart();
        assert!(calibration.pending_points().is_empty());
        assert_eq!(calibration.meters_per_pixel(), Some(2.0));
    }

    #[test]
    fn test_new_known_distance_applies_to_next_calibration() {
        let mut calibration = Calibration::new(KnownDistance::default());
        calibration.add_point(pos2(0.0, 0.0));
        calibration.add_point(pos2(50.0, 0.0));

        calibration.set_known_distance(KnownDistance::new(1.0, Unit::Kilometer).unwrap());
        assert_eq!(calibration.meters_per_pixel(), Some(2.0));

        calibration.add_point(pos2(0.0, 0.0));
        calibration.add_point(pos2(50.0, 0.0));
        let scale = calibration.meters_per_pixel().unwrap();
        assert!((scale - 20.0).abs() < 1e-9);
    }
}
