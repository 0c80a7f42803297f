//! Application state and the input state machine.
//!
//! The egui layer translates raw pointer and keyboard input into
//! [`InputEvent`]s; everything that changes mode, points or the view happens
//! here so it can be driven without a window.

use egui::{Pos2, Vec2};
use tracing::{debug, info};

use crate::calibration::{Calibration, CalibrationOutcome, KnownDistance};
use crate::canvas::{Canvas, ZoomDirection};
use crate::measurement::Measurements;
use crate::units::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Calibrate,
    Measure,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Calibrate => "CALIBRATE",
            Mode::Measure => "MEASURE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Calibrate,
    Undo,
    Reset,
    /// Zero-based index into the unit table.
    SelectUnit(usize),
    FitView,
    Quit,
}

/// Screen positions are relative to the top-left corner of the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PrimaryClick(Pos2),
    SecondaryClick,
    PanStart(Pos2),
    PanMove(Pos2),
    PanEnd,
    Zoom { at: Pos2, direction: ZoomDirection },
    Resize(Vec2),
    Command(Command),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Controller {
    mode: Mode,
    calibration: Calibration,
    measurements: Measurements,
    canvas: Canvas,
    drag_anchor: Option<Pos2>,
    display_unit: Unit,
    image_size: Vec2,
    view_size: Vec2,
    notice: Option<String>,
}

impl Controller {
    pub fn new(image_size: Vec2, known_distance: KnownDistance, display_unit: Unit) -> Self {
        Self {
            mode: Mode::Calibrate,
            calibration: Calibration::new(known_distance),
            measurements: Measurements::new(),
            canvas: Canvas::new(),
            drag_anchor: None,
            display_unit,
            image_size,
            view_size: Vec2::ZERO,
            notice: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn zoom(&self) -> f32 {
        self.canvas.get_zoom()
    }

    pub fn display_unit(&self) -> Unit {
        self.display_unit
    }

    pub fn set_display_unit(&mut self, unit: Unit) {
        self.display_unit = unit;
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn set_known_distance(&mut self, known_distance: KnownDistance) {
        self.calibration.set_known_distance(known_distance);
    }

    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    pub fn meters_per_pixel(&self) -> Option<f64> {
        self.calibration.meters_per_pixel()
    }

    pub fn is_panning(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Length of the line being drawn, in the display unit.
    pub fn current_length(&self) -> f64 {
        self.measurements
            .current_length(self.meters_per_pixel(), self.display_unit)
    }

    /// Length of all lines including the one being drawn, in the display unit.
    pub fn total_length(&self) -> f64 {
        self.measurements
            .total_length(self.meters_per_pixel(), self.display_unit)
    }

    pub fn summary(&self) -> String {
        self.measurements
            .summary(self.meters_per_pixel(), self.display_unit)
    }

    /// Last one-off message for the status line, such as a failed calibration.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Fits the image into the view. Called once the view size is first known
    /// and on the fit-view command; plain resizes keep the current view.
    pub fn fit_view(&mut self, view_size: Vec2) {
        self.view_size = view_size;
        self.canvas.fit(self.image_size, view_size);
    }

    pub fn handle(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::PrimaryClick(screen) => self.primary_click(screen),
            InputEvent::SecondaryClick => self.finish_line(),
            InputEvent::PanStart(screen) => self.drag_anchor = Some(screen),
            InputEvent::PanMove(screen) => {
                if let Some(anchor) = self.drag_anchor {
                    self.canvas.pan(screen - anchor);
                    self.drag_anchor = Some(screen);
                }
            }
            InputEvent::PanEnd => self.drag_anchor = None,
            InputEvent::Zoom { at, direction } => self.canvas.zoom_step(direction, at),
            InputEvent::Resize(size) => self.view_size = size,
            InputEvent::Command(command) => return self.command(command),
        }
        Flow::Continue
    }

    fn primary_click(&mut self, screen: Pos2) {
        self.notice = None;
        let world = self.canvas.screen_to_world(screen);
        match self.mode {
            Mode::Calibrate => {
                let outcome = self.calibration.add_point(world);
                match outcome {
                    CalibrationOutcome::Pending => {}
                    CalibrationOutcome::Calibrated(scale) => {
                        self.notice = Some(format!("Calibrated: {:.6} m/pixel", scale));
                    }
                    CalibrationOutcome::Degenerate => {
                        self.notice = Some("Calibration points coincide, scale unchanged".into());
                    }
                }
                if outcome.is_finished() {
                    self.mode = Mode::Measure;
                }
            }
            Mode::Measure => self.measurements.push_point(world),
        }
    }

    fn finish_line(&mut self) {
        if self.mode == Mode::Measure && self.measurements.finish_line() {
            debug!(lines = self.measurements.finished().len(), "line finished");
        }
    }

    fn command(&mut self, command: Command) -> Flow {
        match command {
            Command::Calibrate => {
                info!("entering calibration mode");
                self.mode = Mode::Calibrate;
                self.calibration.restart();
            }
            Command::Undo => {
                if self.mode == Mode::Measure {
                    self.measurements.undo();
                }
            }
            Command::Reset => {
                info!("measurements reset");
                self.measurements.reset();
            }
            Command::SelectUnit(index) => match Unit::from_index(index) {
                Some(unit) => self.display_unit = unit,
                None => debug!(index, "no unit at index"),
            },
            Command::FitView => {
                let view_size = self.view_size;
                self.fit_view(view_size);
            }
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn controller() -> Controller {
        Controller::new(vec2(1000.0, 1000.0), KnownDistance::default(), Unit::Meter)
    }

    /// Identity view, calibrated to 2 m/px.
    fn calibrated() -> Controller {
        let mut app = controller();
        app.handle(InputEvent::PrimaryClick(pos2(0.0, 0.0)));
        app.handle(InputEvent::PrimaryClick(pos2(50.0, 0.0)));
        assert_eq!(app.meters_per_pixel(), Some(2.0));
        app
    }

    fn click(app: &mut Controller, x: f32, y: f32) {
        app.handle(InputEvent::PrimaryClick(pos2(x, y)));
    }

    #[test]
    fn test_starts_in_calibration_mode() {
        let app = controller();
        assert_eq!(app.mode(), Mode::Calibrate);
        assert_eq!(app.meters_per_pixel(), None);
        assert_eq!(app.total_length(), 0.0);
    }

    #[test]
    fn test_calibration_switches_to_measure() {
        let mut app = controller();
        click(&mut app, 10.0, 10.0);
        assert_eq!(app.mode(), Mode::Calibrate);
        assert_eq!(app.calibration().pending_points().len(), 1);

        click(&mut app, 10.0, 60.0);
        assert_eq!(app.mode(), Mode::Measure);
        assert_eq!(app.meters_per_pixel(), Some(2.0));
        assert!(app.measurements().current().is_empty());
    }

    #[test]
    fn test_calibration_uses_world_coordinates() {
        let mut app = controller();
        app.handle(InputEvent::Zoom { at: pos2(0.0, 0.0), direction: ZoomDirection::In });
        click(&mut app, 0.0, 0.0);
        click(&mut app, 55.0, 0.0);
        let scale = app.meters_per_pixel().unwrap();
        assert!((scale - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_calibration_still_leaves_calibrate_mode() {
        let mut app = controller();
        click(&mut app, 5.0, 5.0);
        click(&mut app, 5.0, 5.0);
        assert_eq!(app.mode(), Mode::Measure);
        assert_eq!(app.meters_per_pixel(), None);
        assert!(app.notice().is_some());
    }

    #[test]
    fn test_measure_in_display_unit() {
        let mut app = calibrated();
        click(&mut app, 0.0, 0.0);
        click(&mut app, 10.0, 0.0);
        assert_eq!(app.current_length(), 20.0);

        app.handle(InputEvent::Command(Command::SelectUnit(1)));
        assert_eq!(app.display_unit(), Unit::Centimeter);
        assert_eq!(app.current_length(), 2000.0);
        assert_eq!(app.total_length(), 2000.0);
    }

    #[test]
    fn test_out_of_range_unit_is_ignored() {
        let mut app = controller();
        app.handle(InputEvent::Command(Command::SelectUnit(3)));
        assert_eq!(app.display_unit(), Unit::Kilometer);
        app.handle(InputEvent::Command(Command::SelectUnit(42)));
        assert_eq!(app.display_unit(), Unit::Kilometer);
    }

    #[test]
    fn test_secondary_click_finishes_line() {
        let mut app = calibrated();
        click(&mut app, 0.0, 0.0);
        app.handle(InputEvent::SecondaryClick);
        assert!(app.measurements().finished().is_empty());
        assert_eq!(app.measurements().current().len(), 1);

        click(&mut app, 0.0, 5.0);
        app.handle(InputEvent::SecondaryClick);
        assert_eq!(app.measurements().finished().len(), 1);
        assert!(app.measurements().current().is_empty());

        click(&mut app, 0.0, 0.0);
        click(&mut app, 5.0, 0.0);
        assert_eq!(app.current_length(), 10.0);
        assert_eq!(app.total_length(), 20.0);
    }

    #[test]
    fn test_secondary_click_ignored_while_calibrating() {
        let mut app = controller();
        click(&mut app, 0.0, 0.0);
        app.handle(InputEvent::SecondaryClick);
        assert_eq!(app.mode(), Mode::Calibrate);
        assert_eq!(app.calibration().pending_points().len(), 1);
    }

    #[test]
    fn test_undo_only_in_measure_mode() {
        let mut app = calibrated();
        click(&mut app, 1.0, 1.0);
        click(&mut app, 2.0, 2.0);
        app.handle(InputEvent::Command(Command::Undo));
        assert_eq!(app.measurements().current(), &[pos2(1.0, 1.0)]);

        app.handle(InputEvent::Command(Command::Calibrate));
        app.handle(InputEvent::Command(Command::Undo));
        assert_eq!(app.measurements().current(), &[pos2(1.0, 1.0)]);
    }

    #[test]
    fn test_undo_on_empty_line_is_noop() {
        let mut app = calibrated();
        app.handle(InputEvent::Command(Command::Undo));
        assert!(app.measurements().current().is_empty());
        assert_eq!(app.mode(), Mode::Measure);
    }

    #[test]
    fn test_reset_keeps_scale() {
        let mut app = calibrated();
        click(&mut app, 0.0, 0.0);
        click(&mut app, 3.0, 4.0);
        app.handle(InputEvent::SecondaryClick);
        click(&mut app, 9.0, 9.0);

        app.handle(InputEvent::Command(Command::Reset));
        assert!(app.measurements().current().is_empty());
        assert!(app.measurements().finished().is_empty());
        assert_eq!(app.meters_per_pixel(), Some(2.0));
        assert_eq!(app.mode(), Mode::Measure);
    }

    #[test]
    fn test_recalibrate_clears_pending_points_only() {
        let mut app = calibrated();
        app.handle(InputEvent::Command(Command::Calibrate));
        click(&mut app, 0.0, 0.0);
        app.handle(InputEvent::Command(Command::Calibrate));
        assert_eq!(app.mode(), Mode::Calibrate);
        assert!(app.calibration().pending_points().is_empty());
        assert_eq!(app.meters_per_pixel(), Some(2.0));
    }

    #[test]
    fn test_pan_drag() {
        let mut app = controller();
        app.handle(InputEvent::PanMove(pos2(50.0, 50.0)));
        assert_eq!(app.canvas().get_offset(), Vec2::ZERO);

        app.handle(InputEvent::PanStart(pos2(10.0, 10.0)));
        assert!(app.is_panning());
        app.handle(InputEvent::PanMove(pos2(15.0, 20.0)));
        app.handle(InputEvent::PanMove(pos2(25.0, 20.0)));
        app.handle(InputEvent::PanEnd);
        app.handle(InputEvent::PanMove(pos2(500.0, 500.0)));

        assert!(!app.is_panning());
        assert_eq!(app.canvas().get_offset(), vec2(15.0, 10.0));
        assert_eq!(app.zoom(), 1.0);
    }

    #[test]
    fn test_zoom_keeps_point_under_cursor() {
        let mut app = controller();
        app.fit_view(vec2(800.0, 600.0));
        let cursor = pos2(321.0, 123.0);
        let world = app.canvas().screen_to_world(cursor);

        app.handle(InputEvent::Zoom { at: cursor, direction: ZoomDirection::In });
        let back = app.canvas().world_to_screen(world);
        assert!((back - cursor).length() < 1e-3);
    }

    #[test]
    fn test_resize_keeps_view() {
        let mut app = controller();
        app.fit_view(vec2(500.0, 500.0));
        let (zoom, offset) = (app.zoom(), app.canvas().get_offset());

        app.handle(InputEvent::Resize(vec2(1600.0, 900.0)));
        assert_eq!(app.zoom(), zoom);
        assert_eq!(app.canvas().get_offset(), offset);

        app.handle(InputEvent::Command(Command::FitView));
        assert_eq!(app.zoom(), 0.9);
    }

    #[test]
    fn test_quit() {
        let mut app = controller();
        assert_eq!(app.handle(InputEvent::Command(Command::Undo)), Flow::Continue);
        assert_eq!(app.handle(InputEvent::Command(Command::Quit)), Flow::Quit);
    }
}
