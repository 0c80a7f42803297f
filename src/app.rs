use crate::background::Background;
use crate::calibration::{CalibrationState, KnownDistance};
use crate::canvas::ZoomDirection;
use crate::config::{
    BACKGROUND_COLOR, CALIBRATION_COLOR, CROSSHAIR_COLOR, LINE_COLOR, LINE_WIDTH, POINT_COLOR,
    POINT_RADIUS,
};
use crate::controller::{Command, Controller, Flow, InputEvent, Mode};
use crate::ui::UiState;
use crate::units::Unit;
use clipboard::ClipboardContext;
use clipboard::ClipboardProvider;
use egui::{Color32, Context, Key, PointerButton, Pos2, Rect, Stroke, Ui, Vec2};
use strum::IntoEnumIterator;
use tracing::{info, warn};

const UNIT_KEYS: [Key; 9] = [
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
    Key::Num8,
    Key::Num9,
];

pub struct MeasureApp {
    controller: Controller,
    background: Background,
    ui_state: UiState,
    clipboard: Option<ClipboardContext>,
}

impl MeasureApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        background: Background,
        known_distance: KnownDistance,
        display_unit: Unit,
    ) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(10.0, 10.0);
        cc.egui_ctx.set_style(style);

        let clipboard = ClipboardProvider::new().ok();
        if clipboard.is_none() {
            warn!("clipboard unavailable, copying measurements is disabled");
        }

        Self {
            controller: Controller::new(background.size(), known_distance, display_unit),
            background,
            ui_state: UiState::new(known_distance),
            clipboard,
        }
    }

    pub fn copy_to_clipboard(&mut self, text: String) -> bool {
        if let Some(clipboard) = &mut self.clipboard {
            clipboard.set_contents(text).is_ok()
        } else {
            false
        }
    }

    fn dispatch(&mut self, event: InputEvent, frame: &mut eframe::Frame) {
        if self.controller.handle(event) == Flow::Quit {
            info!("quitting");
            frame.close();
        }
    }

    fn command(&mut self, command: Command, frame: &mut eframe::Frame) {
        self.dispatch(InputEvent::Command(command), frame);
    }

    fn copy_summary(&mut self) {
        let summary = self.controller.summary();
        if self.copy_to_clipboard(summary) {
            self.controller.set_notice("Measurements copied to clipboard");
        } else {
            self.controller.set_notice("Clipboard unavailable");
        }
    }

    fn apply_known_distance(&mut self) {
        match KnownDistance::new(self.ui_state.distance_value, self.ui_state.distance_unit) {
            Ok(known_distance) => {
                info!(
                    value = known_distance.value(),
                    unit = %known_distance.unit(),
                    "known distance changed"
                );
                self.controller.set_known_distance(known_distance);
                self.controller.set_notice("Known distance applies to the next calibration");
            }
            Err(err) => self.controller.set_notice(err.to_string()),
        }
    }

    fn handle_keyboard(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let mut commands = Vec::new();
        ctx.input(|i| {
            if i.key_pressed(Key::Escape) {
                commands.push(Command::Quit);
            }
            if i.key_pressed(Key::C) {
                commands.push(Command::Calibrate);
            }
            if i.key_pressed(Key::U) {
                commands.push(Command::Undo);
            }
            if i.key_pressed(Key::R) {
                commands.push(Command::Reset);
            }
            if i.key_pressed(Key::F) {
                commands.push(Command::FitView);
            }
            for (index, key) in UNIT_KEYS.iter().enumerate() {
                if i.key_pressed(*key) {
                    commands.push(Command::SelectUnit(index));
                }
            }
        });

        for command in commands {
            self.command(command, frame);
        }
    }

    // Translate pointer input on the canvas into controller events
    fn handle_canvas_interactions(
        &mut self,
        ui: &mut Ui,
        response: egui::Response,
        frame: &mut eframe::Frame,
    ) {
        let canvas_rect = response.rect;
        let to_local = |pos: Pos2| pos - canvas_rect.min.to_vec2();

        let view_size = canvas_rect.size();
        match self.ui_state.last_view_size {
            None => self.controller.fit_view(view_size),
            Some(previous) if previous != view_size => {
                self.dispatch(InputEvent::Resize(view_size), frame);
            }
            Some(_) => {}
        }
        self.ui_state.last_view_size = Some(view_size);

        let (middle_pressed, middle_released, latest_pos) = ui.input(|i| {
            (
                i.pointer.button_pressed(PointerButton::Middle),
                i.pointer.button_released(PointerButton::Middle),
                i.pointer.hover_pos(),
            )
        });

        if middle_pressed && response.hovered() {
            if let Some(pos) = latest_pos {
                self.dispatch(InputEvent::PanStart(to_local(pos)), frame);
            }
        }
        if self.controller.is_panning() {
            if let Some(pos) = latest_pos {
                self.dispatch(InputEvent::PanMove(to_local(pos)), frame);
            }
            if middle_released {
                self.dispatch(InputEvent::PanEnd, frame);
            }
        }

        if response.hovered() {
            let scroll_delta = ui.input(|i| i.scroll_delta.y);
            if scroll_delta != 0.0 {
                let direction = if scroll_delta > 0.0 {
                    ZoomDirection::In
                } else {
                    ZoomDirection::Out
                };
                if let Some(pos) = response.hover_pos() {
                    self.dispatch(
                        InputEvent::Zoom {
                            at: to_local(pos),
                            direction,
                        },
                        frame,
                    );
                }
            }
        }

        self.ui_state.hover_world = response
            .hover_pos()
            .map(|pos| self.controller.canvas().screen_to_world(to_local(pos)));

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.dispatch(InputEvent::PrimaryClick(to_local(pos)), frame);
            }
        }

        if response.secondary_clicked() {
            self.dispatch(InputEvent::SecondaryClick, frame);
        }
    }

    fn draw_polyline(&self, painter: &egui::Painter, origin: Vec2, points: &[Pos2], color: Color32) {
        let canvas = self.controller.canvas();
        let screen: Vec<Pos2> = points
            .iter()
            .map(|p| canvas.world_to_screen(*p) + origin)
            .collect();

        for pair in screen.windows(2) {
            painter.line_segment([pair[0], pair[1]], Stroke::new(LINE_WIDTH, color));
        }
        for p in &screen {
            painter.circle_filled(*p, POINT_RADIUS, POINT_COLOR);
        }
    }

    // Draw the map, the measured lines and the cursor
    fn draw_canvas(&self, ui: &mut Ui) -> egui::Response {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        let origin = canvas_rect.min.to_vec2();
        painter.rect_filled(canvas_rect, 0.0, BACKGROUND_COLOR);

        let canvas = self.controller.canvas();
        let image_rect = canvas
            .image_rect(self.background.size())
            .translate(origin);
        painter.image(
            self.background.texture_id(ui.ctx()),
            image_rect,
            Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        let measurements = self.controller.measurements();
        for line in measurements.finished() {
            self.draw_polyline(&painter, origin, line, LINE_COLOR);
        }

        let (active, active_color) = match self.controller.mode() {
            Mode::Calibrate => (
                self.controller.calibration().pending_points(),
                CALIBRATION_COLOR,
            ),
            Mode::Measure => (measurements.current(), LINE_COLOR),
        };
        self.draw_polyline(&painter, origin, active, active_color);

        if let Some(mouse_pos) = response.hover_pos() {
            if let Some(last) = active.last() {
                let last_screen = canvas.world_to_screen(*last) + origin;
                painter.line_segment(
                    [last_screen, mouse_pos],
                    Stroke::new(1.0, active_color.linear_multiply(0.6)),
                );
            }

            let crosshair_size = 10.0;
            painter.line_segment(
                [
                    egui::pos2(mouse_pos.x - crosshair_size, mouse_pos.y),
                    egui::pos2(mouse_pos.x + crosshair_size, mouse_pos.y),
                ],
                Stroke::new(1.0, CROSSHAIR_COLOR),
            );
            painter.line_segment(
                [
                    egui::pos2(mouse_pos.x, mouse_pos.y - crosshair_size),
                    egui::pos2(mouse_pos.x, mouse_pos.y + crosshair_size),
                ],
                Stroke::new(1.0, CROSSHAIR_COLOR),
            );
        }

        response
    }

    fn unit_picker(ui: &mut Ui, id: &str, unit: &mut Unit) -> bool {
        let mut changed = false;
        egui::ComboBox::from_id_source(id)
            .selected_text(unit.to_string())
            .show_ui(ui, |ui| {
                for candidate in Unit::iter() {
                    changed |= ui
                        .selectable_value(
                            &mut *unit,
                            candidate,
                            format!("{}: {} ({})", candidate.index() + 1, candidate, candidate.name()),
                        )
                        .changed();
                }
            });
        changed
    }

    fn draw_status(&mut self, ui: &mut Ui) {
        let unit = self.controller.display_unit();

        ui.heading("Status");
        ui.label(format!("Mode: {}", self.controller.mode().label()));
        ui.label(format!("Zoom: {:.2}x", self.controller.zoom()));
        let offset = self.controller.canvas().get_offset();
        ui.label(format!("Pan: ({:.0}, {:.0})", offset.x, offset.y));

        if self.controller.mode() == Mode::Calibrate {
            let hint = match self.controller.calibration().state() {
                CalibrationState::OnePoint => "Click the second end of the known distance",
                CalibrationState::Idle | CalibrationState::Complete => {
                    "Click the first end of the known distance"
                }
            };
            ui.label(hint);
        }

        ui.horizontal(|ui| {
            ui.label("Display unit:");
            let mut selected = unit;
            if Self::unit_picker(ui, "display_unit", &mut selected) {
                self.controller.set_display_unit(selected);
            }
        });

        match self.controller.meters_per_pixel() {
            Some(scale) => {
                ui.label(format!("Scale: {:.6} m/pixel", scale));
                ui.label(format!("Current: {:.2} {}", self.controller.current_length(), unit));
                ui.label(format!("Total:   {:.2} {}", self.controller.total_length(), unit));
            }
            None => {
                ui.label("Not calibrated");
            }
        }

        if let Some(world) = self.ui_state.hover_world {
            ui.label(format!("Cursor: ({:.1}, {:.1}) px", world.x, world.y));
        }

        if let Some(notice) = self.controller.notice() {
            ui.separator();
            ui.label(notice);
        }
    }
}

// Implement the main update loop for the app
impl eframe::App for MeasureApp {
    fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
        let mut style = (*ctx.style()).clone();
        if self.ui_state.dark_mode {
            style.visuals = egui::Visuals::dark();
        } else {
            style.visuals = egui::Visuals::light();
        }
        ctx.set_style(style);

        self.handle_keyboard(ctx, frame);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Map Measure");
                ui.separator();
                if ui.button("Calibrate").clicked() {
                    self.command(Command::Calibrate, frame);
                }
                if ui.button("Undo").clicked() {
                    self.command(Command::Undo, frame);
                }
                if ui.button("Reset All").clicked() {
                    self.command(Command::Reset, frame);
                }
                if ui.button("Fit View").clicked() {
                    self.command(Command::FitView, frame);
                }
                if ui.button("Copy Measurements").clicked() {
                    self.copy_summary();
                }
            });
        });

        egui::SidePanel::right("status_panel")
            .resizable(true)
            .default_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.draw_status(ui);

                    ui.separator();

                    ui.collapsing("Known Distance", |ui| {
                        ui.horizontal(|ui| {
                            ui.add(
                                egui::DragValue::new(&mut self.ui_state.distance_value)
                                    .speed(1.0)
                                    .clamp_range(0.001..=1.0e7),
                            );
                            Self::unit_picker(ui, "known_unit", &mut self.ui_state.distance_unit);
                        });
                        if ui.button("Apply").clicked() {
                            self.apply_known_distance();
                        }
                        let current = self.controller.calibration().known_distance();
                        ui.label(format!("In use: {} {}", current.value(), current.unit()));
                    });

                    ui.collapsing("Appearance", |ui| {
                        ui.checkbox(&mut self.ui_state.dark_mode, "Dark Mode");
                    });

                    ui.collapsing("Help", |ui| {
                        ui.label("• Left Click: Add Point");
                        ui.label("• Right Click: Finish Line");
                        ui.label("• Middle Drag: Pan");
                        ui.label("• Mouse Wheel: Zoom");
                        ui.label("• C: Calibrate | U: Undo | R: Reset All");
                        ui.label("• F: Fit View | 1-9: Display Unit | ESC: Quit");
                        ui.label("• Calibrate by clicking both ends of the known distance");
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let response = self.draw_canvas(ui);
                self.handle_canvas_interactions(ui, response, frame);
            });

        ctx.request_repaint();
    }
}
