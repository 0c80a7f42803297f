use egui::Pos2;

use crate::calibration::KnownDistance;
use crate::units::Unit;

pub struct UiState {
    // Appearance
    pub dark_mode: bool,

    // Known distance editor, applied on demand
    pub distance_value: f64,
    pub distance_unit: Unit,

    // Pointer tracking, in world coordinates
    pub hover_world: Option<Pos2>,

    // Canvas size seen on the previous frame
    pub last_view_size: Option<egui::Vec2>,
}

impl UiState {
    pub fn new(known_distance: KnownDistance) -> Self {
        Self {
            dark_mode: true,
            distance_value: known_distance.value(),
            distance_unit: known_distance.unit(),
            hover_world: None,
            last_view_size: None,
        }
    }
}
