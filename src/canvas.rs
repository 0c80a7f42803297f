use egui::{Pos2, Rect, Vec2};

use crate::config::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    pub fn factor(self) -> f32 {
        match self {
            ZoomDirection::In => ZOOM_STEP,
            ZoomDirection::Out => 1.0 / ZOOM_STEP,
        }
    }
}

/// Pan/zoom state mapping image pixels (world) onto the view (screen).
///
/// Screen positions are relative to the top-left corner of the view, so the
/// mapping is just `screen = world * zoom + offset`.
#[derive(Debug, Clone)]
pub struct Canvas {
    offset: Vec2,
    zoom: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_view(1.0, Vec2::ZERO)
    }

    pub fn with_view(zoom: f32, offset: Vec2) -> Self {
        Self {
            offset,
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
        }
    }

    pub fn get_zoom(&self) -> f32 {
        self.zoom
    }

    pub fn get_offset(&self) -> Vec2 {
        self.offset
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        Pos2::new(
            world.x * self.zoom + self.offset.x,
            world.y * self.zoom + self.offset.y,
        )
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        Pos2::new(
            (screen.x - self.offset.x) / self.zoom,
            (screen.y - self.offset.y) / self.zoom,
        )
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Multiplies the zoom by `factor` while keeping the world point under
    /// `anchor` at the same screen position.
    pub fn zoom_at(&mut self, factor: f32, anchor: Pos2) {
        let world_before = self.screen_to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        let screen_after = self.world_to_screen(world_before);
        self.offset += anchor - screen_after;
    }

    pub fn zoom_step(&mut self, direction: ZoomDirection, anchor: Pos2) {
        self.zoom_at(direction.factor(), anchor);
    }

    /// Shrinks the image to fit the view (never enlarging it) and centres it.
    pub fn fit(&mut self, image_size: Vec2, view_size: Vec2) {
        if image_size.x <= 0.0 || image_size.y <= 0.0 {
            self.zoom = 1.0;
            self.offset = Vec2::ZERO;
            return;
        }

        let scale_w = view_size.x / image_size.x;
        let scale_h = view_size.y / image_size.y;
        self.zoom = scale_w.min(scale_h).min(1.0).clamp(ZOOM_MIN, ZOOM_MAX);
        self.offset = (view_size - image_size * self.zoom) * 0.5;
    }

    /// Screen rectangle covered by an image of `image_size` world pixels.
    pub fn image_rect(&self, image_size: Vec2) -> Rect {
        Rect::from_min_max(
            self.world_to_screen(Pos2::ZERO),
            self.world_to_screen(image_size.to_pos2()),
        )
    }
}
