use egui::Pos2;

/// Euclidean distance between two points, widened to `f64` for accumulation.
pub fn distance(a: Pos2, b: Pos2) -> f64 {
    let dx = f64::from(b.x) - f64::from(a.x);
    let dy = f64::from(b.y) - f64::from(a.y);
    dx.hypot(dy)
}

/// Sum of the segment lengths of a polyline. Zero for fewer than two points.
pub fn polyline_pixel_length(points: &[Pos2]) -> f64 {
    points.windows(2).map(|pair| distance(pair[0], pair[1])).sum()
}

/// Pixel length scaled into meters, or zero while no scale is known.
pub fn polyline_meter_length(points: &[Pos2], meters_per_pixel: Option<f64>) -> f64 {
    match meters_per_pixel {
        Some(scale) => polyline_pixel_length(points) * scale,
        None => 0.0,
    }
}
