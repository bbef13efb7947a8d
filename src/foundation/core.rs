pub use kurbo::{Point, Rect, Vec2};

/// Straight-alpha RGB8 color used for channel tints and outline strokes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Rgb8(pub [u8; 3]);

impl Rgb8 {
    /// Pure red, the default overview bounding box color.
    pub const RED: Self = Self([255, 0, 0]);
    /// Amber, the default overview viewport outline color.
    pub const AMBER: Self = Self([255, 190, 0]);

    /// Build a color from its components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }
}

/// Pixels per image unit for an orthographic zoom level.
///
/// Zoom `0` maps one image pixel to one screen pixel; each step doubles (or halves) that.
pub fn zoom_to_scale(zoom: f64) -> f64 {
    zoom.exp2()
}

/// Inverse of [`zoom_to_scale`].
pub fn scale_to_zoom(scale: f64) -> f64 {
    scale.log2()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
