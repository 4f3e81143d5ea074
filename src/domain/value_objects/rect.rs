//! Rect value object - floating point rectangle
//!
//! Describes the source region handed to the rasterizer. Coordinates are in
//! source pixels and may be fractional or negative.

/// A rectangle defined by its bounds
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Create a new rectangle from bounds
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from position and size
    pub fn from_pos_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Get width
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Get height
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Translate rectangle by offset
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// Check if rectangle is empty (zero or negative area)
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}
