//! Size value object - integer pixel dimensions
//!
//! Used for both logical (96-DPI) and device sizes; which one a value holds
//! is decided by the function that produced it.

/// Size with integer width and height
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0,
        height: 0,
    };

    /// Create a new size
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero or negative
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Apply `f` to both dimensions
    pub fn map(self, mut f: impl FnMut(i32) -> i32) -> Self {
        Self::new(f(self.width), f(self.height))
    }
}
