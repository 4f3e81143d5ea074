//! Domain Entities

pub mod bitmap;

pub use bitmap::{Bitmap, PixelFormat};
