//! dpiaware - DPI awareness and logical-to-device scaling
//!
//! Layout follows the usual layers:
//! - `domain`: sizes, bitmaps, awareness mappings and the pure scaling maths
//! - `application`: the platform port and the stateful DPI services
//! - `infrastructure`: [`DpiContext`], which wires everything together
//! - `platform`: the Win32 bindings (Windows only)
//!
//! Everything outside `platform` builds and tests on any OS.

// Include the log module first so the log! macro is visible everywhere
#[macro_use]
pub mod log;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod platform;
pub mod shared;

pub use application::ports::{CapabilityProbe, DpiPlatform, NullDpiPlatform};
pub use application::services::{
    AwarenessController, AwarenessLifecycle, BitmapRescaler, DpiState, FirstWindowLatch,
    ScalingEngine,
};
pub use domain::entities::{Bitmap, PixelFormat};
pub use domain::errors::{DpiError, Result};
pub use domain::value_objects::{
    AwarenessTier, HighDpiMode, InterpolationMode, Rect, Size, LOGICAL_DPI,
};
pub use infrastructure::DpiContext;
pub use shared::config::DpiConfig;
