//! Application Services - stateful DPI components
//!
//! Each service shares the platform and the [`DpiState`] cache by `Arc`; the
//! composition root builds one of each.

pub mod awareness_controller;
pub mod bitmap_rescaler;
pub mod dpi_state;
pub mod scaling_engine;
pub mod window_latch;

pub use awareness_controller::{detect_tier, AwarenessController, AwarenessStrategy};
pub use bitmap_rescaler::{rescale_with_mode, BitmapRescaler, SAMPLING_ORIGIN_OFFSET};
pub use dpi_state::DpiState;
pub use scaling_engine::ScalingEngine;
pub use window_latch::{AwarenessLifecycle, FirstWindowLatch};
