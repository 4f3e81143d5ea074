//! Application Layer - DPI services and the ports they depend on
//!
//! - **Ports**: the OS entry points, as a trait the platform layer implements
//! - **Services**: DpiState, ScalingEngine, BitmapRescaler,
//!   AwarenessController and the first-window latch

pub mod ports;
pub mod services;

pub use ports::*;
pub use services::*;
