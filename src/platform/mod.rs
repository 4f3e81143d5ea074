//! Platform abstraction layer
//!
//! Only Windows has a real implementation. Elsewhere the application layer's
//! `NullDpiPlatform` stands in.

#[cfg(target_os = "windows")]
pub mod win32;

#[cfg(target_os = "windows")]
pub use win32::*;
