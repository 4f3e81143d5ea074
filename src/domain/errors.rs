//! Domain layer error types
//!
//! Capability absence and unsupported modes never show up here; those
//! degrade to fallback values. Only the few surfaces that can genuinely
//! fail return a [`DpiError`].

use thiserror::Error;

use crate::domain::value_objects::{AwarenessTier, HighDpiMode};
use crate::shared::config::ConfigError;

/// Main error type
#[derive(Error, Debug)]
pub enum DpiError {
    /// A bitmap dimension was zero or negative
    #[error("Invalid bitmap size: {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    /// Not enough memory for a pixel or scratch buffer
    #[error("Failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },

    /// Pixel buffer length does not match width * height * bytes-per-pixel
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A top-level window already exists, the awareness mode is frozen
    #[error("DPI awareness is fixed once the first window has been created")]
    AwarenessFixed,

    /// The OS refused the awareness change
    #[error("Failed to set DPI awareness {requested} on tier {tier:?}")]
    SetAwarenessFailed {
        requested: HighDpiMode,
        tier: AwarenessTier,
    },

    /// A Win32 call failed
    #[error("{function} failed (error {code:#010x})")]
    Win32 { function: &'static str, code: u32 },

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, DpiError>;
