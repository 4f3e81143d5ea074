//! Domain Layer - DPI vocabulary, bitmaps and pure algorithms
//!
//! Nothing in this layer touches the OS.

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DpiError, Result};
