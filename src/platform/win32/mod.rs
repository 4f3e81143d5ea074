//! Win32 platform implementation
//!
//! The only place `unsafe` FFI lives. Each block states the invariant it
//! relies on.

pub mod dpi;
pub mod icon;
pub mod probe;

pub use dpi::Win32DpiPlatform;
pub use icon::load_bitmap_from_icon_resource;
pub use probe::LibraryProbe;
