//! Infrastructure Layer - wiring
//!
//! The OS bindings themselves live under `platform`; this layer only
//! assembles them with the application services.

pub mod composition_root;

pub use composition_root::DpiContext;
