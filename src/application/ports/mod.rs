//! Ports - interfaces the infrastructure layer implements

pub mod platform_port;

#[cfg(test)]
pub mod fake_platform;

pub use platform_port::{entry_points, CapabilityProbe, DpiPlatform, NullDpiPlatform, S_OK};
