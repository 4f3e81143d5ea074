//! Domain Value Objects - Immutable values that describe characteristics
//!
//! Value objects have no identity and are compared by their values.

pub mod awareness;
pub mod dimensions;
pub mod interpolation;
pub mod rect;

pub use awareness::{
    AwarenessContext, AwarenessTier, HighDpiMode, LegacyAction, ProcessDpiAwareness,
};
pub use dimensions::Size;
pub use interpolation::{InterpolationMode, LOGICAL_DPI};
pub use rect::Rect;
