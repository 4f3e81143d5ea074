//! ScalingEngine - logical (96 DPI) to device pixel conversion
//!
//! An `override_dpi` of 0 means "use the cached screen factor". Any other
//! value computes a one-off factor and leaves the cache alone, which is how
//! callers convert for a specific monitor.

use std::sync::Arc;

use super::dpi_state::DpiState;
use crate::domain::services::scaling;
use crate::domain::value_objects::Size;

#[derive(Clone)]
pub struct ScalingEngine {
    state: Arc<DpiState>,
}

impl ScalingEngine {
    pub fn new(state: Arc<DpiState>) -> Self {
        Self { state }
    }

    /// Convert a logical value to device pixels, rounding half away from zero
    pub fn logical_to_device_units(&self, value: i32, override_dpi: u32) -> i32 {
        if override_dpi == 0 {
            scaling::scale_by_factor(value, self.state.scaling_factor())
        } else {
            scaling::scale_for_dpi(value, override_dpi)
        }
    }

    /// Convert both dimensions with the same factor
    pub fn logical_to_device_size(&self, size: Size, override_dpi: u32) -> Size {
        if override_dpi == 0 {
            scaling::scale_size_by_factor(size, self.state.scaling_factor())
        } else {
            scaling::scale_size_for_dpi(size, override_dpi)
        }
    }

    pub fn logical_to_device_units_x(&self, value: i32) -> i32 {
        self.logical_to_device_units(value, 0)
    }

    pub fn logical_to_device_units_y(&self, value: i32) -> i32 {
        self.logical_to_device_units(value, 0)
    }

    /// Whether the primary screen differs from 96 DPI
    pub fn is_scaling_required(&self) -> bool {
        self.state.is_scaling_required()
    }
}
