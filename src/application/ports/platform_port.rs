//! DpiPlatformPort - interface to the host OS DPI entry points
//!
//! Every method except [`CapabilityProbe::is_available`] maps onto one OS
//! entry point. Callers only invoke an entry point after the probe has
//! confirmed it exists; implementations still answer with the conservative
//! fallback if it does not.

use crate::domain::value_objects::{AwarenessContext, ProcessDpiAwareness};

/// `HRESULT` success code
pub const S_OK: i32 = 0;

/// Module and entry point names the tiers are detected by
pub mod entry_points {
    pub const USER32: &str = "user32.dll";
    pub const SHCORE: &str = "shcore.dll";

    pub const SET_PROCESS_DPI_AWARENESS_CONTEXT: &str = "SetProcessDpiAwarenessContext";
    pub const GET_THREAD_DPI_AWARENESS_CONTEXT: &str = "GetThreadDpiAwarenessContext";
    pub const ARE_DPI_AWARENESS_CONTEXTS_EQUAL: &str = "AreDpiAwarenessContextsEqual";
    pub const IS_VALID_DPI_AWARENESS_CONTEXT: &str = "IsValidDpiAwarenessContext";

    pub const SET_PROCESS_DPI_AWARENESS: &str = "SetProcessDpiAwareness";
    pub const GET_PROCESS_DPI_AWARENESS: &str = "GetProcessDpiAwareness";

    pub const SET_PROCESS_DPI_AWARE: &str = "SetProcessDPIAware";
    pub const IS_PROCESS_DPI_AWARE: &str = "IsProcessDPIAware";
}

/// Answers whether an OS entry point exists on this build.
///
/// Must never fail: a missing module, unresolved symbol or OS error is
/// simply `false`.
pub trait CapabilityProbe: Send + Sync {
    fn is_available(&self, module: &str, entry_point: &str) -> bool;
}

/// Port interface for the OS DPI entry points
pub trait DpiPlatform: CapabilityProbe {
    /// Horizontal DPI of the primary screen's drawing surface, `None` when
    /// the surface handle could not be acquired
    fn primary_screen_dpi(&self) -> Option<f64>;

    // Newest tier

    /// Awareness context of the calling thread, `None` if unrecognised
    fn thread_awareness_context(&self) -> Option<AwarenessContext>;

    /// Whether this OS build recognises `context`
    fn is_valid_awareness_context(&self, context: AwarenessContext) -> bool;

    /// `SetProcessDpiAwarenessContext`, returns its success flag
    fn set_process_awareness_context(&self, context: AwarenessContext) -> bool;

    // Process tier

    /// `GetProcessDpiAwareness` for the current process, `None` on failure
    fn process_dpi_awareness(&self) -> Option<ProcessDpiAwareness>;

    /// `SetProcessDpiAwareness`, returns the raw `HRESULT`
    fn set_process_dpi_awareness(&self, awareness: ProcessDpiAwareness) -> i32;

    // Legacy tier

    /// `IsProcessDPIAware`
    fn is_process_dpi_aware(&self) -> bool;

    /// `SetProcessDPIAware`, returns its success flag
    fn set_process_dpi_aware(&self) -> bool;
}

/// A platform with no DPI entry points at all
///
/// Used on hosts other than Windows, and as the "oldest OS" case in tests.
pub struct NullDpiPlatform;

impl CapabilityProbe for NullDpiPlatform {
    fn is_available(&self, _module: &str, _entry_point: &str) -> bool {
        false
    }
}

impl DpiPlatform for NullDpiPlatform {
    fn primary_screen_dpi(&self) -> Option<f64> {
        None
    }

    fn thread_awareness_context(&self) -> Option<AwarenessContext> {
        None
    }

    fn is_valid_awareness_context(&self, _context: AwarenessContext) -> bool {
        false
    }

    fn set_process_awareness_context(&self, _context: AwarenessContext) -> bool {
        false
    }

    fn process_dpi_awareness(&self) -> Option<ProcessDpiAwareness> {
        None
    }

    fn set_process_dpi_awareness(&self, _awareness: ProcessDpiAwareness) -> i32 {
        // E_NOTIMPL
        0x8000_4001_u32 as i32
    }

    fn is_process_dpi_aware(&self) -> bool {
        false
    }

    fn set_process_dpi_aware(&self) -> bool {
        false
    }
}
