//! Win32 implementation of the DPI platform port

use std::ffi::c_void;

use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{GetDC, GetDeviceCaps, ReleaseDC, HDC, LOGPIXELSX};

use super::probe::{LibraryProbe, RawProc};
use crate::application::ports::{entry_points as ep, CapabilityProbe, DpiPlatform};
use crate::domain::value_objects::{AwarenessContext, ProcessDpiAwareness};

type GetThreadDpiAwarenessContextFn = unsafe extern "system" fn() -> isize;
type AreDpiAwarenessContextsEqualFn = unsafe extern "system" fn(isize, isize) -> i32;
type IsValidDpiAwarenessContextFn = unsafe extern "system" fn(isize) -> i32;
type SetProcessDpiAwarenessContextFn = unsafe extern "system" fn(isize) -> i32;
type GetProcessDpiAwarenessFn = unsafe extern "system" fn(*mut c_void, *mut i32) -> i32;
type SetProcessDpiAwarenessFn = unsafe extern "system" fn(i32) -> i32;
type IsProcessDpiAwareFn = unsafe extern "system" fn() -> i32;
type SetProcessDpiAwareFn = unsafe extern "system" fn() -> i32;

/// `E_NOTIMPL`, reported when the setter itself can't be found
const E_NOTIMPL: i32 = 0x8000_4001_u32 as i32;

macro_rules! entry {
    ($self:ident, $module:expr, $name:expr, $ty:ty) => {
        $self
            .probe
            .resolve($module, $name)
            // SAFETY: the address was exported under this name, whose
            // documented signature is `$ty`.
            .map(|f| unsafe { std::mem::transmute::<RawProc, $ty>(f) })
    };
}

/// Primary screen DC, released on drop whether or not acquisition succeeded
struct ScreenDc(HDC);

impl ScreenDc {
    fn acquire() -> Self {
        // SAFETY: a null HWND asks for the whole primary screen.
        Self(unsafe { GetDC(HWND::default()) })
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        // SAFETY: releasing a null DC is a harmless no-op.
        unsafe {
            ReleaseDC(HWND::default(), self.0);
        }
    }
}

pub struct Win32DpiPlatform {
    probe: LibraryProbe,
}

impl Win32DpiPlatform {
    pub fn new() -> Self {
        Self {
            probe: LibraryProbe::new(),
        }
    }
}

impl Default for Win32DpiPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityProbe for Win32DpiPlatform {
    fn is_available(&self, module: &str, entry_point: &str) -> bool {
        self.probe.is_available(module, entry_point)
    }
}

impl DpiPlatform for Win32DpiPlatform {
    fn primary_screen_dpi(&self) -> Option<f64> {
        let dc = ScreenDc::acquire();
        if dc.0.is_invalid() {
            return None;
        }
        // SAFETY: dc holds a valid screen DC until it is dropped.
        let dpi = unsafe { GetDeviceCaps(dc.0, LOGPIXELSX) };
        (dpi > 0).then_some(dpi as f64)
    }

    fn thread_awareness_context(&self) -> Option<AwarenessContext> {
        let get = entry!(self, ep::USER32, ep::GET_THREAD_DPI_AWARENESS_CONTEXT, GetThreadDpiAwarenessContextFn)?;
        let equal = entry!(self, ep::USER32, ep::ARE_DPI_AWARENESS_CONTEXTS_EQUAL, AreDpiAwarenessContextsEqualFn);

        // SAFETY: takes no arguments and returns a context handle.
        let current = unsafe { get() };
        AwarenessContext::ALL.into_iter().find(|c| match equal {
            // SAFETY: both arguments are context handles.
            Some(equal) => unsafe { equal(current, c.pseudo_handle()) != 0 },
            None => current == c.pseudo_handle(),
        })
    }

    fn is_valid_awareness_context(&self, context: AwarenessContext) -> bool {
        match entry!(self, ep::USER32, ep::IS_VALID_DPI_AWARENESS_CONTEXT, IsValidDpiAwarenessContextFn) {
            // SAFETY: the pseudo-handle is a documented context value.
            Some(is_valid) => unsafe { is_valid(context.pseudo_handle()) != 0 },
            None => false,
        }
    }

    fn set_process_awareness_context(&self, context: AwarenessContext) -> bool {
        match entry!(self, ep::USER32, ep::SET_PROCESS_DPI_AWARENESS_CONTEXT, SetProcessDpiAwarenessContextFn) {
            // SAFETY: the pseudo-handle is a documented context value.
            Some(set) => unsafe { set(context.pseudo_handle()) != 0 },
            None => false,
        }
    }

    fn process_dpi_awareness(&self) -> Option<ProcessDpiAwareness> {
        let get = entry!(self, ep::SHCORE, ep::GET_PROCESS_DPI_AWARENESS, GetProcessDpiAwarenessFn)?;
        let mut raw = 0i32;
        // SAFETY: a null process handle means the current process; raw is a
        // valid out pointer.
        let hr = unsafe { get(std::ptr::null_mut(), &mut raw) };
        if hr != 0 {
            return None;
        }
        ProcessDpiAwareness::from_raw(raw)
    }

    fn set_process_dpi_awareness(&self, awareness: ProcessDpiAwareness) -> i32 {
        match entry!(self, ep::SHCORE, ep::SET_PROCESS_DPI_AWARENESS, SetProcessDpiAwarenessFn) {
            // SAFETY: the argument is a valid PROCESS_DPI_AWARENESS value.
            Some(set) => unsafe { set(awareness.to_raw()) },
            None => E_NOTIMPL,
        }
    }

    fn is_process_dpi_aware(&self) -> bool {
        match entry!(self, ep::USER32, ep::IS_PROCESS_DPI_AWARE, IsProcessDpiAwareFn) {
            // SAFETY: takes no arguments.
            Some(is_aware) => unsafe { is_aware() != 0 },
            None => false,
        }
    }

    fn set_process_dpi_aware(&self) -> bool {
        match entry!(self, ep::USER32, ep::SET_PROCESS_DPI_AWARE, SetProcessDpiAwareFn) {
            // SAFETY: takes no arguments.
            Some(set) => unsafe { set() != 0 },
            None => false,
        }
    }
}
