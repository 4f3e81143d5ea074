//! Dynamic entry point resolution
//!
//! DPI entry points are looked up at runtime instead of linked, so the
//! binary still loads on builds that predate them. Lookups are cached per
//! (module, name).

use std::collections::HashMap;
use std::ffi::CString;

use parking_lot::Mutex;
use windows::core::PCSTR;
use windows::Win32::System::LibraryLoader::{GetModuleHandleA, GetProcAddress, LoadLibraryA};

use crate::application::ports::CapabilityProbe;

/// Untyped entry point as returned by `GetProcAddress`
pub type RawProc = unsafe extern "system" fn() -> isize;

#[derive(Default)]
pub struct LibraryProbe {
    cache: Mutex<HashMap<(String, String), Option<RawProc>>>,
}

impl LibraryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address of `entry_point` in `module`, loading the module if needed
    pub fn resolve(&self, module: &str, entry_point: &str) -> Option<RawProc> {
        let key = (module.to_ascii_lowercase(), entry_point.to_string());
        let mut cache = self.cache.lock();
        if let Some(cached) = cache.get(&key) {
            return *cached;
        }

        let resolved = lookup(module, entry_point);
        log!(
            "LibraryProbe: {}!{} {}",
            module,
            entry_point,
            if resolved.is_some() { "found" } else { "missing" }
        );
        cache.insert(key, resolved);
        resolved
    }
}

fn lookup(module: &str, entry_point: &str) -> Option<RawProc> {
    let module_c = CString::new(module).ok()?;
    let name_c = CString::new(entry_point).ok()?;
    let module_p = PCSTR(module_c.as_ptr() as *const u8);
    let name_p = PCSTR(name_c.as_ptr() as *const u8);

    // SAFETY: both strings are NUL-terminated and outlive the calls. A module
    // loaded here stays loaded for the process lifetime, which keeps the
    // cached addresses valid.
    unsafe {
        let hmodule = GetModuleHandleA(module_p)
            .or_else(|_| LoadLibraryA(module_p))
            .ok()?;
        GetProcAddress(hmodule, name_p)
    }
}

impl CapabilityProbe for LibraryProbe {
    fn is_available(&self, module: &str, entry_point: &str) -> bool {
        self.resolve(module, entry_point).is_some()
    }
}
