//! In-memory platform for unit tests
//!
//! Emulates one OS generation: which entry points exist, the primary screen
//! DPI and the process awareness state the setters change.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::platform_port::{entry_points as ep, CapabilityProbe, DpiPlatform, S_OK};
use crate::domain::value_objects::{AwarenessContext, AwarenessTier, ProcessDpiAwareness};

/// `E_ACCESSDENIED`, returned once the awareness has already been set
pub const E_ACCESSDENIED: i32 = 0x8007_0005_u32 as i32;

#[derive(Debug)]
struct FakeState {
    context: AwarenessContext,
    aware: bool,
}

pub struct FakeDpiPlatform {
    tier: AwarenessTier,
    screen_dpi: Option<f64>,
    supports_v2: bool,
    supports_gdi_scaled: bool,
    locked_after_first_set: bool,
    state: Mutex<FakeState>,
    screen_queries: AtomicUsize,
    set_calls: AtomicUsize,
}

impl FakeDpiPlatform {
    pub fn new(tier: AwarenessTier) -> Self {
        Self {
            tier,
            screen_dpi: Some(96.0),
            supports_v2: true,
            supports_gdi_scaled: true,
            locked_after_first_set: false,
            state: Mutex::new(FakeState {
                context: AwarenessContext::Unaware,
                aware: false,
            }),
            screen_queries: AtomicUsize::new(0),
            set_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_screen_dpi(mut self, dpi: Option<f64>) -> Self {
        self.screen_dpi = dpi;
        self
    }

    /// Emulate a build that predates the PerMonitorV2 context
    pub fn without_v2_context(mut self) -> Self {
        self.supports_v2 = false;
        self
    }

    /// Emulate a build that predates the GDI-scaled unaware context
    pub fn without_gdi_scaled_context(mut self) -> Self {
        self.supports_gdi_scaled = false;
        self
    }

    /// Reject awareness changes after the first one, like the real OS
    pub fn locked_after_first_set(mut self) -> Self {
        self.locked_after_first_set = true;
        self
    }

    /// Start with the process already in `context`
    pub fn with_initial_context(self, context: AwarenessContext) -> Self {
        {
            let mut state = self.state.lock();
            state.context = context;
            state.aware = context != AwarenessContext::Unaware
                && context != AwarenessContext::UnawareGdiScaled;
        }
        self
    }

    pub fn screen_query_count(&self) -> usize {
        self.screen_queries.load(Ordering::SeqCst)
    }

    pub fn set_call_count(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    fn tier_rank(&self) -> u8 {
        match self.tier {
            AwarenessTier::PerMonitorV2Capable => 3,
            AwarenessTier::ProcessAwarenessCapable => 2,
            AwarenessTier::LegacyAwareCapable => 1,
            AwarenessTier::None => 0,
        }
    }

    fn apply(&self, context: AwarenessContext) -> bool {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock();
        if self.locked_after_first_set && self.set_calls.load(Ordering::SeqCst) > 1 {
            return false;
        }
        state.context = context;
        state.aware = context != AwarenessContext::Unaware
            && context != AwarenessContext::UnawareGdiScaled;
        true
    }
}

impl CapabilityProbe for FakeDpiPlatform {
    fn is_available(&self, module: &str, entry_point: &str) -> bool {
        let needed = match (module, entry_point) {
            (ep::USER32, ep::SET_PROCESS_DPI_AWARENESS_CONTEXT)
            | (ep::USER32, ep::GET_THREAD_DPI_AWARENESS_CONTEXT)
            | (ep::USER32, ep::ARE_DPI_AWARENESS_CONTEXTS_EQUAL)
            | (ep::USER32, ep::IS_VALID_DPI_AWARENESS_CONTEXT) => 3,
            (ep::SHCORE, ep::SET_PROCESS_DPI_AWARENESS)
            | (ep::SHCORE, ep::GET_PROCESS_DPI_AWARENESS) => 2,
            (ep::USER32, ep::SET_PROCESS_DPI_AWARE) | (ep::USER32, ep::IS_PROCESS_DPI_AWARE) => 1,
            _ => return false,
        };
        self.tier_rank() >= needed
    }
}

impl DpiPlatform for FakeDpiPlatform {
    fn primary_screen_dpi(&self) -> Option<f64> {
        self.screen_queries.fetch_add(1, Ordering::SeqCst);
        self.screen_dpi
    }

    fn thread_awareness_context(&self) -> Option<AwarenessContext> {
        Some(self.state.lock().context)
    }

    fn is_valid_awareness_context(&self, context: AwarenessContext) -> bool {
        match context {
            AwarenessContext::PerMonitorAwareV2 => self.supports_v2,
            AwarenessContext::UnawareGdiScaled => self.supports_gdi_scaled,
            _ => true,
        }
    }

    fn set_process_awareness_context(&self, context: AwarenessContext) -> bool {
        if !self.is_valid_awareness_context(context) {
            return false;
        }
        self.apply(context)
    }

    fn process_dpi_awareness(&self) -> Option<ProcessDpiAwareness> {
        Some(match self.state.lock().context {
            AwarenessContext::Unaware | AwarenessContext::UnawareGdiScaled => {
                ProcessDpiAwareness::Unaware
            }
            AwarenessContext::SystemAware => ProcessDpiAwareness::SystemAware,
            AwarenessContext::PerMonitorAware | AwarenessContext::PerMonitorAwareV2 => {
                ProcessDpiAwareness::PerMonitorAware
            }
        })
    }

    fn set_process_dpi_awareness(&self, awareness: ProcessDpiAwareness) -> i32 {
        let context = match awareness {
            ProcessDpiAwareness::Unaware => AwarenessContext::Unaware,
            ProcessDpiAwareness::SystemAware => AwarenessContext::SystemAware,
            ProcessDpiAwareness::PerMonitorAware => AwarenessContext::PerMonitorAware,
        };
        if self.apply(context) {
            S_OK
        } else {
            E_ACCESSDENIED
        }
    }

    fn is_process_dpi_aware(&self) -> bool {
        self.state.lock().aware
    }

    fn set_process_dpi_aware(&self) -> bool {
        self.apply(AwarenessContext::SystemAware)
    }
}
