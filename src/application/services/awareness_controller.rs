//! AwarenessController - reads and sets the process DPI awareness
//!
//! Each OS generation exposes a different API. The generations are listed
//! newest first in [`CAPABILITY_TIERS`]; the first whose entry point the
//! probe finds supplies the strategy, and that choice is made once per
//! controller.
//!
//! Requests a tier can't express degrade toward less precision
//! (PerMonitorV2 → PerMonitor → SystemAware, GDI-scaled → Unaware). The only
//! outright failure is a platform with no tier at all.

use std::sync::{Arc, OnceLock};

use super::window_latch::{AwarenessLifecycle, FirstWindowLatch};
use crate::application::ports::{entry_points as ep, CapabilityProbe, DpiPlatform, S_OK};
use crate::domain::errors::{DpiError, Result};
use crate::domain::value_objects::awareness::{
    context_for_mode, legacy_action_for_mode, mode_for_context, mode_for_process_awareness,
    process_awareness_for_mode,
};
use crate::domain::value_objects::{AwarenessContext, AwarenessTier, HighDpiMode, LegacyAction};

/// How one OS generation reads and writes the awareness mode
pub trait AwarenessStrategy: Send + Sync {
    fn tier(&self) -> AwarenessTier;

    fn current_mode(&self, platform: &dyn DpiPlatform) -> HighDpiMode;

    fn set_mode(&self, platform: &dyn DpiPlatform, requested: HighDpiMode) -> bool;
}

/// Detection predicate plus strategy for one tier
pub struct CapabilityDescriptor {
    pub tier: AwarenessTier,
    pub module: &'static str,
    pub entry_point: &'static str,
    pub strategy: &'static dyn AwarenessStrategy,
}

/// Supported tiers, newest first
pub static CAPABILITY_TIERS: [CapabilityDescriptor; 3] = [
    CapabilityDescriptor {
        tier: AwarenessTier::PerMonitorV2Capable,
        module: ep::USER32,
        entry_point: ep::SET_PROCESS_DPI_AWARENESS_CONTEXT,
        strategy: &PerMonitorV2Strategy,
    },
    CapabilityDescriptor {
        tier: AwarenessTier::ProcessAwarenessCapable,
        module: ep::SHCORE,
        entry_point: ep::SET_PROCESS_DPI_AWARENESS,
        strategy: &ProcessAwarenessStrategy,
    },
    CapabilityDescriptor {
        tier: AwarenessTier::LegacyAwareCapable,
        module: ep::USER32,
        entry_point: ep::SET_PROCESS_DPI_AWARE,
        strategy: &LegacyAwareStrategy,
    },
];

static UNSUPPORTED: UnsupportedStrategy = UnsupportedStrategy;

fn select_strategy<P: CapabilityProbe + ?Sized>(probe: &P) -> &'static dyn AwarenessStrategy {
    CAPABILITY_TIERS
        .iter()
        .find(|d| probe.is_available(d.module, d.entry_point))
        .map(|d| d.strategy)
        .unwrap_or(&UNSUPPORTED)
}

/// Newest awareness tier the probe can find
pub fn detect_tier<P: CapabilityProbe + ?Sized>(probe: &P) -> AwarenessTier {
    select_strategy(probe).tier()
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// Thread/process awareness contexts
pub struct PerMonitorV2Strategy;

impl AwarenessStrategy for PerMonitorV2Strategy {
    fn tier(&self) -> AwarenessTier {
        AwarenessTier::PerMonitorV2Capable
    }

    fn current_mode(&self, platform: &dyn DpiPlatform) -> HighDpiMode {
        platform
            .thread_awareness_context()
            .map(mode_for_context)
            .unwrap_or(HighDpiMode::DpiUnaware)
    }

    fn set_mode(&self, platform: &dyn DpiPlatform, requested: HighDpiMode) -> bool {
        let mut context = context_for_mode(requested);

        if context == AwarenessContext::PerMonitorAwareV2
            && !platform.is_valid_awareness_context(context)
        {
            log!("AwarenessController: PerMonitorV2 unsupported, using SystemAware");
            context = AwarenessContext::SystemAware;
        } else if context == AwarenessContext::UnawareGdiScaled
            && !platform.is_valid_awareness_context(context)
        {
            log!("AwarenessController: GDI-scaled context unsupported, using Unaware");
            context = AwarenessContext::Unaware;
        }

        platform.set_process_awareness_context(context)
    }
}

/// `shcore` three-value process awareness
pub struct ProcessAwarenessStrategy;

impl AwarenessStrategy for ProcessAwarenessStrategy {
    fn tier(&self) -> AwarenessTier {
        AwarenessTier::ProcessAwarenessCapable
    }

    fn current_mode(&self, platform: &dyn DpiPlatform) -> HighDpiMode {
        platform
            .process_dpi_awareness()
            .map(mode_for_process_awareness)
            .unwrap_or(HighDpiMode::DpiUnaware)
    }

    fn set_mode(&self, platform: &dyn DpiPlatform, requested: HighDpiMode) -> bool {
        let awareness = process_awareness_for_mode(requested);
        let hr = platform.set_process_dpi_awareness(awareness);
        if hr != S_OK {
            log!(
                "AwarenessController: SetProcessDpiAwareness({:?}) returned {:#010x}",
                awareness,
                hr as u32
            );
        }
        hr == S_OK
    }
}

/// `SetProcessDPIAware` boolean
pub struct LegacyAwareStrategy;

impl AwarenessStrategy for LegacyAwareStrategy {
    fn tier(&self) -> AwarenessTier {
        AwarenessTier::LegacyAwareCapable
    }

    fn current_mode(&self, platform: &dyn DpiPlatform) -> HighDpiMode {
        if platform.is_process_dpi_aware() {
            HighDpiMode::SystemAware
        } else {
            HighDpiMode::DpiUnaware
        }
    }

    fn set_mode(&self, platform: &dyn DpiPlatform, requested: HighDpiMode) -> bool {
        match legacy_action_for_mode(requested) {
            LegacyAction::KeepDefault => true,
            LegacyAction::SetAware => platform.set_process_dpi_aware(),
        }
    }
}

/// OS predating every awareness API
pub struct UnsupportedStrategy;

impl AwarenessStrategy for UnsupportedStrategy {
    fn tier(&self) -> AwarenessTier {
        AwarenessTier::None
    }

    fn current_mode(&self, _platform: &dyn DpiPlatform) -> HighDpiMode {
        HighDpiMode::DpiUnaware
    }

    fn set_mode(&self, _platform: &dyn DpiPlatform, _requested: HighDpiMode) -> bool {
        false
    }
}

// ============================================================================
// CONTROLLER
// ============================================================================

pub struct AwarenessController {
    platform: Arc<dyn DpiPlatform>,
    latch: Arc<FirstWindowLatch>,
    strategy: OnceLock<&'static dyn AwarenessStrategy>,
}

impl AwarenessController {
    pub fn new(platform: Arc<dyn DpiPlatform>, latch: Arc<FirstWindowLatch>) -> Self {
        Self {
            platform,
            latch,
            strategy: OnceLock::new(),
        }
    }

    fn strategy(&self) -> &'static dyn AwarenessStrategy {
        *self.strategy.get_or_init(|| {
            let strategy = select_strategy(self.platform.as_ref());
            log!("AwarenessController: detected tier {:?}", strategy.tier());
            strategy
        })
    }

    pub fn tier(&self) -> AwarenessTier {
        self.strategy().tier()
    }

    /// Current awareness, read live from the OS
    pub fn current_mode(&self) -> HighDpiMode {
        self.strategy().current_mode(self.platform.as_ref())
    }

    /// Ask the OS for `requested`, degrading it to what the tier supports
    pub fn set_mode(&self, requested: HighDpiMode) -> bool {
        let ok = self.strategy().set_mode(self.platform.as_ref(), requested);
        log!("AwarenessController: set_mode({}) -> {}", requested, ok);
        ok
    }

    /// [`set_mode`](Self::set_mode) guarded by the first-window latch.
    ///
    /// Returns the mode actually in effect afterwards, which may be a
    /// degraded form of `requested`.
    pub fn configure(&self, requested: HighDpiMode) -> Result<HighDpiMode> {
        if self.latch.lifecycle() == AwarenessLifecycle::Fixed {
            return Err(DpiError::AwarenessFixed);
        }
        if !self.set_mode(requested) {
            return Err(DpiError::SetAwarenessFailed {
                requested,
                tier: self.tier(),
            });
        }
        Ok(self.current_mode())
    }

    pub fn latch(&self) -> &FirstWindowLatch {
        &self.latch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::fake_platform::FakeDpiPlatform;
    use crate::application::ports::NullDpiPlatform;

    fn controller(platform: FakeDpiPlatform) -> (Arc<FakeDpiPlatform>, AwarenessController) {
        let platform = Arc::new(platform);
        let controller = AwarenessController::new(platform.clone(), Arc::new(FirstWindowLatch::new()));
        (platform, controller)
    }

    #[test]
    fn test_detects_each_tier() {
        for tier in [
            AwarenessTier::PerMonitorV2Capable,
            AwarenessTier::ProcessAwarenessCapable,
            AwarenessTier::LegacyAwareCapable,
            AwarenessTier::None,
        ] {
            assert_eq!(detect_tier(&FakeDpiPlatform::new(tier)), tier);
        }
        assert_eq!(detect_tier(&NullDpiPlatform), AwarenessTier::None);
    }

    #[test]
    fn test_tiers_are_listed_newest_first() {
        let tiers: Vec<AwarenessTier> = CAPABILITY_TIERS.iter().map(|d| d.tier).collect();
        assert_eq!(
            tiers,
            vec![
                AwarenessTier::PerMonitorV2Capable,
                AwarenessTier::ProcessAwarenessCapable,
                AwarenessTier::LegacyAwareCapable,
            ]
        );
        for d in &CAPABILITY_TIERS {
            assert_eq!(d.strategy.tier(), d.tier);
        }
    }

    #[test]
    fn test_per_monitor_v2_round_trips_every_mode() {
        for mode in HighDpiMode::ALL {
            let (_, c) = controller(FakeDpiPlatform::new(AwarenessTier::PerMonitorV2Capable));
            assert!(c.set_mode(mode));
            assert_eq!(c.current_mode(), mode);
        }
    }

    #[test]
    fn test_per_monitor_v2_downgrades_to_system_aware_when_unsupported() {
        let (_, c) = controller(
            FakeDpiPlatform::new(AwarenessTier::PerMonitorV2Capable).without_v2_context(),
        );
        assert!(c.set_mode(HighDpiMode::PerMonitorV2));
        assert_eq!(c.current_mode(), HighDpiMode::SystemAware);
    }

    #[test]
    fn test_gdi_scaled_downgrades_to_unaware_when_unsupported() {
        let (_, c) = controller(
            FakeDpiPlatform::new(AwarenessTier::PerMonitorV2Capable)
                .without_gdi_scaled_context()
                .with_initial_context(AwarenessContext::SystemAware),
        );
        assert!(c.set_mode(HighDpiMode::DpiUnawareGdiScaled));
        assert_eq!(c.current_mode(), HighDpiMode::DpiUnaware);
    }

    #[test]
    fn test_process_tier_degrades_per_monitor_v2() {
        let (_, c) = controller(FakeDpiPlatform::new(AwarenessTier::ProcessAwarenessCapable));
        assert!(c.set_mode(HighDpiMode::PerMonitorV2));
        assert_eq!(c.current_mode(), HighDpiMode::PerMonitor);
    }

    #[test]
    fn test_process_tier_degrades_gdi_scaled() {
        let (_, c) = controller(
            FakeDpiPlatform::new(AwarenessTier::ProcessAwarenessCapable)
                .with_initial_context(AwarenessContext::SystemAware),
        );
        assert!(c.set_mode(HighDpiMode::DpiUnawareGdiScaled));
        assert_eq!(c.current_mode(), HighDpiMode::DpiUnaware);
    }

    #[test]
    fn test_process_tier_reports_os_refusal() {
        let (_, c) = controller(
            FakeDpiPlatform::new(AwarenessTier::ProcessAwarenessCapable).locked_after_first_set(),
        );
        assert!(c.set_mode(HighDpiMode::SystemAware));
        assert!(!c.set_mode(HighDpiMode::PerMonitor));
        assert_eq!(c.current_mode(), HighDpiMode::SystemAware);
    }

    #[test]
    fn test_legacy_tier_unaware_needs_no_os_call() {
        let (platform, c) = controller(FakeDpiPlatform::new(AwarenessTier::LegacyAwareCapable));
        assert!(c.set_mode(HighDpiMode::DpiUnaware));
        assert!(c.set_mode(HighDpiMode::DpiUnawareGdiScaled));
        assert_eq!(platform.set_call_count(), 0);
        assert_eq!(c.current_mode(), HighDpiMode::DpiUnaware);
    }

    #[test]
    fn test_legacy_tier_aware_modes_become_system_aware() {
        for mode in [
            HighDpiMode::SystemAware,
            HighDpiMode::PerMonitor,
            HighDpiMode::PerMonitorV2,
        ] {
            let (platform, c) = controller(FakeDpiPlatform::new(AwarenessTier::LegacyAwareCapable));
            assert!(c.set_mode(mode));
            assert_eq!(platform.set_call_count(), 1);
            assert_eq!(c.current_mode(), HighDpiMode::SystemAware);
        }
    }

    #[test]
    fn test_no_tier_fails_and_reads_unaware() {
        let (_, c) = controller(FakeDpiPlatform::new(AwarenessTier::None));
        assert!(!c.set_mode(HighDpiMode::SystemAware));
        assert_eq!(c.current_mode(), HighDpiMode::DpiUnaware);
        assert_eq!(c.tier(), AwarenessTier::None);
    }

    #[test]
    fn test_configure_returns_effective_mode() {
        let (_, c) = controller(FakeDpiPlatform::new(AwarenessTier::ProcessAwarenessCapable));
        let mode = c.configure(HighDpiMode::PerMonitorV2).unwrap();
        assert_eq!(mode, HighDpiMode::PerMonitor);
    }

    #[test]
    fn test_configure_rejected_after_first_window() {
        let (platform, c) = controller(FakeDpiPlatform::new(AwarenessTier::PerMonitorV2Capable));
        c.latch().mark_first_window_created();

        let err = c.configure(HighDpiMode::PerMonitorV2).unwrap_err();
        assert!(matches!(err, DpiError::AwarenessFixed));
        assert_eq!(platform.set_call_count(), 0);
    }

    #[test]
    fn test_configure_without_tier_fails() {
        let (_, c) = controller(FakeDpiPlatform::new(AwarenessTier::None));
        let err = c.configure(HighDpiMode::SystemAware).unwrap_err();
        assert!(matches!(
            err,
            DpiError::SetAwarenessFailed {
                requested: HighDpiMode::SystemAware,
                tier: AwarenessTier::None
            }
        ));
    }
}
