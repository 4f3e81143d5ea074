//! DpiState - lazily computed screen DPI and derived values
//!
//! Owned by the [`DpiContext`](crate::infrastructure::composition_root::DpiContext)
//! rather than living in statics. Every value is computed on first use and
//! then kept until [`DpiState::reset`]. The cache mutex is held across the
//! OS query, so concurrent first callers run it only once.

use std::sync::Arc;

use parking_lot::Mutex;

use super::awareness_controller::detect_tier;
use crate::application::ports::DpiPlatform;
use crate::domain::services::scaling;
use crate::domain::value_objects::{AwarenessTier, InterpolationMode, ProcessDpiAwareness, LOGICAL_DPI};

#[derive(Debug)]
struct DpiCache {
    initialized: bool,
    device_dpi: f64,
    scaling_factor: Option<f64>,
    interpolation: InterpolationMode,
    awareness_known: bool,
    may_be_per_monitor_v2: bool,
    scaling_requirement_met: bool,
}

impl Default for DpiCache {
    fn default() -> Self {
        Self {
            initialized: false,
            device_dpi: LOGICAL_DPI,
            scaling_factor: None,
            interpolation: InterpolationMode::Invalid,
            awareness_known: false,
            may_be_per_monitor_v2: false,
            scaling_requirement_met: false,
        }
    }
}

pub struct DpiState {
    platform: Arc<dyn DpiPlatform>,
    cache: Mutex<DpiCache>,
}

impl DpiState {
    pub fn new(platform: Arc<dyn DpiPlatform>) -> Self {
        Self {
            platform,
            cache: Mutex::new(DpiCache::default()),
        }
    }

    /// Query the primary screen DPI once. Later calls are no-ops.
    pub fn initialize(&self) {
        let mut cache = self.cache.lock();
        self.initialize_locked(&mut cache);
    }

    fn initialize_locked(&self, cache: &mut DpiCache) {
        if cache.initialized {
            return;
        }

        match self.platform.primary_screen_dpi() {
            Some(dpi) if dpi.is_finite() && dpi > 0.0 => {
                log!("DpiState: primary screen at {} DPI", dpi);
                cache.device_dpi = dpi;
            }
            Some(dpi) => {
                log!("DpiState: ignoring screen DPI {}, assuming {}", dpi, LOGICAL_DPI);
            }
            None => {
                log!("DpiState: no screen DC, assuming {} DPI", LOGICAL_DPI);
            }
        }
        cache.initialized = true;
    }

    /// Determine whether the process may be per-monitor aware. Runs once.
    ///
    /// On the newest tier a per-monitor process can host windows with
    /// different awareness, so its mode has to be queried per call rather
    /// than trusted from a cache.
    pub fn ensure_awareness_context_known(&self) {
        let mut cache = self.cache.lock();
        self.ensure_awareness_locked(&mut cache);
    }

    fn ensure_awareness_locked(&self, cache: &mut DpiCache) {
        if cache.awareness_known {
            return;
        }
        self.initialize_locked(cache);

        if detect_tier(self.platform.as_ref()) == AwarenessTier::PerMonitorV2Capable {
            let awareness = self.platform.process_dpi_awareness();
            cache.may_be_per_monitor_v2 = !matches!(
                awareness,
                None | Some(ProcessDpiAwareness::Unaware) | Some(ProcessDpiAwareness::SystemAware)
            );
            log!(
                "DpiState: process awareness {:?}, per-call mode query: {}",
                awareness,
                cache.may_be_per_monitor_v2
            );
        }

        cache.scaling_requirement_met =
            cache.device_dpi != LOGICAL_DPI || cache.may_be_per_monitor_v2;
        cache.awareness_known = true;
    }

    pub fn device_dpi(&self) -> f64 {
        let mut cache = self.cache.lock();
        self.initialize_locked(&mut cache);
        cache.device_dpi
    }

    /// Whether the primary screen differs from 96 DPI
    pub fn is_scaling_required(&self) -> bool {
        self.device_dpi() != LOGICAL_DPI
    }

    /// Screen differs from 96 DPI, or the process may be PerMonitorV2
    pub fn scaling_requirement_met(&self) -> bool {
        let mut cache = self.cache.lock();
        self.ensure_awareness_locked(&mut cache);
        cache.scaling_requirement_met
    }

    /// Whether the awareness mode must be queried per call
    pub fn may_be_per_monitor_v2(&self) -> bool {
        let mut cache = self.cache.lock();
        self.ensure_awareness_locked(&mut cache);
        cache.may_be_per_monitor_v2
    }

    /// `DeviceDpi / 96`, computed once
    pub fn scaling_factor(&self) -> f64 {
        let mut cache = self.cache.lock();
        self.scaling_factor_locked(&mut cache)
    }

    fn scaling_factor_locked(&self, cache: &mut DpiCache) -> f64 {
        if let Some(factor) = cache.scaling_factor {
            return factor;
        }
        self.initialize_locked(cache);

        let factor = scaling::factor_for_dpi(cache.device_dpi);
        cache.scaling_factor = Some(factor);
        if cache.may_be_per_monitor_v2 {
            // Kept for the context's lifetime even though PerMonitorV2 windows
            // can move to screens with another DPI; reset() re-reads it.
            log!("DpiState: caching factor {} in a per-monitor process", factor);
        }
        factor
    }

    /// Resampling mode for the cached factor, computed once
    pub fn interpolation_mode(&self) -> InterpolationMode {
        let mut cache = self.cache.lock();
        if cache.interpolation.is_valid() {
            return cache.interpolation;
        }

        let factor = self.scaling_factor_locked(&mut cache);
        let mode = InterpolationMode::for_scale_factor(factor);
        log!("DpiState: interpolation {:?} for factor {}", mode, factor);
        cache.interpolation = mode;
        mode
    }

    /// Forget every cached value; the next access queries the OS again
    pub fn reset(&self) {
        *self.cache.lock() = DpiCache::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::fake_platform::FakeDpiPlatform;
    use crate::domain::value_objects::AwarenessContext;

    fn state_with(platform: FakeDpiPlatform) -> (Arc<FakeDpiPlatform>, DpiState) {
        let platform = Arc::new(platform);
        let state = DpiState::new(platform.clone());
        (platform, state)
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (platform, state) =
            state_with(FakeDpiPlatform::new(AwarenessTier::None).with_screen_dpi(Some(144.0)));

        state.initialize();
        let first = state.device_dpi();
        state.initialize();
        let second = state.device_dpi();

        assert_eq!(first, 144.0);
        assert_eq!(first, second);
        assert_eq!(platform.screen_query_count(), 1);
    }

    #[test]
    fn test_missing_screen_dc_keeps_logical_dpi() {
        let (_, state) = state_with(FakeDpiPlatform::new(AwarenessTier::None).with_screen_dpi(None));

        assert_eq!(state.device_dpi(), LOGICAL_DPI);
        assert_eq!(state.scaling_factor(), 1.0);
        assert!(!state.is_scaling_required());
    }

    #[test]
    fn test_non_positive_dpi_is_ignored() {
        let (_, state) =
            state_with(FakeDpiPlatform::new(AwarenessTier::None).with_screen_dpi(Some(0.0)));
        assert_eq!(state.device_dpi(), LOGICAL_DPI);
    }

    #[test]
    fn test_scaling_factor_is_cached() {
        let (platform, state) =
            state_with(FakeDpiPlatform::new(AwarenessTier::None).with_screen_dpi(Some(120.0)));

        assert_eq!(state.scaling_factor(), 1.25);
        assert_eq!(state.scaling_factor(), 1.25);
        assert_eq!(platform.screen_query_count(), 1);
        assert!(state.is_scaling_required());
    }

    #[test]
    fn test_concurrent_first_callers_query_once() {
        use std::sync::Barrier;
        use std::thread;

        const THREADS: usize = 8;
        let platform =
            Arc::new(FakeDpiPlatform::new(AwarenessTier::None).with_screen_dpi(Some(144.0)));
        let state = Arc::new(DpiState::new(platform.clone()));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let state = state.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    if i % 2 == 0 {
                        (state.scaling_factor(), state.interpolation_mode())
                    } else {
                        let mode = state.interpolation_mode();
                        (state.scaling_factor(), mode)
                    }
                })
            })
            .collect();

        for handle in handles {
            let (factor, mode) = handle.join().unwrap();
            assert_eq!(factor, 1.5);
            assert_eq!(mode, InterpolationMode::HighQualityBicubic);
        }
        assert_eq!(platform.screen_query_count(), 1);
    }

    #[test]
    fn test_interpolation_modes_by_screen_dpi() {
        let cases = [
            (96.0, InterpolationMode::NearestNeighbor),
            (192.0, InterpolationMode::NearestNeighbor),
            (144.0, InterpolationMode::HighQualityBicubic),
            (72.0, InterpolationMode::HighQualityBilinear),
            (48.0, InterpolationMode::HighQualityBilinear),
        ];
        for (dpi, expected) in cases {
            let (_, state) =
                state_with(FakeDpiPlatform::new(AwarenessTier::None).with_screen_dpi(Some(dpi)));
            assert_eq!(state.interpolation_mode(), expected, "{dpi} DPI");
        }
    }

    #[test]
    fn test_reset_requeries_screen() {
        let (platform, state) =
            state_with(FakeDpiPlatform::new(AwarenessTier::None).with_screen_dpi(Some(144.0)));

        assert_eq!(state.interpolation_mode(), InterpolationMode::HighQualityBicubic);
        state.reset();
        assert_eq!(state.scaling_factor(), 1.5);
        assert_eq!(platform.screen_query_count(), 2);
    }

    #[test]
    fn test_per_monitor_process_requires_scaling_at_96_dpi() {
        let (_, state) = state_with(
            FakeDpiPlatform::new(AwarenessTier::PerMonitorV2Capable)
                .with_initial_context(AwarenessContext::PerMonitorAwareV2),
        );

        assert!(!state.is_scaling_required());
        assert!(state.may_be_per_monitor_v2());
        assert!(state.scaling_requirement_met());
    }

    #[test]
    fn test_system_aware_process_at_96_dpi_needs_no_scaling() {
        let (_, state) = state_with(
            FakeDpiPlatform::new(AwarenessTier::PerMonitorV2Capable)
                .with_initial_context(AwarenessContext::SystemAware),
        );

        assert!(!state.may_be_per_monitor_v2());
        assert!(!state.scaling_requirement_met());
    }

    #[test]
    fn test_older_tiers_never_flag_per_monitor_v2() {
        let (_, state) = state_with(
            FakeDpiPlatform::new(AwarenessTier::ProcessAwarenessCapable)
                .with_initial_context(AwarenessContext::PerMonitorAware)
                .with_screen_dpi(Some(120.0)),
        );

        assert!(!state.may_be_per_monitor_v2());
        assert!(state.scaling_requirement_met());
    }
}
