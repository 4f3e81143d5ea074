//! DpiContext - Dependency Injection Container
//!
//! Wires the DPI services onto one platform implementation. The toolkit root
//! creates one context and hands its components to whoever needs them.

use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{DpiPlatform, NullDpiPlatform};
use crate::application::services::{
    AwarenessController, BitmapRescaler, DpiState, FirstWindowLatch, ScalingEngine,
};
use crate::domain::errors::Result;
use crate::domain::value_objects::HighDpiMode;
use crate::shared::config::DpiConfig;

/// Owns every DPI component and the platform they share
pub struct DpiContext {
    platform: Arc<dyn DpiPlatform>,
    state: Arc<DpiState>,
    latch: Arc<FirstWindowLatch>,
    scaling: ScalingEngine,
    rescaler: BitmapRescaler,
    awareness: AwarenessController,
}

impl DpiContext {
    pub fn new(platform: Arc<dyn DpiPlatform>) -> Self {
        let state = Arc::new(DpiState::new(platform.clone()));
        let latch = Arc::new(FirstWindowLatch::new());
        let scaling = ScalingEngine::new(state.clone());
        let rescaler = BitmapRescaler::new(state.clone(), scaling.clone());
        let awareness = AwarenessController::new(platform.clone(), latch.clone());

        Self {
            platform,
            state,
            latch,
            scaling,
            rescaler,
            awareness,
        }
    }

    /// Context backed by the running OS
    #[cfg(target_os = "windows")]
    pub fn for_current_os() -> Self {
        Self::new(Arc::new(crate::platform::win32::Win32DpiPlatform::new()))
    }

    /// Context backed by the running OS
    ///
    /// Off Windows nothing is available, so every query falls back to
    /// 96 DPI and an unaware process.
    #[cfg(not(target_os = "windows"))]
    pub fn for_current_os() -> Self {
        Self::new(Arc::new(NullDpiPlatform))
    }

    /// Context where every capability is absent
    pub fn null() -> Self {
        Self::new(Arc::new(NullDpiPlatform))
    }

    pub fn platform(&self) -> &Arc<dyn DpiPlatform> {
        &self.platform
    }

    pub fn state(&self) -> &DpiState {
        &self.state
    }

    pub fn latch(&self) -> &FirstWindowLatch {
        &self.latch
    }

    pub fn scaling(&self) -> &ScalingEngine {
        &self.scaling
    }

    pub fn rescaler(&self) -> &BitmapRescaler {
        &self.rescaler
    }

    pub fn awareness(&self) -> &AwarenessController {
        &self.awareness
    }

    /// Start logging if configured, then request the configured awareness.
    ///
    /// Returns the mode in effect afterwards.
    pub fn apply_config(&self, config: &DpiConfig) -> Result<HighDpiMode> {
        if config.log.enabled && !crate::log::is_enabled() {
            crate::log::init(&config.log.resolved_path());
        }

        match self.awareness.configure(config.high_dpi_mode) {
            Ok(mode) => {
                log!(
                    "DpiContext: requested {}, effective {}",
                    config.high_dpi_mode,
                    mode
                );
                Ok(mode)
            }
            Err(e) => {
                log!("DpiContext: configure({}) failed: {}", config.high_dpi_mode, e);
                Err(e)
            }
        }
    }

    /// [`apply_config`](Self::apply_config) with settings read from `path`.
    ///
    /// Unlike [`DpiConfig::load`], a missing or malformed file is an error.
    pub fn apply_config_file(&self, path: &Path) -> Result<HighDpiMode> {
        let config = DpiConfig::load_from_path(path)?;
        self.apply_config(&config)
    }
}

impl Default for DpiContext {
    fn default() -> Self {
        Self::for_current_os()
    }
}
