//! DPI awareness vocabularies and the tables that translate between them
//!
//! [`HighDpiMode`] is what the toolkit speaks. Each OS generation has its own
//! representation; the `const` tables below are the only place the two are
//! related, so every source value has exactly one row.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Application-facing awareness mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HighDpiMode {
    DpiUnaware,
    #[default]
    SystemAware,
    PerMonitor,
    PerMonitorV2,
    DpiUnawareGdiScaled,
}

impl HighDpiMode {
    pub const ALL: [HighDpiMode; 5] = [
        HighDpiMode::DpiUnaware,
        HighDpiMode::SystemAware,
        HighDpiMode::PerMonitor,
        HighDpiMode::PerMonitorV2,
        HighDpiMode::DpiUnawareGdiScaled,
    ];
}

impl fmt::Display for HighDpiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HighDpiMode::DpiUnaware => "DpiUnaware",
            HighDpiMode::SystemAware => "SystemAware",
            HighDpiMode::PerMonitor => "PerMonitor",
            HighDpiMode::PerMonitorV2 => "PerMonitorV2",
            HighDpiMode::DpiUnawareGdiScaled => "DpiUnawareGdiScaled",
        };
        f.write_str(name)
    }
}

/// Which generation of OS DPI API is available, newest first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AwarenessTier {
    /// Thread/process awareness contexts (Windows 10 1703+)
    PerMonitorV2Capable,
    /// `shcore` process awareness (Windows 8.1+)
    ProcessAwarenessCapable,
    /// `SetProcessDPIAware` boolean (Vista+)
    LegacyAwareCapable,
    None,
}

/// Newest-tier awareness context, one per OS pseudo-handle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AwarenessContext {
    Unaware,
    SystemAware,
    PerMonitorAware,
    PerMonitorAwareV2,
    UnawareGdiScaled,
}

impl AwarenessContext {
    pub const ALL: [AwarenessContext; 5] = [
        AwarenessContext::Unaware,
        AwarenessContext::SystemAware,
        AwarenessContext::PerMonitorAware,
        AwarenessContext::PerMonitorAwareV2,
        AwarenessContext::UnawareGdiScaled,
    ];

    /// The `DPI_AWARENESS_CONTEXT` pseudo-handle value
    pub fn pseudo_handle(self) -> isize {
        match self {
            AwarenessContext::Unaware => -1,
            AwarenessContext::SystemAware => -2,
            AwarenessContext::PerMonitorAware => -3,
            AwarenessContext::PerMonitorAwareV2 => -4,
            AwarenessContext::UnawareGdiScaled => -5,
        }
    }
}

/// Legacy three-value process awareness (`PROCESS_DPI_AWARENESS`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessDpiAwareness {
    Unaware,
    SystemAware,
    PerMonitorAware,
}

impl ProcessDpiAwareness {
    pub const ALL: [ProcessDpiAwareness; 3] = [
        ProcessDpiAwareness::Unaware,
        ProcessDpiAwareness::SystemAware,
        ProcessDpiAwareness::PerMonitorAware,
    ];

    /// Raw `PROCESS_DPI_AWARENESS` value
    pub fn to_raw(self) -> i32 {
        match self {
            ProcessDpiAwareness::Unaware => 0,
            ProcessDpiAwareness::SystemAware => 1,
            ProcessDpiAwareness::PerMonitorAware => 2,
        }
    }

    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.to_raw() == raw)
    }
}

/// What the legacy boolean tier must do for a requested mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegacyAction {
    /// Unaware is the process default, nothing to call
    KeepDefault,
    /// Call `SetProcessDPIAware`
    SetAware,
}

pub const CONTEXT_TO_MODE: [(AwarenessContext, HighDpiMode); 5] = [
    (AwarenessContext::PerMonitorAwareV2, HighDpiMode::PerMonitorV2),
    (AwarenessContext::PerMonitorAware, HighDpiMode::PerMonitor),
    (AwarenessContext::SystemAware, HighDpiMode::SystemAware),
    (AwarenessContext::Unaware, HighDpiMode::DpiUnaware),
    (AwarenessContext::UnawareGdiScaled, HighDpiMode::DpiUnawareGdiScaled),
];

pub const MODE_TO_CONTEXT: [(HighDpiMode, AwarenessContext); 5] = [
    (HighDpiMode::PerMonitorV2, AwarenessContext::PerMonitorAwareV2),
    (HighDpiMode::PerMonitor, AwarenessContext::PerMonitorAware),
    (HighDpiMode::SystemAware, AwarenessContext::SystemAware),
    (HighDpiMode::DpiUnaware, AwarenessContext::Unaware),
    (HighDpiMode::DpiUnawareGdiScaled, AwarenessContext::UnawareGdiScaled),
];

pub const PROCESS_AWARENESS_TO_MODE: [(ProcessDpiAwareness, HighDpiMode); 3] = [
    (ProcessDpiAwareness::Unaware, HighDpiMode::DpiUnaware),
    (ProcessDpiAwareness::SystemAware, HighDpiMode::SystemAware),
    (ProcessDpiAwareness::PerMonitorAware, HighDpiMode::PerMonitor),
];

pub const MODE_TO_PROCESS_AWARENESS: [(HighDpiMode, ProcessDpiAwareness); 5] = [
    (HighDpiMode::DpiUnaware, ProcessDpiAwareness::Unaware),
    (HighDpiMode::SystemAware, ProcessDpiAwareness::SystemAware),
    (HighDpiMode::PerMonitor, ProcessDpiAwareness::PerMonitorAware),
    (HighDpiMode::PerMonitorV2, ProcessDpiAwareness::PerMonitorAware),
    (HighDpiMode::DpiUnawareGdiScaled, ProcessDpiAwareness::Unaware),
];

pub const MODE_TO_LEGACY_ACTION: [(HighDpiMode, LegacyAction); 5] = [
    (HighDpiMode::DpiUnaware, LegacyAction::KeepDefault),
    (HighDpiMode::DpiUnawareGdiScaled, LegacyAction::KeepDefault),
    (HighDpiMode::SystemAware, LegacyAction::SetAware),
    (HighDpiMode::PerMonitor, LegacyAction::SetAware),
    (HighDpiMode::PerMonitorV2, LegacyAction::SetAware),
];

fn lookup<K: PartialEq + Copy, V: Copy>(table: &[(K, V)], key: K) -> Option<V> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Mode for a newest-tier context
pub fn mode_for_context(context: AwarenessContext) -> HighDpiMode {
    lookup(&CONTEXT_TO_MODE, context).unwrap_or(HighDpiMode::DpiUnaware)
}

/// Newest-tier context for a requested mode, before any validity check
pub fn context_for_mode(mode: HighDpiMode) -> AwarenessContext {
    lookup(&MODE_TO_CONTEXT, mode).unwrap_or(AwarenessContext::Unaware)
}

/// Mode for a legacy process awareness value
pub fn mode_for_process_awareness(awareness: ProcessDpiAwareness) -> HighDpiMode {
    lookup(&PROCESS_AWARENESS_TO_MODE, awareness).unwrap_or(HighDpiMode::DpiUnaware)
}

/// Legacy process awareness for a requested mode, degrading what it can't express
pub fn process_awareness_for_mode(mode: HighDpiMode) -> ProcessDpiAwareness {
    lookup(&MODE_TO_PROCESS_AWARENESS, mode).unwrap_or(ProcessDpiAwareness::Unaware)
}

/// Boolean-tier action for a requested mode
pub fn legacy_action_for_mode(mode: HighDpiMode) -> LegacyAction {
    lookup(&MODE_TO_LEGACY_ACTION, mode).unwrap_or(LegacyAction::KeepDefault)
}
