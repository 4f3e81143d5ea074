//! FirstWindowLatch - one-way gate on awareness changes
//!
//! The OS refuses awareness changes once a top-level window exists on most
//! tiers. The window-creation code flips this latch so callers can skip a
//! call that is bound to fail.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether the awareness mode may still change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AwarenessLifecycle {
    /// No window yet
    Configurable,
    /// A window exists, awareness is frozen
    Fixed,
}

#[derive(Debug, Default)]
pub struct FirstWindowLatch {
    created: AtomicBool,
}

impl FirstWindowLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lifecycle(&self) -> AwarenessLifecycle {
        if self.is_first_window_created() {
            AwarenessLifecycle::Fixed
        } else {
            AwarenessLifecycle::Configurable
        }
    }

    pub fn is_first_window_created(&self) -> bool {
        self.created.load(Ordering::Acquire)
    }

    pub fn mark_first_window_created(&self) {
        if !self.created.swap(true, Ordering::AcqRel) {
            log!("FirstWindowLatch: awareness is now fixed");
        }
    }

    /// Setter form of [`mark_first_window_created`](Self::mark_first_window_created).
    /// Passing `false` never reopens a fixed latch.
    pub fn set_first_window_created(&self, created: bool) {
        if created {
            self.mark_first_window_created();
        }
    }
}
