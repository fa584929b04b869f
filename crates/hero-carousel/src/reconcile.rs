#![forbid(unsafe_code)]

//! Resize reconciliation.
//!
//! [`ResizeReconciler`] sits between raw resize signals and the engine. It
//! debounces signals through a [`ResizeCoalescer`], choosing the short
//! boundary delay when the latest width would change mode, and turns each
//! applied width into a [`ReconcileDecision`]: reposition in place, or
//! switch modes.

use std::time::Duration;

use hero_runtime::resize_coalescer::{
    CoalesceAction, CoalescerConfig, CoalescerStats, ResizeCoalescer, Urgency,
};

use crate::layout::{Breakpoints, LayoutMode};

/// What the engine should do with a settled width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileDecision {
    /// Same mode: recompute geometry and snap around the nearest card.
    Reposition { width: u32 },
    /// Different mode: tear down, fade out, rebuild.
    SwitchMode {
        from: LayoutMode,
        to: LayoutMode,
        width: u32,
    },
}

/// Classify a settled width against the active mode.
#[must_use]
pub fn classify(current: LayoutMode, width: u32, breakpoints: &Breakpoints) -> ReconcileDecision {
    let to = breakpoints.mode_for(width);
    if to == current {
        ReconcileDecision::Reposition { width }
    } else {
        ReconcileDecision::SwitchMode {
            from: current,
            to,
            width,
        }
    }
}

/// Debounced resize handling.
#[derive(Debug, Clone)]
pub struct ResizeReconciler {
    coalescer: ResizeCoalescer,
    breakpoints: Breakpoints,
}

impl ResizeReconciler {
    #[must_use]
    pub fn new(config: CoalescerConfig, breakpoints: Breakpoints, width: u32) -> Self {
        Self {
            coalescer: ResizeCoalescer::new(config, width),
            breakpoints,
        }
    }

    /// Feed a resize signal. `current` is the mode the engine is in, or is
    /// switching to.
    pub fn signal(&mut self, width: u32, current: LayoutMode, now: Duration) -> CoalesceAction {
        let urgency = if self.breakpoints.mode_for(width) == current {
            Urgency::Steady
        } else {
            Urgency::Boundary
        };
        self.coalescer.handle_resize_at(width, urgency, now)
    }

    /// Check whether a width has settled.
    pub fn poll(&mut self, current: LayoutMode, now: Duration) -> Option<ReconcileDecision> {
        match self.coalescer.tick_at(now) {
            CoalesceAction::ApplyResize { width, .. } => Some(classify(current, width, &self.breakpoints)),
            CoalesceAction::None | CoalesceAction::Coalescing => None,
        }
    }

    /// Absolute time at which `poll` will next produce a decision.
    #[must_use]
    pub fn next_deadline(&self, now: Duration) -> Option<Duration> {
        self.coalescer
            .time_until_apply(now)
            .map(|wait| now.saturating_add(wait))
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.coalescer.has_pending()
    }

    #[must_use]
    pub fn stats(&self) -> CoalescerStats {
        self.coalescer.stats()
    }

    #[must_use]
    pub fn decision_logs_jsonl(&self) -> String {
        self.coalescer.decision_logs_jsonl()
    }

    #[must_use]
    pub fn decision_checksum(&self) -> u64 {
        self.coalescer.decision_checksum()
    }
}
