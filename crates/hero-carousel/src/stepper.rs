#![forbid(unsafe_code)]

//! The perpetual step cycle.
//!
//! ```text
//! arm ──(settle/dwell timer)──▶ begin ──(frames)──▶ land ──▶ arm ...
//! ```
//!
//! Each step moves every card by exactly one `step` with a single shared
//! tween: cards never move independently, so ring spacing is preserved at
//! every frame. A frame subscription exists only between `begin` and
//! `land`.
//!
//! # Invariants
//!
//! 1. At most one step timer is pending per scheduler; arming again cancels
//!    the previous timer.
//! 2. A timer that is not the scheduler's current pending timer is stale
//!    and must be ignored.
//! 3. While stepping, each card's offset is `origin + tween.current()`; on
//!    landing it is exactly `origin + direction * step`.

use std::time::Duration;

use hero_core::animation::{Animation, Tween};
use hero_runtime::frame::{FrameSubId, FrameTicker};
use hero_runtime::timer::{TimerId, TimerQueue};

use crate::config::TimingConfig;
use crate::layout::DimensionSet;
use crate::ring::Ring;
use crate::session::SessionId;

/// Payload of a step timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDue {
    pub session: SessionId,
}

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepPhase {
    #[default]
    Idle,
    Stepping,
}

/// Result of advancing an in-flight step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepProgress {
    /// Nothing in flight.
    Idle,
    /// Still moving.
    Moving,
    /// The tween reached its target this frame.
    Landed,
}

/// Per-session step state machine.
#[derive(Debug, Clone, Default)]
pub struct StepScheduler {
    phase: StepPhase,
    tween: Option<Tween>,
    origins: Vec<f32>,
    pending: Option<TimerId>,
    frame_sub: Option<FrameSubId>,
    steps_started: u64,
    steps_completed: u64,
}

impl StepScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Whether a step tween is in flight.
    #[must_use]
    pub fn is_stepping(&self) -> bool {
        self.phase == StepPhase::Stepping
    }

    /// Pending step timer, if armed.
    #[must_use]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    #[must_use]
    pub fn steps_started(&self) -> u64 {
        self.steps_started
    }

    #[must_use]
    pub fn steps_completed(&self) -> u64 {
        self.steps_completed
    }

    /// Schedule the next step at `deadline`, replacing any pending one.
    pub fn arm(
        &mut self,
        timers: &mut TimerQueue<StepDue>,
        deadline: Duration,
        session: SessionId,
    ) -> TimerId {
        self.cancel_timer(timers);
        let id = timers.schedule(deadline, StepDue { session });
        self.pending = Some(id);
        id
    }

    /// Accept a fired timer. Returns `false` for a stale one.
    pub fn take_due(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Start moving every card by one step.
    pub fn begin(
        &mut self,
        ring: &Ring,
        dims: &DimensionSet,
        timing: &TimingConfig,
        frames: &mut FrameTicker,
    ) {
        let distance = timing.direction.sign() * dims.step;
        self.origins = ring.offsets();
        self.tween = Some(Tween::new(0.0, distance, timing.step_duration).easing(timing.step_easing));
        if self.frame_sub.is_none() {
            self.frame_sub = Some(frames.subscribe("step"));
        }
        self.phase = StepPhase::Stepping;
        self.steps_started += 1;
    }

    /// Advance the tween and write offsets.
    pub fn advance(&mut self, dt: Duration, ring: &mut Ring) -> StepProgress {
        let Some(tween) = self.tween.as_mut() else {
            return StepProgress::Idle;
        };
        tween.tick(dt);
        let moved = tween.current();
        for (card, origin) in ring.cards_mut().iter_mut().zip(&self.origins) {
            card.offset = origin + moved;
        }
        if tween.is_complete() {
            StepProgress::Landed
        } else {
            StepProgress::Moving
        }
    }

    /// Finish a landed step: drop the tween and the frame subscription.
    pub fn land(&mut self, frames: &mut FrameTicker) {
        self.detach_frame(frames);
        self.kill_tween();
        self.steps_completed += 1;
    }

    /// Drop the per-frame subscription.
    pub fn detach_frame(&mut self, frames: &mut FrameTicker) {
        if let Some(sub) = self.frame_sub.take() {
            frames.unsubscribe(sub);
        }
    }

    /// Stop the in-flight tween where it is.
    pub fn kill_tween(&mut self) {
        self.tween = None;
        self.origins.clear();
        self.phase = StepPhase::Idle;
    }

    /// Cancel the pending step timer.
    pub fn cancel_timer(&mut self, timers: &mut TimerQueue<StepDue>) {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
    }
}
