#![forbid(unsafe_code)]

//! Animation sessions and the single-session slot.
//!
//! An [`AnimationSession`] owns everything that is live for one layout mode
//! activation: the step scheduler, the reveal fade, and the cached container
//! rectangle. [`SessionSlot`] holds at most one of them.
//!
//! # Invariants
//!
//! 1. At most one session is live. [`SessionSlot::install`] refuses a second
//!    one with [`SessionError::SessionAlreadyActive`].
//! 2. Teardown runs in a fixed order: clear `is_running`, detach every frame
//!    subscription, kill the tween, cancel the pending step timer. After it,
//!    the session owns no timer and no frame subscription.
//! 3. A torn-down session never steps again: fired timers are checked
//!    against `is_running` and the pending timer id.

use std::time::Duration;

use hero_core::animation::{Animation, AnimationEvent, Callbacks, Fade, ease_out};
use hero_core::geometry::Rect;
use hero_runtime::frame::{FrameSubId, FrameTicker};
use hero_runtime::rect_cache::RectCache;
use hero_runtime::timer::TimerQueue;

use crate::error::SessionError;
use crate::layout::{DimensionSet, LayoutMode};
use crate::stepper::{StepDue, StepScheduler};

/// Identifier of a session. Never reused within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Live state for one layout mode activation.
#[derive(Debug)]
pub struct AnimationSession {
    id: SessionId,
    dims: DimensionSet,
    anchor: usize,
    is_running: bool,
    paused: bool,
    rect: RectCache,
    stepper: StepScheduler,
    reveal: Option<Callbacks<Fade>>,
    reveal_sub: Option<FrameSubId>,
    started_at: Duration,
}

impl AnimationSession {
    /// Create a running session. It owns no timer or frame subscription yet.
    #[must_use]
    pub fn new(id: SessionId, dims: DimensionSet, anchor: usize, rect_ttl: Duration, now: Duration) -> Self {
        Self {
            id,
            dims,
            anchor,
            is_running: true,
            paused: false,
            rect: RectCache::new(rect_ttl),
            stepper: StepScheduler::new(),
            reveal: None,
            reveal_sub: None,
            started_at: now,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn mode(&self) -> LayoutMode {
        self.dims.mode
    }

    #[must_use]
    pub fn dims(&self) -> &DimensionSet {
        &self.dims
    }

    pub fn set_dims(&mut self, dims: DimensionSet) {
        self.dims = dims;
    }

    #[must_use]
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: usize) {
        self.anchor = anchor;
    }

    /// Perpetual-loop flag. Cleared by teardown, never set again.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Stepping stopped because the container was gone when a step landed.
    /// Cleared by the next [`arm_step`](Self::arm_step).
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// True only while a step tween is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.stepper.is_stepping()
    }

    #[must_use]
    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    #[must_use]
    pub fn stepper(&self) -> &StepScheduler {
        &self.stepper
    }

    pub fn stepper_mut(&mut self) -> &mut StepScheduler {
        &mut self.stepper
    }

    /// Container rectangle, reused while younger than the TTL.
    pub fn rect(&mut self, now: Duration, probe: impl FnOnce() -> Option<Rect>) -> Option<Rect> {
        self.rect.get(now, probe)
    }

    /// Fresh container rectangle, for discrete checkpoints.
    pub fn refresh_rect(&mut self, now: Duration, probe: impl FnOnce() -> Option<Rect>) -> Option<Rect> {
        self.rect.refresh(now, probe)
    }

    /// Last container reading, however old.
    #[must_use]
    pub fn cached_rect(&self) -> Option<Rect> {
        self.rect.cached()
    }

    pub fn invalidate_rect(&mut self) {
        self.rect.invalidate();
    }

    /// Start the first-layout opacity fade-in.
    pub fn begin_reveal(&mut self, duration: Duration, frames: &mut FrameTicker) {
        self.reveal = Some(Callbacks::new(Fade::new(duration).easing(ease_out)).on_complete());
        if self.reveal_sub.is_none() {
            self.reveal_sub = Some(frames.subscribe("reveal"));
        }
    }

    /// Whether the reveal fade is still playing.
    #[must_use]
    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// Opacity multiplier from the reveal: 1.0 once it has finished.
    #[must_use]
    pub fn reveal_factor(&self) -> f32 {
        self.reveal.as_ref().map_or(1.0, |r| r.value())
    }

    /// Advance the reveal. Returns `true` on the frame it finishes, after
    /// which the reveal's frame subscription is gone.
    pub fn advance_reveal(&mut self, dt: Duration, frames: &mut FrameTicker) -> bool {
        let Some(reveal) = self.reveal.as_mut() else {
            return false;
        };
        reveal.tick(dt);
        let finished = reveal
            .drain_events()
            .contains(&AnimationEvent::Completed);
        if finished {
            self.reveal = None;
            if let Some(sub) = self.reveal_sub.take() {
                frames.unsubscribe(sub);
            }
        }
        finished
    }

    /// Arm the next step at `deadline`.
    pub fn arm_step(&mut self, timers: &mut TimerQueue<StepDue>, deadline: Duration) {
        if !self.is_running {
            return;
        }
        self.paused = false;
        let id = self.stepper.arm(timers, deadline, self.id);
        tracing::debug!(
            session = self.id.0,
            timer = id.get(),
            deadline_ms = deadline.as_millis() as u64,
            "step armed"
        );
    }

    /// Tear the session down. Safe to call more than once.
    pub fn teardown(&mut self, timers: &mut TimerQueue<StepDue>, frames: &mut FrameTicker) {
        self.is_running = false;
        self.stepper.detach_frame(frames);
        if let Some(sub) = self.reveal_sub.take() {
            frames.unsubscribe(sub);
        }
        self.stepper.kill_tween();
        self.reveal = None;
        self.stepper.cancel_timer(timers);
    }
}

/// Holds the one live session.
#[derive(Debug, Default)]
pub struct SessionSlot {
    live: Option<AnimationSession>,
    installed: u64,
}

impl SessionSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session into an empty slot.
    pub fn install(&mut self, session: AnimationSession) -> Result<&mut AnimationSession, SessionError> {
        if let Some(live) = &self.live {
            return Err(SessionError::SessionAlreadyActive { live: live.id });
        }
        self.installed += 1;
        Ok(self.live.insert(session))
    }

    /// Remove the live session. The caller must tear it down.
    pub fn take(&mut self) -> Option<AnimationSession> {
        self.live.take()
    }

    #[must_use]
    pub fn get(&self) -> Option<&AnimationSession> {
        self.live.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut AnimationSession> {
        self.live.as_mut()
    }

    /// Whether `id` is the live session.
    #[must_use]
    pub fn is_live(&self, id: SessionId) -> bool {
        self.live.as_ref().is_some_and(|s| s.id == id)
    }

    /// 0 or 1.
    #[must_use]
    pub fn live_count(&self) -> usize {
        usize::from(self.live.is_some())
    }

    /// Sessions installed over the slot's lifetime.
    #[must_use]
    pub fn installed(&self) -> u64 {
        self.installed
    }
}
