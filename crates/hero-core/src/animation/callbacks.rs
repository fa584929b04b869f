#![forbid(unsafe_code)]

//! Milestone events for a wrapped animation.
//!
//! [`Callbacks`] wraps any [`Animation`] and queues [`AnimationEvent`]s as it
//! crosses milestones. The owner drains them after each tick instead of
//! registering closures, so completion handling stays on the owner's stack
//! with full `&mut` access to its state.
//!
//! ```ignore
//! let mut step = Callbacks::new(Tween::new(0.0, -493.0, STEP)).on_complete();
//! step.tick(dt);
//! for event in step.drain_events() {
//!     if event == AnimationEvent::Completed {
//!         // wrap correction, schedule the next step
//!     }
//! }
//! ```
//!
//! # Invariants
//!
//! 1. `Completed` fires at most once, on the tick that completes the inner
//!    animation.
//! 2. `drain_events()` clears the queue; events are never replayed.
//! 3. `reset()` re-arms the milestone.

use std::time::Duration;

use super::Animation;

/// An event emitted by a [`Callbacks`]-wrapped animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationEvent {
    /// The animation completed.
    Completed,
}

/// An animation wrapper that emits events at milestones.
pub struct Callbacks<A> {
    inner: A,
    on_complete: bool,
    completed_fired: bool,
    events: Vec<AnimationEvent>,
}

impl<A: std::fmt::Debug> std::fmt::Debug for Callbacks<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("inner", &self.inner)
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl<A: Animation> Callbacks<A> {
    /// Wrap an animation with milestone tracking.
    #[must_use]
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            on_complete: false,
            completed_fired: false,
            events: Vec::new(),
        }
    }

    /// Enable the `Completed` event.
    #[must_use]
    pub fn on_complete(mut self) -> Self {
        self.on_complete = true;
        self
    }

    /// Access the inner animation.
    #[must_use]
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        std::mem::take(&mut self.events)
    }

    fn check_events(&mut self) {
        if self.on_complete && !self.completed_fired && self.inner.is_complete() {
            self.completed_fired = true;
            self.events.push(AnimationEvent::Completed);
        }
    }
}

impl<A: Animation> Animation for Callbacks<A> {
    fn tick(&mut self, dt: Duration) {
        self.inner.tick(dt);
        self.check_events();
    }

    fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        self.inner.value()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.completed_fired = false;
        self.events.clear();
    }

    fn overshoot(&self) -> Duration {
        self.inner.overshoot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Fade, Tween};

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn completed_fires_once() {
        let mut anim = Callbacks::new(Fade::new(Duration::from_millis(200))).on_complete();
        anim.tick(MS_100);
        assert!(anim.drain_events().is_empty());
        anim.tick(MS_100);
        assert_eq!(anim.drain_events(), vec![AnimationEvent::Completed]);
        anim.tick(MS_100);
        assert!(anim.drain_events().is_empty());
    }

    #[test]
    fn silent_without_on_complete() {
        let mut anim = Callbacks::new(Fade::new(MS_100));
        anim.tick(Duration::from_secs(1));
        assert!(anim.is_complete());
        assert!(anim.drain_events().is_empty());
    }

    #[test]
    fn reset_rearms_completion() {
        let mut anim = Callbacks::new(Tween::new(0.0, 1.0, MS_100)).on_complete();
        anim.tick(MS_100);
        anim.reset();
        assert!(anim.drain_events().is_empty());
        anim.tick(MS_100);
        assert_eq!(anim.drain_events(), vec![AnimationEvent::Completed]);
    }
}
