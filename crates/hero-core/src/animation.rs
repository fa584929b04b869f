#![forbid(unsafe_code)]

//! Composable animation primitives.
//!
//! Time-based animations that produce eased progress values. Nothing here
//! reads a clock: the owner advances every animation with an explicit `dt`,
//! so a host-driven frame loop and a unit test drive them the same way.
//!
//! # Progress range
//!
//! Linear and polynomial easings stay inside [0.0, 1.0]. Overshoot easings
//! such as [`ease_out_back`] deliberately exceed 1.0 near the end; consumers
//! that map progress onto a value range with [`lerp`](crate::geometry::lerp)
//! get the overshoot for free.

pub mod callbacks;
pub mod timeline;

pub use callbacks::{AnimationEvent, Callbacks};
pub use timeline::Timeline;

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to eased progress.
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-in-out. Used for ring steps: a soft departure and a soft
/// landing so the focused card settles visibly.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Back ease-out: overshoots past 1.0 before settling on it.
///
/// Peaks at roughly 1.1 with the conventional 1.70158 tension.
#[inline]
pub fn ease_out_back(t: f32) -> f32 {
    const C1: f32 = 1.701_58;
    const C3: f32 = C1 + 1.0;
    let t = t.clamp(0.0, 1.0) - 1.0;
    1.0 + C3 * t * t * t + C1 * t * t
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing eased progress.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current eased progress. 0.0 at the start, 1.0 at the end; overshoot
    /// easings may exceed 1.0 in between.
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);

    /// Time elapsed past completion. Composition types forward it so that a
    /// large `dt` does not lose time at a boundary.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

impl Animation for Box<dyn Animation> {
    fn tick(&mut self, dt: Duration) {
        (**self).tick(dt);
    }

    fn is_complete(&self) -> bool {
        (**self).is_complete()
    }

    fn value(&self) -> f32 {
        (**self).value()
    }

    fn reset(&mut self) {
        (**self).reset();
    }

    fn overshoot(&self) -> Duration {
        (**self).overshoot()
    }
}

fn non_zero(duration: Duration) -> Duration {
    if duration.is_zero() {
        Duration::from_nanos(1)
    } else {
        duration
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, with configurable easing.
///
/// Elapsed time is tracked as a [`Duration`] so long-running accumulation
/// does not drift.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: non_zero(duration),
            easing: linear,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    fn linear_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        if self.is_complete() {
            return 1.0;
        }
        (self.easing)(self.linear_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Interpolates an `f32` between `from` and `to` over a duration.
///
/// [`Animation::value`] returns eased progress; [`Tween::current`] returns the
/// interpolated value. On completion `current()` is exactly `to`, never an
/// accumulated approximation of it.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f32,
    to: f32,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Create a tween from `from` to `to` over `duration` (ease-out by default).
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: non_zero(duration),
            easing: ease_out,
        }
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Current interpolated value.
    pub fn current(&self) -> f32 {
        if self.is_complete() {
            return self.to;
        }
        let t = (self.easing)(self.progress());
        self.from + (self.to - self.from) * t
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        if self.is_complete() {
            return 1.0;
        }
        (self.easing)(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

// ---------------------------------------------------------------------------
// Delayed
// ---------------------------------------------------------------------------

/// Wait for a delay, then play the inner animation.
#[derive(Debug, Clone, Copy)]
pub struct Delayed<A> {
    delay: Duration,
    elapsed: Duration,
    inner: A,
    started: bool,
}

impl<A: Animation> Delayed<A> {
    /// Create a delayed animation that waits `delay` before starting `inner`.
    pub fn new(delay: Duration, inner: A) -> Self {
        Self {
            delay,
            elapsed: Duration::ZERO,
            inner,
            started: false,
        }
    }

    /// Access the inner animation.
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Animation> Animation for Delayed<A> {
    fn tick(&mut self, dt: Duration) {
        if self.started {
            self.inner.tick(dt);
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.delay {
            self.started = true;
            let carry = self.elapsed.saturating_sub(self.delay);
            if !carry.is_zero() {
                self.inner.tick(carry);
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.started && self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        if self.started {
            self.inner.value()
        } else {
            0.0
        }
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.started = false;
        self.inner.reset();
    }

    fn overshoot(&self) -> Duration {
        if self.started {
            self.inner.overshoot()
        } else {
            Duration::ZERO
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_700: Duration = Duration::from_millis(700);
    const SEC_1: Duration = Duration::from_secs(1);
    const STEP: Duration = Duration::from_millis(1400);

    #[test]
    fn easing_endpoints() {
        for easing in [
            linear,
            ease_in,
            ease_out,
            ease_in_out,
            ease_in_out_cubic,
            ease_out_back,
        ] {
            assert!(easing(0.0).abs() < 1e-6);
            assert!((easing(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn ease_in_out_cubic_is_symmetric() {
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        let a = ease_in_out_cubic(0.25);
        let b = ease_in_out_cubic(0.75);
        assert!((a + b - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ease_out_back_overshoots() {
        let peak = (0..=100)
            .map(|i| ease_out_back(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.05, "peak was {peak}");
    }

    #[test]
    fn fade_completes_exactly_at_one() {
        let mut fade = Fade::new(SEC_1);
        for _ in 0..62 {
            fade.tick(MS_16);
        }
        assert!(!fade.is_complete());
        fade.tick(MS_16);
        assert!(fade.is_complete());
        assert_eq!(fade.value(), 1.0);
    }

    #[test]
    fn fade_zero_duration_does_not_divide_by_zero() {
        let mut fade = Fade::new(Duration::ZERO);
        fade.tick(MS_16);
        assert!(fade.is_complete());
    }

    #[test]
    fn tween_lands_exactly_on_target() {
        let mut tween = Tween::new(120.0, 120.0 - 493.0, STEP).easing(ease_in_out_cubic);
        let mut t = Duration::ZERO;
        while t < STEP {
            tween.tick(MS_16);
            t += MS_16;
        }
        assert!(tween.is_complete());
        assert_eq!(tween.current(), 120.0 - 493.0);
    }

    #[test]
    fn tween_midpoint_with_symmetric_easing() {
        let mut tween = Tween::new(0.0, -100.0, STEP).easing(ease_in_out_cubic);
        tween.tick(MS_700);
        assert!((tween.current() + 50.0).abs() < 0.01);
    }

    #[test]
    fn tween_reset_returns_to_from() {
        let mut tween = Tween::new(10.0, 90.0, SEC_1);
        tween.tick(SEC_1);
        tween.reset();
        assert_eq!(tween.current(), 10.0);
    }

    #[test]
    fn delayed_waits_then_forwards_carry() {
        let mut d = Delayed::new(MS_100, Fade::new(SEC_1));
        d.tick(Duration::from_millis(50));
        assert_eq!(d.value(), 0.0);
        d.tick(Duration::from_millis(150));
        assert!((d.value() - 0.1).abs() < 0.01);
    }

    #[test]
    fn delayed_reset() {
        let mut d = Delayed::new(MS_100, Fade::new(MS_100));
        d.tick(Duration::from_millis(250));
        assert!(d.is_complete());
        assert_eq!(d.overshoot(), Duration::from_millis(50));
        d.reset();
        assert!(!d.is_complete());
        assert_eq!(d.overshoot(), Duration::ZERO);
    }

    #[test]
    fn boxed_animation_delegates() {
        let mut boxed: Box<dyn Animation> = Box::new(Fade::new(MS_100));
        boxed.tick(MS_100);
        assert!(boxed.is_complete());
        boxed.reset();
        assert!(!boxed.is_complete());
    }
}
