#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Every tunable lives here with a `Default` that reproduces the shipped
//! hero and `with_*` builders for tests and hosts that need to adjust it.
//! [`CarouselConfig::validate`] is called once when the engine is built.

use std::time::Duration;

use hero_core::animation::{EasingFn, ease_in_out_cubic};
use hero_runtime::rect_cache::DEFAULT_RECT_TTL;
use hero_runtime::resize_coalescer::CoalescerConfig;

use crate::entrance::EntranceConfig;
use crate::error::ConfigError;
use crate::focus::ScaleRange;
use crate::layout::LayoutConfig;

/// Direction the ring travels on each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Toward the trailing edge (right, or down).
    Forward,
    /// Toward the leading edge (left, or up).
    #[default]
    Backward,
}

impl Direction {
    /// Sign applied to a step distance.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// Step cycle timing.
#[derive(Debug, Clone, Copy)]
pub struct TimingConfig {
    /// Wait before the first step of a session, and after a snap.
    pub settle_delay: Duration,
    /// Length of one step tween.
    pub step_duration: Duration,
    /// Pause between the end of one step and the start of the next.
    pub dwell: Duration,
    /// First-layout opacity fade-in.
    pub reveal_duration: Duration,
    /// Fade-out before a mode switch rebuilds the ring.
    pub fade_out_duration: Duration,
    pub step_easing: EasingFn,
    pub direction: Direction,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1200),
            step_duration: Duration::from_millis(1400),
            dwell: Duration::from_secs(5),
            reveal_duration: Duration::from_millis(600),
            fade_out_duration: Duration::from_millis(250),
            step_easing: ease_in_out_cubic,
            direction: Direction::Backward,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone)]
pub struct CarouselConfig {
    pub layout: LayoutConfig,
    pub timing: TimingConfig,
    pub focus: ScaleRange,
    pub coalescer: CoalescerConfig,
    pub entrance: EntranceConfig,
    /// How long a container measurement may be reused.
    pub rect_ttl: Duration,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            timing: TimingConfig::default(),
            focus: ScaleRange::default(),
            coalescer: CoalescerConfig::default(),
            entrance: EntranceConfig::default(),
            rect_ttl: DEFAULT_RECT_TTL,
        }
    }
}

impl CarouselConfig {
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn with_focus(mut self, focus: ScaleRange) -> Self {
        self.focus = focus;
        self
    }

    #[must_use]
    pub fn with_coalescer(mut self, coalescer: CoalescerConfig) -> Self {
        self.coalescer = coalescer;
        self
    }

    #[must_use]
    pub fn with_entrance(mut self, entrance: EntranceConfig) -> Self {
        self.entrance = entrance;
        self
    }

    #[must_use]
    pub fn with_rect_ttl(mut self, ttl: Duration) -> Self {
        self.rect_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.timing.direction = direction;
        self
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.focus.validate()?;
        if self.timing.step_duration.is_zero() {
            return Err(ConfigError::ZeroStepDuration);
        }
        Ok(())
    }
}
