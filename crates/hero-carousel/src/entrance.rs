#![forbid(unsafe_code)]

//! One-shot entrance choreography for the headline.
//!
//! After a start delay, a single forward-only timeline plays five stages:
//!
//! 1. `expand`: the inline word loop grows slightly (optional).
//! 2. `collapse_width`: the loop's width collapses to zero.
//! 3. `collapse_height`: the loop's height collapses, starting partway
//!    through stage 2 so the two overlap.
//! 4. `anticipate`: the headline skews briefly the "wrong" way.
//! 5. `settle`: skew and color snap to their final values with an
//!    overshooting ease, starting just before stage 4 ends.
//!
//! The only cancellation path is unmount.

use std::time::Duration;

use hero_core::animation::{
    Animation, AnimationEvent, Callbacks, Delayed, Fade, Timeline, ease_in_out, ease_out,
    ease_out_back,
};
use hero_core::geometry::lerp;
use hero_runtime::frame::{FrameSubId, FrameTicker};

use crate::layout::LayoutMode;

/// Entrance constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceConfig {
    pub enabled: bool,
    pub start_delay: Duration,
    /// Stage 1 length; `None` skips the expand.
    pub expand: Option<Duration>,
    /// Relative width gained by the expand.
    pub expand_gain: f32,
    pub collapse_width: Duration,
    pub collapse_height: Duration,
    /// Fraction of stage 2 after which stage 3 starts.
    pub height_overlap: f32,
    pub anticipate: Duration,
    pub anticipate_skew_deg: f32,
    pub settle: Duration,
    /// How long before stage 4 ends stage 5 starts.
    pub settle_lead: Duration,
    pub final_skew_deg: f32,
    /// Loop width as a fraction of the viewport, narrow layouts.
    pub narrow_width_fraction: f32,
    /// Loop width as a fraction of the viewport, medium and wide layouts.
    pub wide_width_fraction: f32,
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_delay: Duration::from_millis(800),
            expand: Some(Duration::from_millis(450)),
            expand_gain: 0.12,
            collapse_width: Duration::from_millis(700),
            collapse_height: Duration::from_millis(500),
            height_overlap: 0.5,
            anticipate: Duration::from_millis(180),
            anticipate_skew_deg: 4.0,
            settle: Duration::from_millis(600),
            settle_lead: Duration::from_millis(80),
            final_skew_deg: -8.0,
            narrow_width_fraction: 0.45,
            wide_width_fraction: 0.35,
        }
    }
}

impl EntranceConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_expand(mut self, expand: Option<Duration>) -> Self {
        self.expand = expand;
        self
    }

    /// Loop width before any stage runs.
    #[must_use]
    pub fn loop_width(&self, mode: LayoutMode, viewport_width: u32) -> f32 {
        let fraction = match mode {
            LayoutMode::Narrow => self.narrow_width_fraction,
            LayoutMode::Medium | LayoutMode::Wide => self.wide_width_fraction,
        };
        fraction * viewport_width as f32
    }

    /// Stage offsets from the end of the start delay, in stage order.
    #[must_use]
    pub fn stage_offsets(&self) -> [Duration; 5] {
        let expand_end = self.expand.unwrap_or(Duration::ZERO);
        let collapse_width = expand_end;
        let collapse_height =
            collapse_width + fraction_of(self.collapse_width, self.height_overlap);
        let collapse_end = (collapse_width + self.collapse_width).max(collapse_height + self.collapse_height);
        let anticipate = collapse_end;
        let settle = (anticipate + self.anticipate).saturating_sub(self.settle_lead).max(anticipate);
        [Duration::ZERO, collapse_width, collapse_height, anticipate, settle]
    }

    /// Start delay plus the whole timeline.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        let [_, _, _, anticipate, settle] = self.stage_offsets();
        self.start_delay + (settle + self.settle).max(anticipate + self.anticipate)
    }

    fn timeline(&self) -> Timeline {
        let [expand, collapse_width, collapse_height, anticipate, settle] = self.stage_offsets();
        let mut tl = Timeline::new();
        if let Some(duration) = self.expand {
            tl = tl.add("expand", expand, Fade::new(duration).easing(ease_out));
        }
        tl.add(
            "collapse_width",
            collapse_width,
            Fade::new(self.collapse_width).easing(ease_in_out),
        )
        .add(
            "collapse_height",
            collapse_height,
            Fade::new(self.collapse_height).easing(ease_in_out),
        )
        .add("anticipate", anticipate, Fade::new(self.anticipate).easing(ease_out))
        .add("settle", settle, Fade::new(self.settle).easing(ease_out_back))
    }
}

fn fraction_of(d: Duration, fraction: f32) -> Duration {
    let nanos = d.as_nanos() as f64 * f64::from(fraction.clamp(0.0, 1.0));
    Duration::from_nanos(nanos.round() as u64)
}

/// Entrance output for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceFrame {
    /// Inline loop width in pixels.
    pub loop_width: f32,
    /// Inline loop height as a fraction of the line height.
    pub loop_height: f32,
    /// Headline skew in degrees.
    pub skew_deg: f32,
    /// 0.0 = initial headline color, 1.0 = final color.
    pub color_mix: f32,
}

/// Plays the entrance once.
#[derive(Debug)]
pub struct EntranceChoreographer {
    config: EntranceConfig,
    base_width: f32,
    play: Callbacks<Delayed<Timeline>>,
    frame_sub: Option<FrameSubId>,
    finished: bool,
}

impl EntranceChoreographer {
    /// Build the entrance for the mode active at mount. `None` when disabled.
    #[must_use]
    pub fn new(config: EntranceConfig, mode: LayoutMode, viewport_width: u32) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let play = Callbacks::new(Delayed::new(config.start_delay, config.timeline())).on_complete();
        Some(Self {
            base_width: config.loop_width(mode, viewport_width),
            config,
            play,
            frame_sub: None,
            finished: false,
        })
    }

    /// Attach to the frame ticker.
    pub fn start(&mut self, frames: &mut FrameTicker) {
        if self.frame_sub.is_none() && !self.finished {
            self.frame_sub = Some(frames.subscribe("entrance"));
        }
    }

    /// Advance by `dt`. Returns `true` on the frame the entrance finishes.
    pub fn advance(&mut self, dt: Duration, frames: &mut FrameTicker) -> bool {
        if self.finished {
            return false;
        }
        self.play.tick(dt);
        if self.play.drain_events().contains(&AnimationEvent::Completed) {
            self.finished = true;
            self.detach(frames);
            return true;
        }
        false
    }

    /// Stop and release the frame subscription.
    pub fn cancel(&mut self, frames: &mut FrameTicker) {
        self.detach(frames);
        self.finished = true;
    }

    fn detach(&mut self, frames: &mut FrameTicker) {
        if let Some(sub) = self.frame_sub.take() {
            frames.unsubscribe(sub);
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn config(&self) -> &EntranceConfig {
        &self.config
    }

    /// Current output values.
    #[must_use]
    pub fn frame(&self) -> EntranceFrame {
        let tl = self.play.inner().inner();
        let stage = |label| tl.value_of(label).unwrap_or(0.0);

        let expanded = self.base_width * (1.0 + self.config.expand_gain * stage("expand"));
        let settle = stage("settle");
        let anticipation = self.config.anticipate_skew_deg * stage("anticipate");
        EntranceFrame {
            loop_width: lerp(expanded, 0.0, stage("collapse_width")).max(0.0),
            loop_height: lerp(1.0, 0.0, stage("collapse_height")).clamp(0.0, 1.0),
            skew_deg: lerp(anticipation, self.config.final_skew_deg, settle),
            color_mix: settle.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn play(mode: LayoutMode, width: u32) -> (EntranceChoreographer, FrameTicker) {
        let mut frames = FrameTicker::new();
        let mut e = EntranceChoreographer::new(EntranceConfig::default(), mode, width)
            .expect("enabled by default");
        e.start(&mut frames);
        (e, frames)
    }

    #[test]
    fn stage_offsets_overlap_as_designed() {
        let c = EntranceConfig::default();
        let [expand, width, height, anticipate, settle] = c.stage_offsets();
        assert_eq!(expand, ms(0));
        assert_eq!(width, ms(450));
        // Height starts halfway through the width collapse.
        assert_eq!(height, ms(800));
        assert_eq!(anticipate, ms(1300));
        // Settle starts 80ms before anticipation ends.
        assert_eq!(settle, ms(1400));
        assert_eq!(c.total_duration(), ms(800 + 2000));
    }

    #[test]
    fn nothing_moves_during_start_delay() {
        let (mut e, mut frames) = play(LayoutMode::Wide, 1440);
        e.advance(ms(799), &mut frames);
        let f = e.frame();
        assert!((f.loop_width - 504.0).abs() < 1e-3);
        assert_eq!(f.loop_height, 1.0);
        assert_eq!(f.skew_deg, 0.0);
        assert_eq!(f.color_mix, 0.0);
    }

    #[test]
    fn narrow_loop_is_wider_share_of_viewport() {
        let (e, _) = play(LayoutMode::Narrow, 400);
        assert!((e.frame().loop_width - 180.0).abs() < 1e-3);
    }

    #[test]
    fn expand_then_collapse() {
        let (mut e, mut frames) = play(LayoutMode::Wide, 1000);
        e.advance(ms(800 + 450), &mut frames);
        assert!((e.frame().loop_width - 350.0 * 1.12).abs() < 1e-2);
        e.advance(ms(700), &mut frames);
        let f = e.frame();
        assert_eq!(f.loop_width, 0.0);
        assert!(f.loop_height > 0.0 && f.loop_height < 1.0);
    }

    #[test]
    fn finishes_once_with_final_values() {
        let (mut e, mut frames) = play(LayoutMode::Medium, 900);
        let mut finished = 0;
        for _ in 0..300 {
            if e.advance(ms(16), &mut frames) {
                finished += 1;
            }
        }
        assert_eq!(finished, 1);
        assert!(e.is_finished());
        assert!(!frames.wants_frames());
        let f = e.frame();
        assert_eq!(f.loop_width, 0.0);
        assert_eq!(f.loop_height, 0.0);
        assert_eq!(f.skew_deg, -8.0);
        assert_eq!(f.color_mix, 1.0);
    }

    #[test]
    fn settle_overshoots_final_skew() {
        let (mut e, mut frames) = play(LayoutMode::Wide, 1440);
        let mut min_skew = f32::MAX;
        for _ in 0..200 {
            e.advance(ms(16), &mut frames);
            min_skew = min_skew.min(e.frame().skew_deg);
        }
        assert!(min_skew < -8.0, "ease_out_back overshoots: {min_skew}");
    }

    #[test]
    fn disabled_builds_nothing() {
        assert!(EntranceChoreographer::new(EntranceConfig::disabled(), LayoutMode::Wide, 1440).is_none());
    }

    #[test]
    fn without_expand_collapse_starts_immediately() {
        let c = EntranceConfig::default().with_expand(None);
        let [_, width, height, ..] = c.stage_offsets();
        assert_eq!(width, ms(0));
        assert_eq!(height, ms(350));
    }
}
