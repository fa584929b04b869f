#![forbid(unsafe_code)]

//! Timeline: labelled tracks placed at absolute offsets.
//!
//! A [`Timeline`] owns several animations, each starting at its own offset
//! from the timeline start. Tracks may overlap; a later track can start
//! before an earlier one finishes. The timeline plays forward once and never
//! loops.
//!
//! ```ignore
//! let tl = Timeline::new()
//!     .add("collapse_width", Duration::ZERO, Fade::new(Duration::from_millis(800)))
//!     .add("collapse_height", Duration::from_millis(400), Fade::new(Duration::from_millis(600)));
//! ```
//!
//! # Invariants
//!
//! 1. A track receives no time before its offset, and exactly the time past
//!    its offset afterwards (large `dt` values are split at the offset).
//! 2. `value_of(label)` is 0.0 before the track starts.
//! 3. The timeline is complete once every track is complete. An empty
//!    timeline is complete immediately.
//! 4. Labels are unique; adding a duplicate label replaces the older track.

use std::time::Duration;

use super::Animation;

struct Track {
    label: &'static str,
    offset: Duration,
    animation: Box<dyn Animation>,
}

impl std::fmt::Debug for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("label", &self.label)
            .field("offset", &self.offset)
            .field("value", &self.animation.value())
            .finish()
    }
}

/// A forward-only, labelled multi-track timeline.
#[derive(Debug, Default)]
pub struct Timeline {
    tracks: Vec<Track>,
    elapsed: Duration,
}

impl Timeline {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a labelled track at `offset` (builder).
    #[must_use]
    pub fn add(
        mut self,
        label: &'static str,
        offset: Duration,
        animation: impl Animation + 'static,
    ) -> Self {
        self.insert(label, offset, Box::new(animation));
        self
    }

    /// Insert a labelled track, replacing any track with the same label.
    pub fn insert(&mut self, label: &'static str, offset: Duration, animation: Box<dyn Animation>) {
        self.tracks.retain(|t| t.label != label);
        let idx = self.tracks.partition_point(|t| t.offset <= offset);
        self.tracks.insert(
            idx,
            Track {
                label,
                offset,
                animation,
            },
        );
    }

    /// Number of tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the timeline has no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Eased progress of a track, 0.0 before it starts. `None` for an unknown
    /// label.
    #[must_use]
    pub fn value_of(&self, label: &str) -> Option<f32> {
        self.track(label).map(|t| {
            if self.elapsed > t.offset || t.animation.is_complete() {
                t.animation.value()
            } else {
                0.0
            }
        })
    }

    fn track(&self, label: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.label == label)
    }
}

impl Animation for Timeline {
    fn tick(&mut self, dt: Duration) {
        let before = self.elapsed;
        let after = before.saturating_add(dt);
        for track in &mut self.tracks {
            if after <= track.offset || track.animation.is_complete() {
                continue;
            }
            let share = after - before.max(track.offset);
            track.animation.tick(share);
        }
        self.elapsed = after;
    }

    fn is_complete(&self) -> bool {
        self.tracks.iter().all(|t| t.animation.is_complete())
    }

    /// Mean progress across tracks.
    fn value(&self) -> f32 {
        if self.tracks.is_empty() {
            return 1.0;
        }
        let sum: f32 = self
            .tracks
            .iter()
            .map(|t| self.value_of(t.label).unwrap_or(0.0))
            .sum();
        sum / self.tracks.len() as f32
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        for track in &mut self.tracks {
            track.animation.reset();
        }
    }
}
