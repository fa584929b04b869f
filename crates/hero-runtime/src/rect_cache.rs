#![forbid(unsafe_code)]

//! Short-lived cache for container geometry reads.
//!
//! Reading a bounding rectangle forces the host to flush layout, which is
//! the most expensive thing a per-frame callback can do. [`RectCache`] keeps
//! the last reading for a short TTL. Continuous consumers accept a reading
//! that is up to one TTL old; discrete checkpoints (reveal, step completion,
//! resize settle) call [`RectCache::refresh`] to force a fresh one.
//!
//! A single-threaded host has exactly one writer, so there is no lock.

use std::time::Duration;

use hero_core::geometry::Rect;

/// Default time-to-live for cached rectangles.
pub const DEFAULT_RECT_TTL: Duration = Duration::from_millis(100);

/// TTL cache around a host geometry read.
#[derive(Debug, Clone)]
pub struct RectCache {
    rect: Option<Rect>,
    captured_at: Duration,
    ttl: Duration,
    measurements: u64,
}

impl Default for RectCache {
    fn default() -> Self {
        Self::new(DEFAULT_RECT_TTL)
    }
}

impl RectCache {
    /// Create an empty cache with the given TTL.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            rect: None,
            captured_at: Duration::ZERO,
            ttl,
            measurements: 0,
        }
    }

    /// Return the cached rectangle if it is younger than the TTL, otherwise
    /// measure through `probe`. A probe returning `None` (element detached)
    /// clears the cache.
    pub fn get(&mut self, now: Duration, probe: impl FnOnce() -> Option<Rect>) -> Option<Rect> {
        if self.is_fresh(now) {
            return self.rect;
        }
        self.refresh(now, probe)
    }

    /// Measure unconditionally and store the result.
    pub fn refresh(&mut self, now: Duration, probe: impl FnOnce() -> Option<Rect>) -> Option<Rect> {
        self.measurements += 1;
        self.rect = probe();
        self.captured_at = now;
        self.rect
    }

    /// Drop the cached reading so the next `get` measures.
    pub fn invalidate(&mut self) {
        self.rect = None;
    }

    /// Whether a cached reading exists and is younger than the TTL.
    #[must_use]
    pub fn is_fresh(&self, now: Duration) -> bool {
        self.rect.is_some() && now.saturating_sub(self.captured_at) < self.ttl
    }

    /// Last reading, regardless of age.
    #[must_use]
    pub fn cached(&self) -> Option<Rect> {
        self.rect
    }

    /// When the last reading was taken.
    #[must_use]
    pub fn captured_at(&self) -> Duration {
        self.captured_at
    }

    /// Number of probe reads performed so far.
    #[must_use]
    pub fn measurements(&self) -> u64 {
        self.measurements
    }
}
