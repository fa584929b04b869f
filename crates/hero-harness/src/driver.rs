#![forbid(unsafe_code)]

//! Deterministic host loop for the carousel engine.
//!
//! [`Driver`] plays the part of the page: it owns a virtual clock, delivers
//! animation frames at a fixed interval while the engine wants them, sleeps
//! to the engine's next wakeup otherwise, and reflows the container when the
//! viewport is resized. After every `advance` it checks the engine's
//! structural invariants and records any violation.
//!
//! Resize signals are delivered either right after a frame
//! ([`ResizeDelivery::OnFrame`]) or partway between two frames
//! ([`ResizeDelivery::BetweenFrames`]), the way a browser interleaves resize
//! events with animation frames.
//!
//! ```ignore
//! let mut driver = Driver::new(CarouselConfig::default(), hero_cards(), 1440)?;
//! driver.mount();
//! driver.run_for(Duration::from_secs(10));
//! driver.resize(700);
//! driver.run_for(Duration::from_secs(1));
//! assert!(driver.violations().is_empty());
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use hero_carousel::engine::{CarouselEngine, ContainerProbe, EngineEvent};
use hero_carousel::layout::LayoutMode;
use hero_carousel::{CardSpec, CarouselConfig, ConfigError};
use hero_core::geometry::Rect;

/// Default frame interval (60 Hz, rounded).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// When [`Driver::resize`] reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeDelivery {
    /// Immediately, at the timestamp of the last frame.
    #[default]
    OnFrame,
    /// Five eighths of a frame interval later, with no frame at that instant.
    BetweenFrames,
}

/// Container geometry shared between the driver and the engine's probe.
#[derive(Debug, Clone, Default)]
pub struct SharedContainer {
    rect: Rc<Cell<Option<Rect>>>,
}

impl SharedContainer {
    #[must_use]
    pub fn new(rect: Option<Rect>) -> Self {
        Self {
            rect: Rc::new(Cell::new(rect)),
        }
    }

    /// Container the page lays out for a viewport width.
    ///
    /// The hero sits below a header; narrow layouts stack vertically and get
    /// a taller container.
    #[must_use]
    pub fn for_viewport(width: u32, mode: LayoutMode) -> Rect {
        let height = match mode {
            LayoutMode::Narrow => 900.0,
            LayoutMode::Medium | LayoutMode::Wide => 560.0,
        };
        Rect::new(0.0, 120.0, width as f32, height)
    }

    pub fn set(&self, rect: Option<Rect>) {
        self.rect.set(rect);
    }

    pub fn detach(&self) {
        self.rect.set(None);
    }

    #[must_use]
    pub fn get(&self) -> Option<Rect> {
        self.rect.get()
    }
}

impl ContainerProbe for SharedContainer {
    fn container_rect(&self) -> Option<Rect> {
        self.rect.get()
    }
}

/// Fixed-interval host loop with invariant checking.
#[derive(Debug)]
pub struct Driver {
    engine: CarouselEngine<SharedContainer>,
    container: SharedContainer,
    now: Duration,
    frame_interval: Duration,
    delivery: ResizeDelivery,
    /// Resize signals not yet delivered, sorted by time.
    queued: Vec<(Duration, u32)>,
    viewport_width: u32,
    frames_delivered: u64,
    events: Vec<(Duration, EngineEvent)>,
    violations: Vec<String>,
}

impl Driver {
    /// Build a driver for a page `viewport_width` pixels wide. Nothing runs
    /// until [`mount`](Self::mount).
    pub fn new(config: CarouselConfig, cards: Vec<CardSpec>, viewport_width: u32) -> Result<Self, ConfigError> {
        let mode = config.layout.breakpoints.mode_for(viewport_width);
        let container = SharedContainer::new(Some(SharedContainer::for_viewport(viewport_width, mode)));
        let engine = CarouselEngine::new(config, cards, container.clone())?;
        Ok(Self {
            engine,
            container,
            now: Duration::ZERO,
            frame_interval: FRAME_INTERVAL,
            delivery: ResizeDelivery::OnFrame,
            queued: Vec::new(),
            viewport_width,
            frames_delivered: 0,
            events: Vec::new(),
            violations: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval.max(Duration::from_millis(1));
        self
    }

    #[must_use]
    pub fn with_resize_delivery(mut self, delivery: ResizeDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn mount(&mut self) {
        self.engine.mount(self.viewport_width, self.now);
        self.collect();
    }

    /// Resize the viewport: the container reflows and the engine hears about
    /// it through its resize handler, when the delivery mode says so.
    pub fn resize(&mut self, width: u32) {
        match self.delivery {
            ResizeDelivery::OnFrame => self.deliver_resize(width, self.now),
            ResizeDelivery::BetweenFrames => {
                let at = self.now + self.frame_interval * 5 / 8;
                self.resize_at(at, width);
            }
        }
    }

    /// Queue a resize signal for an absolute time. It is delivered during
    /// [`run_for`](Self::run_for), without a frame at that instant.
    pub fn resize_at(&mut self, at: Duration, width: u32) {
        let at = at.max(self.now);
        let idx = self.queued.partition_point(|(t, _)| *t <= at);
        self.queued.insert(idx, (at, width));
    }

    fn deliver_resize(&mut self, width: u32, at: Duration) {
        self.viewport_width = width;
        if self.container.get().is_some() {
            let mode = self.engine.config().layout.breakpoints.mode_for(width);
            self.container
                .set(Some(SharedContainer::for_viewport(width, mode)));
        }
        self.engine.handle_resize(width, at);
    }

    /// Advance virtual time by `duration`, delivering frames while the
    /// engine wants them.
    pub fn run_for(&mut self, duration: Duration) {
        let end = self.now.saturating_add(duration);
        while self.now < end {
            let next = if self.engine.wants_frames() {
                self.now + self.frame_interval
            } else {
                match self.engine.next_wakeup() {
                    Some(at) if at > self.now => at,
                    Some(_) => self.now + self.frame_interval,
                    None => end,
                }
            };
            let next = next.min(end);
            if let Some(&(at, width)) = self.queued.first() {
                if at <= next && at <= end {
                    self.queued.remove(0);
                    self.deliver_resize(width, at);
                    continue;
                }
            }
            if self.engine.wants_frames() {
                self.frames_delivered += 1;
            }
            self.now = next;
            self.engine.advance(next);
            self.collect();
        }
    }

    pub fn unmount(&mut self) {
        self.queued.clear();
        self.engine.unmount(self.now);
        self.collect();
        if self.engine.pending_step_timers() != 0 {
            self.violate("timers pending after unmount");
        }
        if self.engine.wants_frames() {
            self.violate("frame subscriptions live after unmount");
        }
        if self.engine.next_wakeup().is_some() {
            self.violate("wakeup requested after unmount");
        }
    }

    #[must_use]
    pub fn engine(&self) -> &CarouselEngine<SharedContainer> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CarouselEngine<SharedContainer> {
        &mut self.engine
    }

    #[must_use]
    pub fn container(&self) -> &SharedContainer {
        &self.container
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    #[must_use]
    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }

    /// Every engine event so far, stamped with the time it was drained.
    #[must_use]
    pub fn events(&self) -> &[(Duration, EngineEvent)] {
        &self.events
    }

    /// Count events matching `pred`.
    pub fn count_events(&self, mut pred: impl FnMut(&EngineEvent) -> bool) -> usize {
        self.events.iter().filter(|(_, e)| pred(e)).count()
    }

    #[must_use]
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// FNV-1a over the current card transforms, for replay comparison.
    #[must_use]
    pub fn transforms_checksum(&self) -> u64 {
        let mut hash = FNV_OFFSET_BASIS;
        for t in self.engine.transforms() {
            for bits in [
                t.translate.x.to_bits(),
                t.translate.y.to_bits(),
                t.scale.to_bits(),
                t.opacity.to_bits(),
            ] {
                fnv_hash_bytes(&mut hash, &bits.to_le_bytes());
            }
            fnv_hash_bytes(&mut hash, &t.z_index.to_le_bytes());
        }
        hash
    }

    fn collect(&mut self) {
        let now = self.now;
        self.events
            .extend(self.engine.drain_events().into_iter().map(|e| (now, e)));
        self.check_invariants();
    }

    fn violate(&mut self, what: &str) {
        let message = format!("t={}ms: {what}", self.now.as_millis());
        tracing::warn!(at_ms = self.now.as_millis() as u64, what, "invariant violated");
        self.violations.push(message);
    }

    fn check_invariants(&mut self) {
        let engine = &self.engine;
        let live = engine.live_sessions();
        let timers = engine.pending_step_timers();
        let subs = engine.frame_subscriptions();
        let stepping_sub = subs.iter().filter(|l| **l == "step").count();
        let session = engine.session();
        let transitioning = session.is_some_and(|s| s.is_transitioning());

        let mut found = Vec::new();
        if live > 1 {
            found.push(format!("{live} live sessions"));
        }
        if timers > 1 {
            found.push(format!("{timers} pending step timers"));
        }
        if stepping_sub > 1 || (stepping_sub == 1) != transitioning {
            found.push(format!(
                "step subscription mismatch: subs={stepping_sub} transitioning={transitioning}"
            ));
        }
        if let Some(s) = session {
            if s.is_running() && !transitioning && !s.is_paused() && timers != 1 {
                found.push(format!("idle session {} has {timers} step timers", s.id().get()));
            }
        } else if timers != 0 {
            found.push(format!("{timers} step timers with no session"));
        }
        if engine.is_switching() && live != 0 {
            found.push("session live during mode switch fade".to_string());
        }
        for what in found {
            self.violate(&what);
        }
    }
}

#[inline]
fn fnv_hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(FNV_PRIME);
    }
}
