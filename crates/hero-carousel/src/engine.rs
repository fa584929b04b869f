#![forbid(unsafe_code)]

//! Host-facing carousel engine.
//!
//! [`CarouselEngine`] is driven entirely by its host. The host reports time
//! and viewport changes, and reads back per-card transforms:
//!
//! ```ignore
//! let mut engine = CarouselEngine::new(CarouselConfig::default(), hero_cards(), probe)?;
//! engine.mount(viewport_width, now);
//! loop {
//!     engine.advance(now);             // every animation frame, or at next_wakeup()
//!     render(engine.transforms());
//!     if !engine.wants_frames() {
//!         sleep_until(engine.next_wakeup());
//!     }
//! }
//! ```
//!
//! `advance` runs, in order: per-frame work (only while a frame subscription
//! is live), due step timers in deadline order, then the resize reconciler.
//!
//! # Invariants
//!
//! 1. At most one session is live, and at most one step timer is pending.
//! 2. Steps of a torn-down session never run.
//! 3. After `unmount`, no timer and no frame subscription remains.
//! 4. Missing container geometry never panics; the carousel just stops
//!    moving until geometry is available again.

use std::time::Duration;

use hero_core::animation::{Animation, Fade, ease_in};
use hero_core::geometry::{Point, Rect};
use hero_runtime::clock::HostClock;
use hero_runtime::frame::{FrameSubId, FrameTicker};
use hero_runtime::timer::{TimerId, TimerQueue};

use crate::config::CarouselConfig;
use crate::entrance::{EntranceChoreographer, EntranceFrame};
use crate::error::{ConfigError, SessionError};
use crate::focus::FocusScaler;
use crate::layout::{DimensionSet, LayoutMode, resolve};
use crate::reconcile::{ReconcileDecision, ResizeReconciler};
use crate::ring::{CardSpec, Ring, place};
use crate::session::{AnimationSession, SessionId, SessionSlot};
use crate::stepper::{StepDue, StepProgress};
use crate::wrap::{self, WrapBounds};

/// Reads the container element's bounding rectangle.
pub trait ContainerProbe {
    /// `None` while the element is not attached.
    fn container_rect(&self) -> Option<Rect>;
}

impl<F> ContainerProbe for F
where
    F: Fn() -> Option<Rect>,
{
    fn container_rect(&self) -> Option<Rect> {
        self()
    }
}

/// Lifecycle notifications, drained by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    SessionStarted { session: SessionId, mode: LayoutMode },
    SessionTornDown { session: SessionId },
    StepStarted { session: SessionId },
    StepCompleted { session: SessionId, wrapped: usize },
    Repositioned { anchor: usize },
    ModeSwitchStarted { from: LayoutMode, to: LayoutMode },
    RevealFinished,
    EntranceFinished,
}

/// Render output for one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub index: usize,
    /// Offset along the primary axis, centered on the cross axis. Cards are
    /// square, so the cross-axis centering uses `card_size` too.
    pub translate: Point,
    pub scale: f32,
    pub opacity: f32,
    pub z_index: i32,
}

/// Geometry the last placement used; kept for rendering through switches.
#[derive(Debug, Clone, Copy)]
struct Stage {
    dims: DimensionSet,
    rect: Rect,
}

#[derive(Debug)]
struct ModeSwitch {
    from: LayoutMode,
    to: LayoutMode,
    fade: Fade,
    start_opacity: Vec<f32>,
    frame_sub: FrameSubId,
}

/// The responsive infinite-carousel engine.
#[derive(Debug)]
pub struct CarouselEngine<P> {
    config: CarouselConfig,
    probe: P,
    ring: Ring,
    clock: HostClock,
    timers: TimerQueue<StepDue>,
    frames: FrameTicker,
    slot: SessionSlot,
    scaler: FocusScaler,
    reconciler: Option<ResizeReconciler>,
    switch: Option<ModeSwitch>,
    entrance: Option<EntranceChoreographer>,
    stage: Option<Stage>,
    viewport_width: u32,
    anchor_hint: usize,
    next_session: u64,
    mounted: bool,
    events: Vec<EngineEvent>,
}

impl<P: ContainerProbe> CarouselEngine<P> {
    /// Validate `config` and build an unmounted engine.
    pub fn new(config: CarouselConfig, cards: Vec<CardSpec>, probe: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scaler: FocusScaler::new(config.focus),
            config,
            probe,
            ring: Ring::new(cards),
            clock: HostClock::new(),
            timers: TimerQueue::new(),
            frames: FrameTicker::new(),
            slot: SessionSlot::new(),
            reconciler: None,
            switch: None,
            entrance: None,
            stage: None,
            viewport_width: 0,
            anchor_hint: 0,
            next_session: 1,
            mounted: false,
            events: Vec::new(),
        })
    }

    // ── Host entry points ─────────────────────────────────────────────

    /// Create the first session (with reveal) and start the entrance.
    ///
    /// A container that is not attached yet leaves the engine mounted but
    /// idle; the first applied resize with geometry builds the session.
    pub fn mount(&mut self, viewport_width: u32, now: Duration) {
        if self.mounted {
            tracing::debug!("mount ignored; already mounted");
            return;
        }
        self.clock.set(now);
        self.mounted = true;
        self.viewport_width = viewport_width;
        self.reconciler = Some(ResizeReconciler::new(
            self.config.coalescer.clone(),
            self.config.layout.breakpoints,
            viewport_width,
        ));
        tracing::info!(width = viewport_width, cards = self.ring.len(), "carousel mounted");

        self.try_start_session(self.anchor_hint);

        let mode = self.config.layout.breakpoints.mode_for(viewport_width);
        if let Some(mut entrance) = EntranceChoreographer::new(self.config.entrance, mode, viewport_width) {
            entrance.start(&mut self.frames);
            self.entrance = Some(entrance);
        }
    }

    /// Feed a viewport resize notification.
    ///
    /// The signal is timestamped for the debounce window only; animation
    /// time moves exclusively in [`advance`](Self::advance), so a signal
    /// arriving between two frames costs the running tweens nothing.
    ///
    /// This is also the only way to resume stepping after the container was
    /// missing when a step landed: the next applied resize with an attached
    /// container re-arms the cycle.
    pub fn handle_resize(&mut self, width: u32, now: Duration) {
        if !self.mounted {
            return;
        }
        let now = now.max(self.clock.now());
        let current = self.target_mode();
        if let Some(reconciler) = self.reconciler.as_mut() {
            reconciler.signal(width, current, now);
        }
    }

    /// Run frame work, due timers and resize reconciliation up to `now`.
    pub fn advance(&mut self, now: Duration) {
        if !self.mounted {
            return;
        }
        let dt = self.clock.set(now);
        let now = self.clock.now();

        if self.frames.begin_frame() {
            self.on_frame(dt, now);
        }
        for (id, due) in self.timers.pop_due(now) {
            self.on_step_due(id, due, now);
        }
        self.poll_resize(now);
    }

    /// Tear everything down. Afterwards no timer or frame subscription is
    /// registered.
    pub fn unmount(&mut self, now: Duration) {
        if !self.mounted {
            return;
        }
        let now = now.max(self.clock.now());
        self.teardown_session();
        if let Some(switch) = self.switch.take() {
            self.frames.unsubscribe(switch.frame_sub);
        }
        if let Some(mut entrance) = self.entrance.take() {
            entrance.cancel(&mut self.frames);
        }
        self.reconciler = None;
        self.stage = None;
        self.mounted = false;
        tracing::info!(
            at_ms = now.as_millis() as u64,
            timers = self.timers.len(),
            frame_subscriptions = self.frames.active_count(),
            "carousel unmounted"
        );
    }

    // ── Host queries ──────────────────────────────────────────────────

    /// When the engine next needs `advance` if no frames are wanted.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<Duration> {
        let timer = self.timers.next_deadline();
        let resize = self
            .reconciler
            .as_ref()
            .and_then(|r| r.next_deadline(self.clock.now()));
        match (timer, resize) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether the host should keep delivering animation frames.
    #[must_use]
    pub fn wants_frames(&self) -> bool {
        self.frames.wants_frames()
    }

    /// Per-card render output, in card order.
    ///
    /// Cards are centered across the axis as squares of `card_size`.
    #[must_use]
    pub fn transforms(&self) -> Vec<CardTransform> {
        let Some(stage) = self.stage else {
            return Vec::new();
        };
        let axis = stage.dims.axis;
        let cross = (stage.rect.extent_along(axis.cross()) - stage.dims.card_size) / 2.0;
        self.ring
            .cards()
            .iter()
            .map(|card| CardTransform {
                index: card.index,
                translate: Point::from_axes(axis, card.offset, cross),
                scale: card.scale,
                opacity: card.opacity,
                z_index: card.z_index,
            })
            .collect()
    }

    /// Entrance output, while the entrance exists.
    #[must_use]
    pub fn entrance_frame(&self) -> Option<EntranceFrame> {
        self.entrance.as_ref().map(EntranceChoreographer::frame)
    }

    /// Take queued lifecycle events.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Mode of the live session.
    #[must_use]
    pub fn mode(&self) -> Option<LayoutMode> {
        self.slot.get().map(AnimationSession::mode)
    }

    #[must_use]
    pub fn session(&self) -> Option<&AnimationSession> {
        self.slot.get()
    }

    /// 0 or 1.
    #[must_use]
    pub fn live_sessions(&self) -> usize {
        self.slot.live_count()
    }

    /// Sessions created since construction.
    #[must_use]
    pub fn sessions_created(&self) -> u64 {
        self.slot.installed()
    }

    /// Pending step timers across the engine.
    #[must_use]
    pub fn pending_step_timers(&self) -> usize {
        self.timers.len()
    }

    /// Labels of live frame subscriptions.
    #[must_use]
    pub fn frame_subscriptions(&self) -> Vec<&'static str> {
        self.frames.labels().collect()
    }

    /// Whether a mode switch fade-out is in progress.
    #[must_use]
    pub fn is_switching(&self) -> bool {
        self.switch.is_some()
    }

    #[must_use]
    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    #[must_use]
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    #[must_use]
    pub fn reconciler(&self) -> Option<&ResizeReconciler> {
        self.reconciler.as_ref()
    }

    #[must_use]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }

    // ── Sessions ──────────────────────────────────────────────────────

    fn target_mode(&self) -> LayoutMode {
        if let Some(switch) = &self.switch {
            switch.to
        } else if let Some(session) = self.slot.get() {
            session.mode()
        } else {
            self.config.layout.breakpoints.mode_for(self.viewport_width)
        }
    }

    fn try_start_session(&mut self, anchor: usize) {
        if let Err(err) = self.start_session(anchor) {
            tracing::debug!(%err, width = self.viewport_width, "session build skipped");
        }
    }

    /// Build, place and install a session for the current width, with a
    /// reveal fade-in and the first step armed after the settle delay.
    fn start_session(&mut self, anchor: usize) -> Result<SessionId, SessionError> {
        if self.ring.is_empty() {
            return Err(SessionError::NoCards);
        }
        let (mode, dims) = resolve(self.viewport_width, &self.config.layout, self.ring.len());
        if !(dims.max_falloff > 0.0) {
            return Err(SessionError::NonPositiveFalloff);
        }
        let rect = self
            .probe
            .container_rect()
            .ok_or(SessionError::ContainerDetached)?;
        let now = self.clock.now();
        let anchor = anchor.min(self.ring.len() - 1);
        let id = SessionId::new(self.next_session);

        let mut session = AnimationSession::new(id, dims, anchor, self.config.rect_ttl, now);
        session.refresh_rect(now, || Some(rect));
        let session = self.slot.install(session)?;
        self.next_session += 1;

        place(&mut self.ring, &dims, anchor);
        wrap::correct(
            self.ring.cards_mut(),
            &WrapBounds::new(&dims, rect.extent_along(dims.axis)),
        );
        session.begin_reveal(self.config.timing.reveal_duration, &mut self.frames);
        self.scaler
            .update(self.ring.cards_mut(), rect, &dims, session.reveal_factor());
        session.arm_step(&mut self.timers, now + self.config.timing.settle_delay);

        self.stage = Some(Stage { dims, rect });
        self.anchor_hint = anchor;
        self.events.push(EngineEvent::SessionStarted { session: id, mode });
        tracing::info!(
            session = id.get(),
            mode = mode.as_str(),
            axis = dims.axis.as_str(),
            anchor,
            step = dims.step,
            "session started"
        );
        Ok(id)
    }

    fn teardown_session(&mut self) {
        let Some(mut session) = self.slot.take() else {
            return;
        };
        session.teardown(&mut self.timers, &mut self.frames);
        self.anchor_hint = session.anchor();
        self.events
            .push(EngineEvent::SessionTornDown { session: session.id() });
        tracing::info!(
            session = session.id().get(),
            mode = session.mode().as_str(),
            steps = session.stepper().steps_completed(),
            "session torn down"
        );
    }

    // ── Frames ────────────────────────────────────────────────────────

    fn on_frame(&mut self, dt: Duration, now: Duration) {
        let switch_done = match self.switch.as_mut() {
            Some(switch) => {
                switch.fade.tick(dt);
                let remaining = 1.0 - switch.fade.value();
                for (card, start) in self.ring.cards_mut().iter_mut().zip(&switch.start_opacity) {
                    card.opacity = start * remaining;
                }
                switch.fade.is_complete()
            }
            None => false,
        };
        if switch_done {
            self.finish_switch();
        }

        let mut landed = false;
        if let Some(session) = self.slot.get_mut() {
            let moving = session.is_transitioning();
            if moving {
                landed = session.stepper_mut().advance(dt, &mut self.ring) == StepProgress::Landed;
            }
            let revealing = session.is_revealing();
            let revealed = session.advance_reveal(dt, &mut self.frames);
            if moving || revealing {
                let probe = &self.probe;
                if let Some(rect) = session.rect(now, || probe.container_rect()) {
                    let dims = *session.dims();
                    self.scaler
                        .update(self.ring.cards_mut(), rect, &dims, session.reveal_factor());
                }
            }
            if revealed {
                self.events.push(EngineEvent::RevealFinished);
            }
        }
        if landed {
            self.on_step_landed(now);
        }

        if let Some(entrance) = self.entrance.as_mut() {
            if entrance.advance(dt, &mut self.frames) {
                self.events.push(EngineEvent::EntranceFinished);
                tracing::debug!("entrance finished");
            }
        }
    }

    // ── Steps ─────────────────────────────────────────────────────────

    fn on_step_due(&mut self, id: TimerId, due: StepDue, now: Duration) {
        let Some(session) = self.slot.get_mut() else {
            tracing::trace!(timer = id.get(), "step timer fired with no session");
            return;
        };
        if session.id() != due.session || !session.is_running() || !session.stepper_mut().take_due(id) {
            tracing::trace!(timer = id.get(), session = due.session.get(), "stale step timer ignored");
            return;
        }
        let dims = *session.dims();
        session
            .stepper_mut()
            .begin(&self.ring, &dims, &self.config.timing, &mut self.frames);
        self.events
            .push(EngineEvent::StepStarted { session: due.session });
        tracing::debug!(
            session = due.session.get(),
            step = session.stepper().steps_started(),
            at_ms = now.as_millis() as u64,
            "step started"
        );
    }

    fn on_step_landed(&mut self, now: Duration) {
        let Some(session) = self.slot.get_mut() else {
            return;
        };
        session.stepper_mut().land(&mut self.frames);
        let dims = *session.dims();
        let probe = &self.probe;
        let Some(rect) = session.refresh_rect(now, || probe.container_rect()) else {
            session.pause();
            tracing::debug!(session = session.id().get(), "container detached; stepping paused");
            return;
        };
        let wrapped = wrap::correct(
            self.ring.cards_mut(),
            &WrapBounds::new(&dims, rect.extent_along(dims.axis)),
        );
        self.scaler
            .update(self.ring.cards_mut(), rect, &dims, session.reveal_factor());
        if let Some(anchor) = self.ring.nearest_to_focus(&dims, rect) {
            session.set_anchor(anchor);
        }
        session.arm_step(&mut self.timers, now + self.config.timing.dwell);

        let id = session.id();
        self.stage = Some(Stage { dims, rect });
        self.events
            .push(EngineEvent::StepCompleted { session: id, wrapped });
        tracing::debug!(session = id.get(), wrapped, anchor = session.anchor(), "step completed");
    }

    // ── Resize ────────────────────────────────────────────────────────

    fn poll_resize(&mut self, now: Duration) {
        let current = self.target_mode();
        let Some(decision) = self.reconciler.as_mut().and_then(|r| r.poll(current, now)) else {
            return;
        };
        let width = match decision {
            ReconcileDecision::Reposition { width } | ReconcileDecision::SwitchMode { width, .. } => width,
        };
        self.viewport_width = width;

        if let Some(switch) = self.switch.as_mut() {
            let to = self.config.layout.breakpoints.mode_for(width);
            if switch.to != to {
                tracing::info!(from = switch.to.as_str(), to = to.as_str(), "mode switch retargeted");
                switch.to = to;
            }
            return;
        }
        if self.slot.get().is_none() {
            self.try_start_session(self.anchor_hint);
            return;
        }
        match decision {
            ReconcileDecision::Reposition { .. } => self.reposition(now),
            ReconcileDecision::SwitchMode { from, to, .. } => self.begin_switch(from, to, now),
        }
    }

    /// Same-mode resize: new geometry, snapped around the card nearest the
    /// focus point.
    fn reposition(&mut self, now: Duration) {
        let (_, dims) = resolve(self.viewport_width, &self.config.layout, self.ring.len());
        if !(dims.max_falloff > 0.0) {
            tracing::debug!(width = self.viewport_width, "degenerate geometry; stopping");
            self.teardown_session();
            return;
        }
        let Some(session) = self.slot.get_mut() else {
            return;
        };
        session.invalidate_rect();
        let probe = &self.probe;
        let Some(rect) = session.refresh_rect(now, || probe.container_rect()) else {
            tracing::debug!(session = session.id().get(), "container detached; reposition skipped");
            return;
        };
        let old = *session.dims();
        let anchor = self
            .ring
            .nearest_to_focus(&old, rect)
            .unwrap_or(session.anchor());

        let interrupted = session.is_transitioning();
        if interrupted {
            session.stepper_mut().detach_frame(&mut self.frames);
            session.stepper_mut().kill_tween();
        }
        session.set_dims(dims);
        session.set_anchor(anchor);
        place(&mut self.ring, &dims, anchor);
        wrap::correct(
            self.ring.cards_mut(),
            &WrapBounds::new(&dims, rect.extent_along(dims.axis)),
        );
        self.scaler
            .update(self.ring.cards_mut(), rect, &dims, session.reveal_factor());
        if interrupted || session.stepper().pending_timer().is_none() {
            session.arm_step(&mut self.timers, now + self.config.timing.settle_delay);
        }

        self.stage = Some(Stage { dims, rect });
        self.anchor_hint = anchor;
        self.events.push(EngineEvent::Repositioned { anchor });
        tracing::debug!(
            session = session.id().get(),
            anchor,
            interrupted,
            step = dims.step,
            "repositioned"
        );
    }

    /// Cross-mode resize: tear down, fade every card out, then rebuild.
    fn begin_switch(&mut self, from: LayoutMode, to: LayoutMode, now: Duration) {
        let probe = &self.probe;
        let anchor = self.slot.get_mut().and_then(|session| {
            let dims = *session.dims();
            session
                .rect(now, || probe.container_rect())
                .and_then(|rect| self.ring.nearest_to_focus(&dims, rect))
        });
        self.teardown_session();
        if let Some(anchor) = anchor {
            self.anchor_hint = anchor;
        }

        let start_opacity = self.ring.cards().iter().map(|c| c.opacity).collect();
        let frame_sub = self.frames.subscribe("mode_switch");
        self.switch = Some(ModeSwitch {
            from,
            to,
            fade: Fade::new(self.config.timing.fade_out_duration).easing(ease_in),
            start_opacity,
            frame_sub,
        });
        self.events.push(EngineEvent::ModeSwitchStarted { from, to });
        tracing::info!(
            from = from.as_str(),
            to = to.as_str(),
            anchor = self.anchor_hint,
            "mode switch started"
        );
    }

    fn finish_switch(&mut self) {
        let Some(switch) = self.switch.take() else {
            return;
        };
        self.frames.unsubscribe(switch.frame_sub);
        for card in self.ring.cards_mut() {
            card.opacity = 0.0;
        }
        tracing::debug!(
            from = switch.from.as_str(),
            to = switch.to.as_str(),
            "fade-out finished"
        );
        self.try_start_session(self.anchor_hint);
    }
}
