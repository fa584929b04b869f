#![forbid(unsafe_code)]

//! Per-frame subscriptions.
//!
//! Work that must run on every rendered frame (tween ticks, continuous focus
//! scaling) subscribes here for exactly as long as it is animating, then
//! unsubscribes. The host only needs to keep an animation-frame callback
//! alive while [`FrameTicker::wants_frames`] is true, so an idle carousel
//! costs nothing between steps.
//!
//! # Invariants
//!
//! 1. A [`FrameSubId`] is never reused.
//! 2. Unsubscribing an unknown or already-removed id is a no-op that returns
//!    `false`.
//! 3. `wants_frames()` is true iff at least one subscription is live.

/// Identifier of a live frame subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameSubId(u64);

impl FrameSubId {
    /// Raw id, for logs.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Subscriber {
    id: FrameSubId,
    label: &'static str,
}

/// Registry of per-frame subscribers.
#[derive(Debug, Clone)]
pub struct FrameTicker {
    active: Vec<Subscriber>,
    next_id: u64,
    frames_delivered: u64,
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTicker {
    /// Create an empty ticker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active: Vec::new(),
            next_id: 1,
            frames_delivered: 0,
        }
    }

    /// Register a subscriber. `label` is only used for diagnostics.
    pub fn subscribe(&mut self, label: &'static str) -> FrameSubId {
        let id = FrameSubId(self.next_id);
        self.next_id += 1;
        self.active.push(Subscriber { id, label });
        tracing::trace!(sub_id = id.0, label, "frame subscription attached");
        id
    }

    /// Remove a subscriber. Returns `true` if it was live.
    pub fn unsubscribe(&mut self, id: FrameSubId) -> bool {
        let Some(pos) = self.active.iter().position(|s| s.id == id) else {
            return false;
        };
        let sub = self.active.remove(pos);
        tracing::trace!(sub_id = id.0, label = sub.label, "frame subscription detached");
        true
    }

    /// Whether a subscription is live.
    #[must_use]
    pub fn is_subscribed(&self, id: FrameSubId) -> bool {
        self.active.iter().any(|s| s.id == id)
    }

    /// Whether the host should keep delivering frames.
    #[must_use]
    pub fn wants_frames(&self) -> bool {
        !self.active.is_empty()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Labels of live subscriptions, in subscription order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.active.iter().map(|s| s.label)
    }

    /// Record that a frame was delivered to the current subscribers.
    /// Returns `false` (and records nothing) when nobody is subscribed.
    pub fn begin_frame(&mut self) -> bool {
        if self.active.is_empty() {
            return false;
        }
        self.frames_delivered += 1;
        true
    }

    /// Total frames delivered while at least one subscriber was live.
    #[must_use]
    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }
}
