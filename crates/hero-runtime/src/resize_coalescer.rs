//! Latest-wins viewport resize coalescer.
//!
//! Browsers deliver resize notifications in bursts while a window edge is
//! dragged. Acting on each one would re-derive geometry (or worse, rebuild a
//! layout session) dozens of times per second. [`ResizeCoalescer`] debounces
//! the stream:
//!
//! - **Latest wins**: only the final width of a burst is applied.
//! - **Quiet period**: a width is applied once no further signal arrived for
//!   the configured delay.
//! - **Urgency aware**: a burst whose latest signal crosses a layout boundary
//!   uses the shorter boundary delay so structural switches feel prompt.
//! - **Idempotent**: a signal equal to the last applied width while nothing
//!   is pending is dropped, and a burst that returns to the applied width
//!   cancels itself.
//!
//! # Usage
//!
//! ```ignore
//! let mut c = ResizeCoalescer::new(CoalescerConfig::default(), 1440);
//! c.handle_resize_at(1200, Urgency::Steady, now);
//! // ... later, from the host wakeup
//! if let CoalesceAction::Apply { width, .. } = c.tick_at(now + ms(150)) {
//!     // re-derive layout for `width`
//! }
//! ```
//!
//! # Decision rule
//!
//! 1) If a hard deadline is configured and the coalesce window is older than
//!    it, **apply** (forced).
//! 2) If the time since the latest signal is at least the delay for that
//!    signal's urgency, **apply**.
//! 3) Otherwise **coalesce**.
//!
//! # Failure modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `tick` with nothing pending | `CoalesceAction::None` |
//! | zero delay | applies on the first tick at or after the signal |

#![forbid(unsafe_code)]

use std::time::Duration;

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv_hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= *byte as u64;
        *hash = hash.wrapping_mul(FNV_PRIME);
    }
}

/// Configuration for the resize coalescer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoalescerConfig {
    /// Quiet period before applying an ordinary resize.
    pub steady_delay: Duration,
    /// Quiet period when the latest signal crosses a layout boundary.
    pub boundary_delay: Duration,
    /// Optional upper bound on how long a burst may be held back.
    pub hard_deadline: Option<Duration>,
    /// Keep an in-memory decision log.
    pub enable_logging: bool,
}

impl Default for CoalescerConfig {
    fn default() -> Self {
        Self {
            steady_delay: Duration::from_millis(150),
            boundary_delay: Duration::from_millis(50),
            hard_deadline: None,
            enable_logging: false,
        }
    }
}

impl CoalescerConfig {
    /// Enable or disable decision logging.
    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Set both quiet periods.
    #[must_use]
    pub fn with_delays(mut self, steady: Duration, boundary: Duration) -> Self {
        self.steady_delay = steady;
        self.boundary_delay = boundary;
        self
    }

    /// Bound the time a continuous burst can be held back.
    #[must_use]
    pub fn with_hard_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.hard_deadline = deadline;
        self
    }

    /// Delay that applies to a signal of the given urgency.
    #[must_use]
    pub fn delay_for(&self, urgency: Urgency) -> Duration {
        match urgency {
            Urgency::Steady => self.steady_delay,
            Urgency::Boundary => self.boundary_delay,
        }
    }
}

/// How quickly a pending width should be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Urgency {
    /// Same layout mode: geometry only.
    #[default]
    Steady,
    /// The width crosses a layout boundary.
    Boundary,
}

impl Urgency {
    /// Stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Steady => "steady",
            Self::Boundary => "boundary",
        }
    }
}

/// Action returned by the coalescer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoalesceAction {
    /// Nothing to do.
    None,
    /// A width is being held back.
    Coalescing,
    /// Apply the given width now.
    ApplyResize {
        width: u32,
        /// Time between the first signal of the window and the apply.
        coalesce_time: Duration,
        /// Whether the hard deadline forced the apply.
        forced_by_deadline: bool,
        /// Urgency of the applied signal.
        urgency: Urgency,
    },
}

/// One logged decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionLog {
    /// Signal or tick index.
    pub event_idx: u64,
    /// Host time of the decision.
    pub at: Duration,
    /// Decision label.
    pub action: &'static str,
    /// Width the decision concerns.
    pub width: u32,
    /// Urgency of that width.
    pub urgency: Urgency,
    /// Coalesce time for applies.
    pub coalesce_ms: Option<f64>,
    /// Whether the apply was forced.
    pub forced: bool,
}

impl DecisionLog {
    /// Serialize to a single JSONL line.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let coalesce = self
            .coalesce_ms
            .map_or_else(|| "null".to_string(), |ms| format!("{ms:.3}"));
        format!(
            r#"{{"event":"decision","idx":{},"at_ms":{:.3},"action":"{}","width":{},"urgency":"{}","coalesce_ms":{},"forced":{}}}"#,
            self.event_idx,
            self.at.as_secs_f64() * 1000.0,
            self.action,
            self.width,
            self.urgency.as_str(),
            coalesce,
            self.forced
        )
    }
}

/// Counters exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoalescerStats {
    /// Resize signals received.
    pub signals: u64,
    /// Widths applied.
    pub applies: u64,
    /// Applies forced by the hard deadline.
    pub forced_applies: u64,
    /// Signals dropped as no-ops.
    pub skipped: u64,
}

/// Latest-wins resize debouncer.
#[derive(Debug, Clone)]
pub struct ResizeCoalescer {
    config: CoalescerConfig,
    pending: Option<(u32, Urgency)>,
    last_applied: u32,
    window_start: Option<Duration>,
    last_event: Option<Duration>,
    stats: CoalescerStats,
    logs: Vec<DecisionLog>,
}

impl ResizeCoalescer {
    /// Create a coalescer with the given configuration and initial width.
    #[must_use]
    pub fn new(config: CoalescerConfig, initial_width: u32) -> Self {
        Self {
            config,
            pending: None,
            last_applied: initial_width,
            window_start: None,
            last_event: None,
            stats: CoalescerStats::default(),
            logs: Vec::new(),
        }
    }

    /// Handle a resize signal.
    pub fn handle_resize_at(&mut self, width: u32, urgency: Urgency, now: Duration) -> CoalesceAction {
        self.stats.signals += 1;
        self.last_event = Some(now);

        if width == self.last_applied {
            self.stats.skipped += 1;
            if self.pending.take().is_some() {
                self.window_start = None;
                self.log_decision(now, "cancel_back_to_applied", width, urgency, None, false);
            } else {
                self.log_decision(now, "skip_same_size", width, urgency, None, false);
            }
            return CoalesceAction::None;
        }

        self.pending = Some((width, urgency));
        let window_start = *self.window_start.get_or_insert(now);

        if let Some(deadline) = self.config.hard_deadline {
            if now.saturating_sub(window_start) >= deadline {
                return self.apply_pending_at(now, true);
            }
        }

        self.log_decision(now, "coalesce", width, urgency, None, false);
        CoalesceAction::Coalescing
    }

    /// Advance the coalescer. Call on every host wakeup.
    pub fn tick_at(&mut self, now: Duration) -> CoalesceAction {
        let Some((_, urgency)) = self.pending else {
            return CoalesceAction::None;
        };

        if let (Some(deadline), Some(start)) = (self.config.hard_deadline, self.window_start) {
            if now.saturating_sub(start) >= deadline {
                return self.apply_pending_at(now, true);
            }
        }

        let quiet = self
            .last_event
            .map_or(Duration::MAX, |last| now.saturating_sub(last));
        if quiet >= self.config.delay_for(urgency) {
            return self.apply_pending_at(now, false);
        }
        CoalesceAction::None
    }

    /// Time until the pending width is due, `None` when nothing is pending.
    #[must_use]
    pub fn time_until_apply(&self, now: Duration) -> Option<Duration> {
        let (_, urgency) = self.pending?;
        let last = self.last_event?;
        let due = last.saturating_add(self.config.delay_for(urgency));
        let mut wait = due.saturating_sub(now);
        if let (Some(deadline), Some(start)) = (self.config.hard_deadline, self.window_start) {
            wait = wait.min(start.saturating_add(deadline).saturating_sub(now));
        }
        Some(wait)
    }

    fn apply_pending_at(&mut self, now: Duration, forced: bool) -> CoalesceAction {
        let Some((width, urgency)) = self.pending.take() else {
            return CoalesceAction::None;
        };
        let coalesce_time = self
            .window_start
            .take()
            .map_or(Duration::ZERO, |start| now.saturating_sub(start));
        self.last_applied = width;
        self.stats.applies += 1;
        if forced {
            self.stats.forced_applies += 1;
        }
        let action = if forced { "apply_forced" } else { "apply" };
        self.log_decision(
            now,
            action,
            width,
            urgency,
            Some(coalesce_time.as_secs_f64() * 1000.0),
            forced,
        );
        CoalesceAction::ApplyResize {
            width,
            coalesce_time,
            forced_by_deadline: forced,
            urgency,
        }
    }

    fn log_decision(
        &mut self,
        now: Duration,
        action: &'static str,
        width: u32,
        urgency: Urgency,
        coalesce_ms: Option<f64>,
        forced: bool,
    ) {
        tracing::trace!(action, width, urgency = urgency.as_str(), forced, "resize decision");
        if !self.config.enable_logging {
            return;
        }
        self.logs.push(DecisionLog {
            event_idx: self.stats.signals,
            at: now,
            action,
            width,
            urgency,
            coalesce_ms,
            forced,
        });
    }

    /// Whether a width is waiting to be applied.
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Counters.
    #[must_use]
    pub fn stats(&self) -> CoalescerStats {
        self.stats
    }

    /// Decision log as JSONL.
    #[must_use]
    pub fn decision_logs_jsonl(&self) -> String {
        self.logs
            .iter()
            .map(DecisionLog::to_jsonl)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Deterministic checksum over the decision log, for replay comparison.
    #[must_use]
    pub fn decision_checksum(&self) -> u64 {
        let mut hash = FNV_OFFSET_BASIS;
        for entry in &self.logs {
            fnv_hash_bytes(&mut hash, &entry.event_idx.to_le_bytes());
            fnv_hash_bytes(&mut hash, &(entry.at.as_micros() as u64).to_le_bytes());
            fnv_hash_bytes(&mut hash, entry.action.as_bytes());
            fnv_hash_bytes(&mut hash, &entry.width.to_le_bytes());
            fnv_hash_bytes(&mut hash, entry.urgency.as_str().as_bytes());
            fnv_hash_bytes(&mut hash, &[u8::from(entry.forced)]);
        }
        hash
    }
}
