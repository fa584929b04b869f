#![forbid(unsafe_code)]

//! Deterministic monotonic clock controlled by the host.

use std::time::Duration;

/// Monotonic time expressed as a `Duration` since an arbitrary host origin.
///
/// The clock never goes backwards: [`HostClock::set`] ignores values earlier
/// than the current reading, which protects timers from a host that reports
/// slightly jittery frame timestamps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HostClock {
    now: Duration,
}

impl HostClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current reading.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock to `now` and return the time that passed. Earlier
    /// readings are ignored and yield zero.
    pub fn set(&mut self, now: Duration) -> Duration {
        let dt = now.saturating_sub(self.now);
        self.now = self.now.max(now);
        dt
    }
}
