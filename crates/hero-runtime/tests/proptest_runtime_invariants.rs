//! Property-based invariant tests for the runtime plumbing.
//!
//! 1. Timers pop in non-decreasing deadline order, each exactly once.
//! 2. Cancelled timers never fire.
//! 3. The coalescer applies at most the latest width of a burst, and only
//!    after the quiet period.
//! 4. The clock never goes backwards.

use std::time::Duration;

use hero_runtime::clock::HostClock;
use hero_runtime::resize_coalescer::{CoalesceAction, CoalescerConfig, ResizeCoalescer, Urgency};
use hero_runtime::timer::TimerQueue;
use proptest::prelude::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Deadline order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn timers_fire_in_deadline_order(
        deadlines in prop::collection::vec(0u64..10_000, 0..64),
        checkpoints in prop::collection::vec(0u64..12_000, 1..16),
    ) {
        let mut q = TimerQueue::new();
        for (i, d) in deadlines.iter().enumerate() {
            q.schedule(ms(*d), i);
        }
        let mut checkpoints = checkpoints;
        checkpoints.sort_unstable();
        checkpoints.push(20_000);

        let mut fired = Vec::new();
        for now in checkpoints {
            for (_, idx) in q.pop_due(ms(now)) {
                prop_assert!(deadlines[idx] <= now);
                fired.push(idx);
            }
        }
        prop_assert_eq!(fired.len(), deadlines.len());
        for pair in fired.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(
                deadlines[a] < deadlines[b] || (deadlines[a] == deadlines[b] && a < b),
                "order violated between {} and {}", a, b
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Cancellation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cancelled_timers_never_fire(
        deadlines in prop::collection::vec(0u64..1_000, 1..32),
        cancel_mask in prop::collection::vec(any::<bool>(), 32),
    ) {
        let mut q = TimerQueue::new();
        let ids: Vec<_> = deadlines.iter().map(|d| q.schedule(ms(*d), *d)).collect();
        let mut cancelled = Vec::new();
        for (i, id) in ids.iter().enumerate() {
            if cancel_mask[i] {
                prop_assert!(q.cancel(*id));
                cancelled.push(*id);
            }
        }
        let fired: Vec<_> = q.pop_due(ms(1_000)).into_iter().map(|(id, _)| id).collect();
        for id in &cancelled {
            prop_assert!(!fired.contains(id));
        }
        prop_assert_eq!(fired.len() + cancelled.len(), ids.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Latest wins
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn coalescer_applies_latest_only(
        widths in prop::collection::vec(320u32..2560, 1..30),
        gaps in prop::collection::vec(0u64..140, 30),
    ) {
        let mut c = ResizeCoalescer::new(CoalescerConfig::default(), 1440);
        let mut now = 0u64;
        for (i, w) in widths.iter().enumerate() {
            now += gaps[i];
            let action = c.handle_resize_at(*w, Urgency::Steady, ms(now));
            let is_apply = matches!(action, CoalesceAction::ApplyResize { .. });
            prop_assert!(!is_apply, "no hard deadline configured");
            // Gaps are shorter than the quiet period, so ticks inside the
            // burst never apply.
            prop_assert_eq!(c.tick_at(ms(now)), CoalesceAction::None);
        }
        let last = *widths.last().unwrap_or(&1440);
        let action = c.tick_at(ms(now + 150));
        if last == 1440 {
            prop_assert_eq!(action, CoalesceAction::None);
        } else {
            let applied = match action {
                CoalesceAction::ApplyResize { width, .. } => Some(width),
                _ => None,
            };
            prop_assert_eq!(applied, Some(last));
        }
        prop_assert!(!c.has_pending());
        prop_assert!(c.stats().applies <= 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Monotonic clock
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clock_is_monotonic(readings in prop::collection::vec(0u64..100_000, 1..50)) {
        let mut clock = HostClock::new();
        let mut prev = clock.now();
        for r in readings {
            let dt = clock.set(ms(r));
            prop_assert!(clock.now() >= prev);
            prop_assert_eq!(clock.now() - prev, dt);
            prev = clock.now();
        }
    }
}
