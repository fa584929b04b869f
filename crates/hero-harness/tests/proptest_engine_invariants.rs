//! Property-based invariant tests for the whole engine under a host loop.
//!
//! 1. Any resize sequence keeps at most one live session and one step timer,
//!    whether resizes arrive on frames or between them.
//! 2. After the sequence settles the session matches the final width.
//! 3. Unmount at an arbitrary point leaves nothing scheduled.
//! 4. Container loss and return never produce a second session.

use std::time::Duration;

use hero_carousel::entrance::EntranceConfig;
use hero_carousel::layout::resolve;
use hero_carousel::{CarouselConfig, hero_cards};
use hero_harness::{Driver, ResizeDelivery, SharedContainer};
use proptest::prelude::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn width() -> impl Strategy<Value = u32> {
    prop_oneof![
        320u32..2560,
        Just(768u32),
        Just(769u32),
        Just(1024u32),
        Just(1025u32),
    ]
}

fn resizes() -> impl Strategy<Value = Vec<(u32, u64)>> {
    prop::collection::vec((width(), 0u64..400), 1..40)
}

fn config(entrance: bool) -> CarouselConfig {
    if entrance {
        CarouselConfig::default()
    } else {
        CarouselConfig::default().with_entrance(EntranceConfig::disabled())
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Resize sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn resize_sequences_keep_one_session(
        initial in width(),
        steps in resizes(),
        entrance in any::<bool>(),
        between_frames in any::<bool>(),
    ) {
        let delivery = if between_frames {
            ResizeDelivery::BetweenFrames
        } else {
            ResizeDelivery::OnFrame
        };
        let mut d = Driver::new(config(entrance), hero_cards(), initial)
            .expect("valid config")
            .with_resize_delivery(delivery);
        d.mount();
        for (w, delay) in &steps {
            d.resize(*w);
            d.run_for(ms(*delay));
            prop_assert!(d.engine().live_sessions() <= 1);
            prop_assert!(d.engine().pending_step_timers() <= 1);
        }
        d.run_for(ms(2000));
        prop_assert!(d.violations().is_empty(), "{:?}", d.violations());

        let last = steps.last().map_or(initial, |(w, _)| *w);
        let (mode, dims) = resolve(last, &d.engine().config().layout, d.engine().ring().len());
        let session = d.engine().session();
        prop_assert!(session.is_some());
        if let Some(s) = session {
            prop_assert_eq!(s.mode(), mode);
            prop_assert_eq!(*s.dims(), dims);
            prop_assert!(s.is_running());
        }
        prop_assert!(!d.engine().is_switching());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Unmount anywhere
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn unmount_anywhere_leaves_nothing(
        steps in resizes(),
        stop_after in 0u64..12_000,
        entrance in any::<bool>(),
    ) {
        let mut d = Driver::new(config(entrance), hero_cards(), 1440).expect("valid config");
        d.mount();
        let mut elapsed = 0;
        for (w, delay) in &steps {
            if elapsed >= stop_after {
                break;
            }
            d.resize(*w);
            d.run_for(ms(*delay));
            elapsed += delay;
        }
        d.run_for(ms(stop_after.saturating_sub(elapsed)));
        d.unmount();
        prop_assert!(d.violations().is_empty(), "{:?}", d.violations());
        prop_assert_eq!(d.engine().live_sessions(), 0);
        prop_assert!(d.engine().frame_subscriptions().is_empty());

        let created = d.engine().sessions_created();
        d.run_for(ms(10_000));
        prop_assert_eq!(d.engine().sessions_created(), created);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Container loss
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn container_loss_never_duplicates_sessions(
        detach_at in 0u64..8_000,
        away_for in 0u64..4_000,
        back_width in width(),
    ) {
        let mut d = Driver::new(config(false), hero_cards(), 1440).expect("valid config");
        d.mount();
        d.run_for(ms(detach_at));
        d.container().detach();
        d.run_for(ms(away_for));
        prop_assert!(d.engine().live_sessions() <= 1);

        let mode = d.engine().config().layout.breakpoints.mode_for(back_width);
        d.container()
            .set(Some(SharedContainer::for_viewport(back_width, mode)));
        d.resize(back_width);
        d.run_for(ms(3000));

        prop_assert!(d.violations().is_empty(), "{:?}", d.violations());
        prop_assert_eq!(d.engine().live_sessions(), 1);
        prop_assert_eq!(d.engine().mode(), Some(mode));
    }
}
