#![forbid(unsafe_code)]

//! End-to-end lifecycle tests.
//!
//! Each test mounts the carousel in a [`Driver`], plays a scenario in
//! virtual time, and checks what a page would observe: which session is
//! live, where the cards sit, and that nothing is left running.
//!
//! Timeline with the default timing: first step 1200ms..2600ms, then one
//! step every 6400ms (5000ms dwell plus 1400ms travel).

use std::time::Duration;

use hero_carousel::engine::EngineEvent;
use hero_carousel::entrance::EntranceConfig;
use hero_carousel::layout::LayoutMode;
use hero_carousel::ring::CardSpec;
use hero_carousel::{CarouselConfig, hero_cards};
use hero_harness::{Driver, FRAME_INTERVAL, ResizeDelivery, SharedContainer};
use pretty_assertions::assert_eq;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn quiet_config() -> CarouselConfig {
    CarouselConfig::default().with_entrance(EntranceConfig::disabled())
}

fn mounted(width: u32) -> Driver {
    let mut d = Driver::new(quiet_config(), hero_cards(), width).expect("valid config");
    d.mount();
    d
}

fn assert_clean(d: &Driver) {
    assert!(d.violations().is_empty(), "violations: {:#?}", d.violations());
}

fn count(d: &Driver, pred: impl Fn(&EngineEvent) -> bool) -> usize {
    d.count_events(|e| pred(e))
}

fn times(d: &Driver, pred: impl Fn(&EngineEvent) -> bool) -> Vec<u64> {
    d.events()
        .iter()
        .filter(|(_, e)| pred(e))
        .map(|(t, _)| t.as_millis() as u64)
        .collect()
}

fn step_starts(d: &Driver) -> Vec<u64> {
    times(d, |e| matches!(e, EngineEvent::StepStarted { .. }))
}

fn step_landings(d: &Driver) -> Vec<u64> {
    times(d, |e| matches!(e, EngineEvent::StepCompleted { .. }))
}

// ============================================================================
// Single session
// ============================================================================

#[test]
fn mode_changing_burst_builds_exactly_one_new_session() {
    let mut d = mounted(1440);
    d.run_for(ms(2000));

    for i in 0..10 {
        d.resize(700 + i * 5);
        d.run_for(ms(5));
    }
    d.run_for(ms(2000));

    let engine = d.engine();
    assert_eq!(engine.live_sessions(), 1);
    assert_eq!(engine.sessions_created(), 2);
    assert_eq!(engine.mode(), Some(LayoutMode::Narrow));
    assert_eq!(
        count(&d, |e| matches!(e, EngineEvent::ModeSwitchStarted { .. })),
        1
    );
    let stepping = engine.session().is_some_and(|s| s.is_transitioning());
    assert_eq!(engine.pending_step_timers() + usize::from(stepping), 1);
    assert_clean(&d);
}

#[test]
fn resize_back_during_fade_rebuilds_in_original_mode() {
    let mut d = mounted(1440);
    d.run_for(ms(1000));
    d.resize(700);
    d.run_for(ms(100));
    assert!(d.engine().is_switching());

    d.resize(1440);
    d.run_for(ms(1000));
    assert_eq!(d.engine().mode(), Some(LayoutMode::Wide));
    assert_eq!(d.engine().live_sessions(), 1);
    assert_eq!(d.engine().sessions_created(), 2);
    assert_clean(&d);
}

#[test]
fn torn_down_session_never_steps() {
    let mut d = mounted(1440);
    // The first session's step is due at 1200ms; switch just before it.
    d.run_for(ms(1100));
    d.resize(900);
    d.run_for(ms(3000));

    let first = d
        .events()
        .iter()
        .find_map(|(_, e)| match e {
            EngineEvent::SessionStarted { session, .. } => Some(*session),
            _ => None,
        })
        .expect("first session");
    assert_eq!(
        count(&d, |e| matches!(e, EngineEvent::StepStarted { session } if *session == first)),
        0
    );
    assert!(count(&d, |e| matches!(e, EngineEvent::StepStarted { .. })) >= 1);
    assert_clean(&d);
}

// ============================================================================
// Resize handling
// ============================================================================

#[test]
fn same_width_resize_changes_nothing() {
    let mut control = mounted(1440);
    let mut d = mounted(1440);

    for t in [100u64, 900, 1500, 2200, 4000] {
        control.run_for(ms(t) - control.now());
        d.run_for(ms(t) - d.now());
        d.resize(1440);
    }
    control.run_for(ms(9000) - control.now());
    d.run_for(ms(9000) - d.now());

    assert_eq!(d.transforms_checksum(), control.transforms_checksum());
    assert_eq!(d.engine().sessions_created(), 1);
    assert_eq!(count(&d, |e| matches!(e, EngineEvent::Repositioned { .. })), 0);
    assert_clean(&d);
}

#[test]
fn same_width_resizes_between_frames_keep_step_times() {
    let mut control = mounted(1440);
    let mut d = Driver::new(quiet_config(), hero_cards(), 1440)
        .expect("valid config")
        .with_resize_delivery(ResizeDelivery::BetweenFrames);
    d.mount();

    while d.now() < ms(16_000) {
        d.resize(1440);
        d.run_for(FRAME_INTERVAL);
        control.run_for(FRAME_INTERVAL);
    }

    assert_eq!(step_landings(&control).first(), Some(&2608));
    assert_eq!(step_starts(&d), step_starts(&control));
    assert_eq!(step_landings(&d), step_landings(&control));
    assert_eq!(d.transforms_checksum(), control.transforms_checksum());
    assert_clean(&d);
}

#[test]
fn jitter_storm_between_frames_keeps_cadence() {
    let mut d = Driver::new(quiet_config(), hero_cards(), 1440)
        .expect("valid config")
        .with_resize_delivery(ResizeDelivery::BetweenFrames);
    d.mount();
    d.run_for(ms(1000));

    // Each burst wanders inside the wide mode and returns to the applied
    // width before the debounce window closes.
    while d.now() < ms(21_000) {
        d.resize(1400);
        d.run_for(ms(7));
        d.resize(1480);
        d.run_for(ms(7));
        d.resize(1440);
        d.run_for(ms(34));
    }

    let starts = step_starts(&d);
    let landings = step_landings(&d);
    assert!(landings.len() >= 3, "landings: {landings:?}");
    assert_eq!(starts.first(), Some(&1200));
    for (start, landing) in starts.iter().zip(&landings) {
        let travel = landing - start;
        assert!((1400..1416).contains(&travel), "step took {travel}ms");
    }
    for (landing, next) in landings.iter().zip(starts.iter().skip(1)) {
        assert_eq!(next - landing, 5000);
    }
    assert_eq!(d.engine().sessions_created(), 1);
    assert_eq!(count(&d, |e| matches!(e, EngineEvent::Repositioned { .. })), 0);
    assert_clean(&d);
}

#[test]
fn same_mode_resize_snaps_around_focused_card() {
    let mut d = mounted(1440);
    d.run_for(ms(3000));
    assert_eq!(d.engine().session().map(|s| s.anchor()), Some(1));

    d.resize(1300);
    d.run_for(ms(300));
    assert!(d
        .events()
        .iter()
        .any(|(_, e)| *e == EngineEvent::Repositioned { anchor: 1 }));

    let engine = d.engine();
    let dims = *engine.session().expect("session").dims();
    let card = &engine.ring().cards()[1];
    assert_eq!(card.center(dims.card_size), dims.focus_point);
    assert_eq!(engine.sessions_created(), 1);
    assert_clean(&d);
}

#[test]
fn mode_switch_keeps_focused_card() {
    let mut d = mounted(1440);
    d.run_for(ms(3000));

    d.resize(700);
    d.run_for(ms(1000));
    let engine = d.engine();
    let session = engine.session().expect("rebuilt session");
    assert_eq!(session.mode(), LayoutMode::Narrow);
    assert_eq!(session.anchor(), 1);
    let dims = *session.dims();
    assert_eq!(
        engine.ring().cards()[1].center(dims.card_size),
        dims.focus_point
    );
    assert_clean(&d);
}

#[test]
fn breakpoint_widths_belong_to_lower_mode() {
    for (width, mode) in [
        (768, LayoutMode::Narrow),
        (769, LayoutMode::Medium),
        (1024, LayoutMode::Medium),
        (1025, LayoutMode::Wide),
    ] {
        let d = mounted(width);
        assert_eq!(d.engine().mode(), Some(mode), "width {width}");
    }
}

// ============================================================================
// Wrap
// ============================================================================

#[test]
fn four_card_ring_stays_in_window_and_closed() {
    let cards: Vec<CardSpec> = hero_cards().into_iter().take(4).collect();
    let mut d = Driver::new(quiet_config(), cards, 1440).expect("valid config");
    d.mount();

    let mut checked = 0;
    for _ in 0..400 {
        d.run_for(ms(100));
        let engine = d.engine();
        let session = engine.session().expect("session");
        if session.is_transitioning() {
            continue;
        }
        let dims = *session.dims();
        let lead = -(dims.card_size + dims.gap);
        let hi = 1440.0 + dims.card_size + dims.gap;
        let mut offsets: Vec<f32> = engine.ring().offsets();
        for o in &offsets {
            assert!(*o >= lead && *o <= hi, "offset {o} outside [{lead}, {hi}]");
        }
        offsets.sort_by(f32::total_cmp);
        for pair in offsets.windows(2) {
            assert_eq!(pair[1] - pair[0], dims.step);
        }
        checked += 1;
    }
    assert!(checked > 250, "only {checked} idle samples");
    assert!(count(&d, |e| matches!(e, EngineEvent::StepCompleted { wrapped, .. } if *wrapped > 0)) > 0);
    assert_clean(&d);
}

// ============================================================================
// Geometry loss
// ============================================================================

#[test]
fn detached_container_pauses_until_resize() {
    let mut d = mounted(1440);
    d.run_for(ms(1500));
    d.container().detach();
    d.run_for(ms(2000));

    let engine = d.engine();
    assert_eq!(engine.live_sessions(), 1);
    assert_eq!(engine.pending_step_timers(), 0);
    assert!(!engine.wants_frames());

    d.container()
        .set(Some(SharedContainer::for_viewport(1300, LayoutMode::Wide)));
    d.resize(1300);
    d.run_for(ms(200));
    assert_eq!(d.engine().pending_step_timers(), 1);
    d.run_for(ms(3000));
    // The step that landed while detached reports nothing; the resumed one does.
    assert_eq!(count(&d, |e| matches!(e, EngineEvent::StepCompleted { .. })), 1);
    assert_clean(&d);
}

#[test]
fn paused_cycle_resumes_only_on_an_applied_resize() {
    let mut d = mounted(1440);
    d.run_for(ms(1500));
    d.container().detach();
    d.run_for(ms(2000));
    assert!(d.engine().session().is_some_and(|s| s.is_paused()));

    // Reattaching alone, or resizing to the width already applied, changes
    // nothing: the coalescer drops the signal and no frame re-checks.
    d.container()
        .set(Some(SharedContainer::for_viewport(1440, LayoutMode::Wide)));
    d.run_for(ms(1000));
    d.resize(1440);
    d.run_for(ms(1000));
    assert!(d.engine().session().is_some_and(|s| s.is_paused()));
    assert_eq!(d.engine().pending_step_timers(), 0);

    d.resize(1420);
    d.run_for(ms(200));
    assert!(d.engine().session().is_some_and(|s| !s.is_paused()));
    assert_eq!(d.engine().pending_step_timers(), 1);
    assert_clean(&d);
}

#[test]
fn never_attached_container_starts_nothing() {
    let config = quiet_config();
    let mut d = Driver::new(config, hero_cards(), 1440).expect("valid config");
    d.container().detach();
    d.mount();
    d.run_for(ms(10_000));
    assert_eq!(d.engine().live_sessions(), 0);
    assert_eq!(d.engine().pending_step_timers(), 0);
    assert!(d.engine().transforms().is_empty());
    assert_clean(&d);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn unmount_mid_step_leaves_nothing() {
    let mut d = mounted(1440);
    d.run_for(ms(1800));
    assert!(d.engine().session().is_some_and(|s| s.is_transitioning()));
    d.unmount();
    assert_clean(&d);
    assert!(d.engine().frame_subscriptions().is_empty());
}

#[test]
fn unmount_mid_switch_leaves_nothing() {
    let mut d = mounted(1440);
    d.run_for(ms(500));
    d.resize(600);
    d.run_for(ms(120));
    assert!(d.engine().is_switching());
    d.unmount();
    assert_clean(&d);
    d.run_for(ms(5000));
    assert_eq!(d.engine().sessions_created(), 1);
}

#[test]
fn unmount_mid_entrance_leaves_nothing() {
    let mut d = Driver::new(CarouselConfig::default(), hero_cards(), 1440).expect("valid config");
    d.mount();
    d.run_for(ms(1200));
    assert!(d.engine().frame_subscriptions().contains(&"entrance"));
    d.unmount();
    assert_clean(&d);
    assert!(d.engine().entrance_frame().is_none());
}

// ============================================================================
// Entrance
// ============================================================================

#[test]
fn entrance_plays_once_through_resizes() {
    let mut d = Driver::new(CarouselConfig::default(), hero_cards(), 1440).expect("valid config");
    d.mount();
    d.run_for(ms(900));
    d.resize(700);
    d.run_for(ms(600));
    d.resize(1440);
    d.run_for(ms(3000));

    assert_eq!(count(&d, |e| *e == EngineEvent::EntranceFinished), 1);
    let frame = d.engine().entrance_frame().expect("entrance kept after finishing");
    assert_eq!(frame.loop_width, 0.0);
    assert_eq!(frame.color_mix, 1.0);
    assert!(!d.engine().frame_subscriptions().contains(&"entrance"));
    assert_clean(&d);
}
