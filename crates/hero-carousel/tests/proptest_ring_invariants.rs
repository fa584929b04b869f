//! Property-based invariant tests for ring geometry.
//!
//! 1. Stepping plus wrap correction keeps the ring closed: every card stays
//!    a whole number of steps from every other, modulo the span.
//! 2. When the ring fits its window, corrected offsets stay inside it.
//! 3. A ring too long for its window folds into `[lead, lead + span)` and
//!    leaves offsets already there untouched.
//! 4. Wrap correction is idempotent.
//! 5. Focus prominence is bounded and never increases with distance.
//! 6. Layout resolution is deterministic and its spacing exact.

use hero_carousel::focus::{OpacityPolicy, ScaleRange, sample};
use hero_carousel::layout::{Breakpoints, LayoutConfig, LayoutMode, resolve};
use hero_carousel::ring::{Ring, hero_cards, place};
use hero_carousel::wrap::{self, WrapBounds, wrap_offset};
use proptest::prelude::*;

fn ring_of(n: usize) -> Ring {
    Ring::new(hero_cards().into_iter().cycle().take(n).collect())
}

/// Quarter-pixel offsets, like the positions the engine produces.
fn offset_strategy() -> impl Strategy<Value = f32> {
    (-400_000i32..400_000).prop_map(|v| v as f32 / 4.0)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Ring closure
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stepping_keeps_ring_closed(
        width in 320u32..2560,
        n in 2usize..8,
        anchor in 0usize..8,
        steps in 1usize..40,
        backward in any::<bool>(),
    ) {
        let (_, dims) = resolve(width, &LayoutConfig::default(), n);
        let anchor = anchor % n;
        let mut ring = ring_of(n);
        place(&mut ring, &dims, anchor);
        let extent = width as f32;
        let bounds = WrapBounds::new(&dims, extent);
        wrap::correct(ring.cards_mut(), &bounds);

        let delta = if backward { -dims.step } else { dims.step };
        for _ in 0..steps {
            ring.translate_all(delta);
            wrap::correct(ring.cards_mut(), &bounds);
        }

        let offsets = ring.offsets();
        for i in 0..n {
            for j in 0..n {
                let diff = offsets[i] - offsets[j] - (i as f32 - j as f32) * dims.step;
                let r = diff.rem_euclid(dims.total_span);
                let err = r.min(dims.total_span - r);
                prop_assert!(err < 1e-2, "cards {i},{j}: off by {err}");
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2–4. Wrap window
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn corrected_offsets_stay_in_window_when_ring_fits(
        width in 320u32..2560,
        n in 1usize..8,
        offset in offset_strategy(),
    ) {
        let (_, dims) = resolve(width, &LayoutConfig::default(), n);
        let bounds = WrapBounds::new(&dims, width as f32);
        prop_assume!(bounds.ring_fits());

        let corrected = wrap_offset(offset, &bounds).unwrap_or(offset);
        let (lo, hi) = bounds.visible_range(&dims);
        if offset >= lo && offset <= hi {
            // Already visible offsets may only move by whole spans.
            let moved = (corrected - offset) / dims.total_span;
            prop_assert!((moved - moved.round()).abs() < 1e-3);
        }
        prop_assert!(corrected >= lo - 1e-2, "{corrected} < {lo}");
        prop_assert!(corrected <= hi + 1e-2, "{corrected} > {hi}");
    }

    #[test]
    fn long_rings_fold_into_single_window(
        width in 320u32..2560,
        n in 5usize..16,
        offset in offset_strategy(),
        inside in 0i32..60_000,
    ) {
        let (_, dims) = resolve(width, &LayoutConfig::default(), n);
        let bounds = WrapBounds::new(&dims, width as f32);
        prop_assume!(!bounds.ring_fits());
        let end = bounds.lead + bounds.span;

        let corrected = wrap_offset(offset, &bounds).unwrap_or(offset);
        prop_assert!(corrected >= bounds.lead - 1e-2, "{corrected} < {}", bounds.lead);
        prop_assert!(corrected < end + 1e-2, "{corrected} >= {end}");

        let queued = bounds.lead + inside as f32 / 4.0;
        if queued < end {
            prop_assert_eq!(wrap_offset(queued, &bounds), None);
        }
    }

    #[test]
    fn wrap_is_idempotent(
        width in 320u32..2560,
        n in 1usize..8,
        offset in offset_strategy(),
    ) {
        let (_, dims) = resolve(width, &LayoutConfig::default(), n);
        let bounds = WrapBounds::new(&dims, width as f32);
        let once = wrap_offset(offset, &bounds).unwrap_or(offset);
        prop_assert_eq!(wrap_offset(once, &bounds), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Focus prominence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prominence_is_bounded_and_monotonic(
        d1 in 0.0f32..5_000.0,
        d2 in 0.0f32..5_000.0,
        falloff in 1.0f32..2_000.0,
        min_scale in 0.1f32..1.0,
        min_opacity in 0.0f32..1.0,
    ) {
        let range = ScaleRange { min: min_scale, max: 1.0 };
        let policy = OpacityPolicy::Fade { min: min_opacity };
        let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        let a = sample(near, falloff, range, policy);
        let b = sample(far, falloff, range, policy);

        for s in [a, b] {
            prop_assert!(s.scale >= min_scale - 1e-6 && s.scale <= 1.0 + 1e-6);
            prop_assert!(s.opacity >= min_opacity - 1e-6 && s.opacity <= 1.0 + 1e-6);
            prop_assert!((0..=100).contains(&s.z_index));
        }
        prop_assert!(a.scale >= b.scale - 1e-6);
        prop_assert!(a.opacity >= b.opacity - 1e-6);
        prop_assert!(a.z_index >= b.z_index);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Resolution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resolution_is_deterministic_and_exact(width in 0u32..4_000, n in 0usize..16) {
        let config = LayoutConfig::default();
        let (mode_a, dims_a) = resolve(width, &config, n);
        let (mode_b, dims_b) = resolve(width, &config, n);
        prop_assert_eq!(mode_a, mode_b);
        prop_assert_eq!(dims_a, dims_b);
        prop_assert_eq!(dims_a.step, dims_a.card_size + dims_a.gap);
        prop_assert_eq!(dims_a.total_span, dims_a.step * n as f32);

        let bp = Breakpoints::default();
        let expected = if width <= bp.narrow_max {
            LayoutMode::Narrow
        } else if width <= bp.medium_max {
            LayoutMode::Medium
        } else {
            LayoutMode::Wide
        };
        prop_assert_eq!(mode_a, expected);
    }

    #[test]
    fn wide_geometry_freezes_past_reference(extra in 0u32..3_000) {
        let config = LayoutConfig::default();
        let (_, at_ref) = resolve(1440, &config, 7);
        let (_, beyond) = resolve(1440 + extra, &config, 7);
        prop_assert_eq!(at_ref, beyond);
    }
}
