#![forbid(unsafe_code)]

//! Closed-form wrap correction.
//!
//! After each step, a card that has travelled off one end of the container
//! is moved by whole ring spans to the other end. The correction is a single
//! modular expression per card, so it is exact no matter how far the offset
//! has drifted, and it never iterates.
//!
//! With `lead = -(card_size + gap)` and `trail = container + card_size`:
//!
//! - `offset >= trail` lands in `[trail - span, trail)`;
//! - `offset < lead` lands in `[lead, lead + span)`.
//!
//! When the ring fits the window (`span <= container + 2 * card_size + gap`)
//! both target ranges lie inside `[lead, container + card_size + gap]` and a
//! corrected offset is never corrected again. Longer rings fall back to the
//! single window `[lead, lead + span)`, which is just as stable.

use crate::layout::DimensionSet;
use crate::ring::Card;

/// Edges of the wrap window for one container extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapBounds {
    /// Offsets below this are past the leading edge.
    pub lead: f32,
    /// Offsets at or above this are past the trailing edge.
    pub trail: f32,
    /// Ring span.
    pub span: f32,
    fits: bool,
}

impl WrapBounds {
    /// Bounds for a ring in a container `container_extent` pixels long along
    /// the primary axis.
    #[must_use]
    pub fn new(dims: &DimensionSet, container_extent: f32) -> Self {
        Self {
            lead: -(dims.card_size + dims.gap),
            trail: container_extent + dims.card_size,
            span: dims.total_span,
            fits: dims.fits_wrap_window(container_extent),
        }
    }

    /// Inclusive range every corrected offset lies in when the ring fits.
    #[must_use]
    pub fn visible_range(&self, dims: &DimensionSet) -> (f32, f32) {
        (self.lead, self.trail + dims.gap)
    }

    /// Whether the ring fits inside the window.
    #[must_use]
    pub fn ring_fits(&self) -> bool {
        self.fits
    }
}

/// Corrected offset, or `None` when the offset is already inside the window.
///
/// For a ring that fits, the window is `[lead, trail)` and both edges are
/// active. For a longer ring the window is `[lead, lead + span)`: an offset
/// at or past `trail` but short of `lead + span` is part of the queue of
/// cards waiting beyond the trailing edge and stays where it is, including
/// one sitting exactly at `trail`.
#[must_use]
pub fn wrap_offset(offset: f32, bounds: &WrapBounds) -> Option<f32> {
    if !(bounds.span > 0.0) || !offset.is_finite() {
        return None;
    }
    let wrapped = if offset >= bounds.trail && bounds.fits {
        let base = bounds.trail - bounds.span;
        base + (offset - bounds.trail).rem_euclid(bounds.span)
    } else if offset < bounds.lead || (offset >= bounds.trail && !bounds.fits) {
        bounds.lead + (offset - bounds.lead).rem_euclid(bounds.span)
    } else {
        return None;
    };
    (wrapped != offset).then_some(wrapped)
}

/// Correct every card. Returns the number of cards moved.
pub fn correct(cards: &mut [Card], bounds: &WrapBounds) -> usize {
    let mut wrapped = 0;
    for card in cards {
        if let Some(next) = wrap_offset(card.offset, bounds) {
            tracing::debug!(card = card.index, from = card.offset, to = next, "card wrapped");
            card.offset = next;
            wrapped += 1;
        }
    }
    wrapped
}
