#![forbid(unsafe_code)]

//! Card arena and ring placement.
//!
//! Cards live in a fixed-size [`Ring`] addressed by stable index. The engine
//! never adds or removes cards after construction; it only rewrites the
//! derived fields (offset, scale, opacity, stacking order).
//!
//! Placement puts the anchor card's center on the focus point and every
//! other card at a whole number of steps fore or aft of it:
//!
//! ```text
//! rel(i)    = (i - anchor) mod N, remapped into (-N/2, N/2]
//! offset(i) = focus_point - card_size / 2 + rel(i) * step
//! ```

use hero_core::geometry::Rect;

use crate::layout::DimensionSet;

/// Static description of a card, as provided by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSpec {
    pub id: u32,
    pub image_ref: String,
    pub label: String,
}

impl CardSpec {
    pub fn new(id: u32, image_ref: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id,
            image_ref: image_ref.into(),
            label: label.into(),
        }
    }
}

/// The hero's card set. The tail repeats the head so the ring is long
/// enough to never show a gap at wide layouts.
#[must_use]
pub fn hero_cards() -> Vec<CardSpec> {
    vec![
        CardSpec::new(1, "/images/img-0.png", "Spaw Retreat"),
        CardSpec::new(2, "/images/img-1.png", "Sunnyside Up"),
        CardSpec::new(3, "/images/img-2.png", "Bott and Sons"),
        CardSpec::new(4, "/images/img-3.png", "Another Client"),
        CardSpec::new(5, "/images/img-0.png", "Spaw Retreat Copy"),
        CardSpec::new(6, "/images/img-1.png", "Sunnyside Up Copy"),
        CardSpec::new(7, "/images/img-2.png", "Bott and Sons Copy"),
    ]
}

/// A card and its derived render state.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub index: usize,
    pub spec: CardSpec,
    /// Signed distance of the card's leading edge along the primary axis,
    /// relative to the container origin.
    pub offset: f32,
    pub scale: f32,
    pub opacity: f32,
    pub z_index: i32,
}

impl Card {
    /// Center of the card along the primary axis, container-relative.
    #[inline]
    #[must_use]
    pub fn center(&self, card_size: f32) -> f32 {
        self.offset + card_size / 2.0
    }
}

/// Fixed arena of cards.
#[derive(Debug, Clone, Default)]
pub struct Ring {
    cards: Vec<Card>,
}

impl Ring {
    /// Build the arena. Cards start invisible at offset 0.
    #[must_use]
    pub fn new(specs: Vec<CardSpec>) -> Self {
        let cards = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| Card {
                index,
                spec,
                offset: 0.0,
                scale: 1.0,
                opacity: 0.0,
                z_index: 0,
            })
            .collect();
        Self { cards }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Current offsets in index order.
    #[must_use]
    pub fn offsets(&self) -> Vec<f32> {
        self.cards.iter().map(|c| c.offset).collect()
    }

    /// Move every card by the same amount.
    pub fn translate_all(&mut self, delta: f32) {
        for card in &mut self.cards {
            card.offset += delta;
        }
    }

    /// Index of the card whose measured center is closest to the focus point.
    ///
    /// Distances are taken in the coordinate space of `rect`, so a fresh
    /// container reading reflects the current reflow. Ties go to the lower
    /// index.
    #[must_use]
    pub fn nearest_to_focus(&self, dims: &DimensionSet, rect: Rect) -> Option<usize> {
        let origin = rect.origin_along(dims.axis);
        let focus = origin + dims.focus_point;
        self.cards
            .iter()
            .map(|c| (c.index, (origin + c.center(dims.card_size) - focus).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

/// Signed ring position of card `index` relative to `anchor`, in
/// `(-n/2, n/2]`.
#[must_use]
pub fn relative_position(index: usize, anchor: usize, n: usize) -> i64 {
    if n == 0 {
        return 0;
    }
    let n = n as i64;
    let r = (index as i64 - anchor as i64).rem_euclid(n);
    // r > n/2 exactly when 2r > n, which keeps n/2 itself on the positive side.
    if 2 * r > n { r - n } else { r }
}

/// Offset that places card `index` at its ring slot.
#[must_use]
pub fn slot_offset(index: usize, anchor: usize, dims: &DimensionSet) -> f32 {
    let rel = relative_position(index, anchor, dims.card_count);
    dims.focus_point - dims.card_size / 2.0 + rel as f32 * dims.step
}

/// Recompute every card's offset from scratch for `anchor`.
pub fn place(ring: &mut Ring, dims: &DimensionSet, anchor: usize) {
    for card in ring.cards_mut() {
        card.offset = slot_offset(card.index, anchor, dims);
    }
    tracing::debug!(
        anchor,
        cards = ring.len(),
        step = dims.step,
        mode = dims.mode.as_str(),
        "ring placed"
    );
}
