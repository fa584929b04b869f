#![forbid(unsafe_code)]

//! Distance-to-focus scaling.
//!
//! Every card's prominence is a function of how far its rendered center is
//! from the focus point:
//!
//! ```text
//! norm    = max(0, 1 - distance / max_falloff)
//! scale   = min + (max - min) * norm
//! z_index = round(norm * 100)
//! opacity = policy(norm) * reveal
//! ```
//!
//! [`FocusScaler::update`] is cheap enough to run on every frame: it is O(N)
//! and writes only the derived fields. The container rectangle is passed in
//! by the caller, which reads it through a TTL cache.

use hero_core::geometry::{Rect, lerp};

use crate::error::ConfigError;
use crate::layout::DimensionSet;
use crate::ring::Card;

/// Scale applied at maximum and minimum prominence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    pub min: f32,
    pub max: f32,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            min: 0.82,
            max: 1.0,
        }
    }
}

impl ScaleRange {
    /// Check `0 < min <= max`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min > 0.0 && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidScaleRange {
                min: self.min,
                max: self.max,
            })
        }
    }

    #[inline]
    #[must_use]
    pub fn at(&self, norm: f32) -> f32 {
        lerp(self.min, self.max, norm)
    }
}

/// How a mode treats opacity of cards away from the focus point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OpacityPolicy {
    /// Every card is fully opaque.
    #[default]
    Fixed,
    /// Opacity follows the normalized falloff down to `min`.
    Fade { min: f32 },
}

impl OpacityPolicy {
    #[inline]
    #[must_use]
    pub fn at(&self, norm: f32) -> f32 {
        match *self {
            Self::Fixed => 1.0,
            Self::Fade { min } => lerp(min, 1.0, norm),
        }
    }
}

/// Derived prominence of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusSample {
    pub distance: f32,
    pub norm: f32,
    pub scale: f32,
    pub opacity: f32,
    pub z_index: i32,
}

/// Normalized falloff for a distance. A non-positive falloff yields 0.
#[inline]
#[must_use]
pub fn normalized_falloff(distance: f32, max_falloff: f32) -> f32 {
    if !(max_falloff > 0.0) {
        return 0.0;
    }
    (1.0 - distance.abs() / max_falloff).clamp(0.0, 1.0)
}

/// Sample prominence at a distance from the focus point.
#[must_use]
pub fn sample(distance: f32, max_falloff: f32, range: ScaleRange, policy: OpacityPolicy) -> FocusSample {
    let norm = normalized_falloff(distance, max_falloff);
    FocusSample {
        distance: distance.abs(),
        norm,
        scale: range.at(norm),
        opacity: policy.at(norm),
        z_index: (norm * 100.0).round() as i32,
    }
}

/// Applies [`sample`] to a whole ring.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusScaler {
    range: ScaleRange,
}

impl FocusScaler {
    #[must_use]
    pub const fn new(range: ScaleRange) -> Self {
        Self { range }
    }

    #[must_use]
    pub const fn range(&self) -> ScaleRange {
        self.range
    }

    /// Rewrite scale, opacity and stacking order of every card.
    ///
    /// `reveal` multiplies the computed opacity; pass 1.0 outside the
    /// first-layout reveal. The focus point is expressed in the coordinate
    /// space of `rect`.
    pub fn update(&self, cards: &mut [Card], rect: Rect, dims: &DimensionSet, reveal: f32) {
        let origin = rect.origin_along(dims.axis);
        let focus = origin + dims.focus_point;
        let reveal = reveal.clamp(0.0, 1.0);
        for card in cards {
            let center = origin + card.center(dims.card_size);
            let s = sample(center - focus, dims.max_falloff, self.range, dims.opacity);
            card.scale = s.scale;
            card.opacity = s.opacity * reveal;
            card.z_index = s.z_index;
        }
    }
}
