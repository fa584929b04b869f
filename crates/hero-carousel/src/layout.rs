#![forbid(unsafe_code)]

//! Layout mode resolution and per-mode geometry.
//!
//! [`resolve`] maps a viewport width to a [`LayoutMode`] and the
//! [`DimensionSet`] the ring uses in that mode. Every dimension is scaled
//! linearly from the mode's design reference width, except that a mode with
//! `freeze_at_reference` stops growing once the viewport reaches the
//! reference.
//!
//! # Invariants
//!
//! 1. `step == card_size + gap` and `step > 0` for any positive width.
//! 2. `total_span == card_count * step` exactly. Scaled dimensions are
//!    snapped to a 1/64 px grid, so sums of steps are exact in `f32`.
//! 3. Boundaries are inclusive on the lower mode: a width equal to
//!    `narrow_max` is narrow, a width equal to `medium_max` is medium.
//! 4. `resolve` is pure; equal inputs give equal outputs.

use hero_core::geometry::Axis;

use crate::error::ConfigError;
use crate::focus::OpacityPolicy;

/// Sub-pixel grid that scaled dimensions are snapped to.
const SNAP_GRID: f32 = 64.0;

/// One of the three responsive layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayoutMode {
    Narrow,
    Medium,
    Wide,
}

impl LayoutMode {
    /// All modes, narrowest first.
    pub const ALL: [Self; 3] = [Self::Narrow, Self::Medium, Self::Wide];

    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Narrow => "narrow",
            Self::Medium => "medium",
            Self::Wide => "wide",
        }
    }
}

/// Width thresholds between modes (both inclusive on the lower mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    /// Largest width still laid out as [`LayoutMode::Narrow`].
    pub narrow_max: u32,
    /// Largest width still laid out as [`LayoutMode::Medium`].
    pub medium_max: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            narrow_max: 768,
            medium_max: 1024,
        }
    }
}

impl Breakpoints {
    /// Mode for a viewport width.
    #[must_use]
    pub const fn mode_for(&self, width: u32) -> LayoutMode {
        if width <= self.narrow_max {
            LayoutMode::Narrow
        } else if width <= self.medium_max {
            LayoutMode::Medium
        } else {
            LayoutMode::Wide
        }
    }

    /// Whether moving between the two widths changes mode.
    #[must_use]
    pub const fn crosses(&self, from: u32, to: u32) -> bool {
        !matches!(
            (self.mode_for(from), self.mode_for(to)),
            (LayoutMode::Narrow, LayoutMode::Narrow)
                | (LayoutMode::Medium, LayoutMode::Medium)
                | (LayoutMode::Wide, LayoutMode::Wide)
        )
    }
}

/// Geometry of a mode at its design reference width, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignDimensions {
    pub card_size: f32,
    pub gap: f32,
    /// Focus point along the container's primary axis.
    pub focus_point: f32,
    /// Distance at which a card reaches minimum prominence.
    pub max_falloff: f32,
}

/// Everything that varies between modes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSpec {
    /// Axis the ring travels along.
    pub axis: Axis,
    /// Viewport width the design dimensions were drawn at.
    pub reference_width: f32,
    pub design: DesignDimensions,
    pub opacity: OpacityPolicy,
    /// Stop scaling up once the viewport reaches the reference width.
    pub freeze_at_reference: bool,
}

impl ModeSpec {
    /// Scale factor applied to the design dimensions at `width`.
    #[must_use]
    pub fn scale_at(&self, width: u32) -> f32 {
        let ratio = width as f32 / self.reference_width;
        if self.freeze_at_reference {
            ratio.min(1.0)
        } else {
            ratio
        }
    }

    fn validate(&self, mode: LayoutMode) -> Result<(), ConfigError> {
        let d = &self.design;
        if !(d.card_size > 0.0) {
            return Err(ConfigError::InvalidCardSize {
                mode,
                value: d.card_size,
            });
        }
        if !(d.gap >= 0.0) {
            return Err(ConfigError::NegativeGap { mode, value: d.gap });
        }
        if !(self.reference_width > 0.0) {
            return Err(ConfigError::InvalidReferenceWidth {
                mode,
                value: self.reference_width,
            });
        }
        if let OpacityPolicy::Fade { min } = self.opacity {
            if !(0.0..=1.0).contains(&min) {
                return Err(ConfigError::InvalidOpacity { mode, value: min });
            }
        }
        Ok(())
    }
}

/// Breakpoints plus one [`ModeSpec`] per mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub breakpoints: Breakpoints,
    pub narrow: ModeSpec,
    pub medium: ModeSpec,
    pub wide: ModeSpec,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            narrow: ModeSpec {
                axis: Axis::Vertical,
                reference_width: 390.0,
                design: DesignDimensions {
                    card_size: 220.0,
                    gap: 16.0,
                    focus_point: 260.0,
                    max_falloff: 320.0,
                },
                opacity: OpacityPolicy::Fade { min: 0.2 },
                freeze_at_reference: false,
            },
            medium: ModeSpec {
                axis: Axis::Horizontal,
                reference_width: 1024.0,
                design: DesignDimensions {
                    card_size: 340.0,
                    gap: 24.0,
                    focus_point: 512.0,
                    max_falloff: 560.0,
                },
                opacity: OpacityPolicy::Fade { min: 0.35 },
                freeze_at_reference: false,
            },
            wide: ModeSpec {
                axis: Axis::Horizontal,
                reference_width: 1440.0,
                design: DesignDimensions {
                    card_size: 461.0,
                    gap: 32.0,
                    focus_point: 720.0,
                    max_falloff: 720.0,
                },
                opacity: OpacityPolicy::Fixed,
                freeze_at_reference: true,
            },
        }
    }
}

impl LayoutConfig {
    /// Spec for a mode.
    #[must_use]
    pub const fn spec(&self, mode: LayoutMode) -> &ModeSpec {
        match mode {
            LayoutMode::Narrow => &self.narrow,
            LayoutMode::Medium => &self.medium,
            LayoutMode::Wide => &self.wide,
        }
    }

    /// Mutable spec for a mode.
    pub fn spec_mut(&mut self, mode: LayoutMode) -> &mut ModeSpec {
        match mode {
            LayoutMode::Narrow => &mut self.narrow,
            LayoutMode::Medium => &mut self.medium,
            LayoutMode::Wide => &mut self.wide,
        }
    }

    /// Replace the breakpoints.
    #[must_use]
    pub fn with_breakpoints(mut self, narrow_max: u32, medium_max: u32) -> Self {
        self.breakpoints = Breakpoints {
            narrow_max,
            medium_max,
        };
        self
    }

    /// Replace one mode's spec.
    #[must_use]
    pub fn with_mode(mut self, mode: LayoutMode, spec: ModeSpec) -> Self {
        *self.spec_mut(mode) = spec;
        self
    }

    /// Check breakpoints and every mode spec.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bp = self.breakpoints;
        if bp.narrow_max >= bp.medium_max {
            return Err(ConfigError::BreakpointsOutOfOrder {
                narrow_max: bp.narrow_max,
                medium_max: bp.medium_max,
            });
        }
        for mode in LayoutMode::ALL {
            self.spec(mode).validate(mode)?;
        }
        Ok(())
    }
}

/// Ring geometry for one mode at one viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionSet {
    pub mode: LayoutMode,
    pub axis: Axis,
    /// Cards are square: this is their extent along both axes.
    pub card_size: f32,
    pub gap: f32,
    /// `card_size + gap`.
    pub step: f32,
    /// `card_count * step`.
    pub total_span: f32,
    pub focus_point: f32,
    pub max_falloff: f32,
    pub card_count: usize,
    pub opacity: OpacityPolicy,
}

impl DimensionSet {
    /// Derive the geometry of `spec` at `width` for `card_count` cards.
    #[must_use]
    pub fn derive(mode: LayoutMode, spec: &ModeSpec, width: u32, card_count: usize) -> Self {
        let k = spec.scale_at(width);
        let d = &spec.design;
        let card_size = snap(d.card_size * k);
        let gap = snap(d.gap * k);
        let step = card_size + gap;
        Self {
            mode,
            axis: spec.axis,
            card_size,
            gap,
            step,
            total_span: step * card_count as f32,
            focus_point: snap(d.focus_point * k),
            max_falloff: snap(d.max_falloff * k),
            card_count,
            opacity: spec.opacity,
        }
    }

    /// Whether the ring fits inside the wrap window of a container of the
    /// given extent, so that wrap correction keeps every card within
    /// `[-(card_size + gap), container + card_size + gap]`.
    #[must_use]
    pub fn fits_wrap_window(&self, container_extent: f32) -> bool {
        self.total_span <= container_extent + 2.0 * self.card_size + self.gap
    }
}

#[inline]
fn snap(v: f32) -> f32 {
    (v * SNAP_GRID).round() / SNAP_GRID
}

/// Resolve the layout for a viewport width.
#[must_use]
pub fn resolve(width: u32, config: &LayoutConfig, card_count: usize) -> (LayoutMode, DimensionSet) {
    let mode = config.breakpoints.mode_for(width);
    let dims = DimensionSet::derive(mode, config.spec(mode), width, card_count);
    (mode, dims)
}
