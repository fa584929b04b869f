#![forbid(unsafe_code)]

//! Error types.
//!
//! None of these reach the host through the engine's public entry points:
//! configuration errors are reported once by [`CarouselEngine::new`], and
//! session errors make the engine skip a session build, which degrades to
//! "the carousel does not move".
//!
//! [`CarouselEngine::new`]: crate::engine::CarouselEngine::new

use std::fmt;

use crate::layout::LayoutMode;
use crate::session::SessionId;

/// Configuration validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    BreakpointsOutOfOrder {
        narrow_max: u32,
        medium_max: u32,
    },
    InvalidCardSize {
        mode: LayoutMode,
        value: f32,
    },
    NegativeGap {
        mode: LayoutMode,
        value: f32,
    },
    InvalidReferenceWidth {
        mode: LayoutMode,
        value: f32,
    },
    InvalidOpacity {
        mode: LayoutMode,
        value: f32,
    },
    InvalidScaleRange {
        min: f32,
        max: f32,
    },
    ZeroStepDuration,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BreakpointsOutOfOrder {
                narrow_max,
                medium_max,
            } => write!(
                f,
                "breakpoints must increase strictly (narrow_max {narrow_max}, medium_max {medium_max})"
            ),
            Self::InvalidCardSize { mode, value } => {
                write!(f, "{} card size must be positive, got {value}", mode.as_str())
            }
            Self::NegativeGap { mode, value } => {
                write!(f, "{} gap must not be negative, got {value}", mode.as_str())
            }
            Self::InvalidReferenceWidth { mode, value } => write!(
                f,
                "{} reference width must be positive, got {value}",
                mode.as_str()
            ),
            Self::InvalidOpacity { mode, value } => write!(
                f,
                "{} opacity must lie in [0, 1], got {value}",
                mode.as_str()
            ),
            Self::InvalidScaleRange { min, max } => {
                write!(f, "scale range requires 0 < min <= max, got [{min}, {max}]")
            }
            Self::ZeroStepDuration => write!(f, "step duration must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Why a session could not be built or installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The card list is empty.
    NoCards,
    /// The resolved falloff distance is zero or negative.
    NonPositiveFalloff,
    /// The container element is not attached.
    ContainerDetached,
    /// A session is already live in the slot.
    SessionAlreadyActive { live: SessionId },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCards => write!(f, "no cards to place"),
            Self::NonPositiveFalloff => write!(f, "falloff distance must be positive"),
            Self::ContainerDetached => write!(f, "container element is not attached"),
            Self::SessionAlreadyActive { live } => {
                write!(f, "session {} is still live; tear it down first", live.get())
            }
        }
    }
}

impl std::error::Error for SessionError {}
