#![forbid(unsafe_code)]

//! Responsive infinite carousel for the hero section.
//!
//! A fixed ring of cards travels one step at a time along a horizontal or
//! vertical axis. Cards near the focus point grow and come forward; cards
//! that leave one end of the container reappear at the other. The layout
//! mode (narrow, medium, wide) follows the viewport width, and resizing
//! either snaps the ring in place or rebuilds it behind a short fade.
//!
//! The crate never reads a clock or touches a host element. Drive it through
//! [`CarouselEngine`](engine::CarouselEngine): report time and resizes, read
//! back [`CardTransform`](engine::CardTransform)s.
//!
//! # Module map
//! - [`layout`]: breakpoints, per-mode design specs, dimension resolution.
//! - [`ring`]: card arena and slot placement.
//! - [`focus`]: distance-based scale, opacity and stacking.
//! - [`wrap`]: closed-form wrap correction.
//! - [`stepper`], [`session`]: the step cycle and its single live session.
//! - [`reconcile`]: resize debouncing and mode-change classification.
//! - [`entrance`]: the one-shot headline choreography.
//! - [`engine`]: everything above, behind one host-facing type.

pub mod config;
pub mod engine;
pub mod entrance;
pub mod error;
pub mod focus;
pub mod layout;
pub mod reconcile;
pub mod ring;
pub mod session;
pub mod stepper;
pub mod wrap;

pub use config::{CarouselConfig, Direction, TimingConfig};
pub use engine::{CardTransform, CarouselEngine, ContainerProbe, EngineEvent};
pub use error::{ConfigError, SessionError};
pub use layout::{LayoutMode, resolve};
pub use ring::{CardSpec, hero_cards};
