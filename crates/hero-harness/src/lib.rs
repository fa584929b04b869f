#![forbid(unsafe_code)]

//! Deterministic end-to-end harness for the hero carousel.
//!
//! - **Driver**: a virtual-time host loop that delivers frames, sleeps to the
//!   engine's next wakeup, reflows the container on resize, and checks the
//!   engine's structural invariants after every advance.
//! - **Resize storms**: seeded width sequences (burst, sweep, oscillate,
//!   pathological) played against a fresh engine, with JSONL logs and replay
//!   checksums.
//!
//! # Quick Start
//!
//! ```ignore
//! use hero_harness::{Driver, resize_storm::{run_storm, ResizeStorm, StormConfig}};
//!
//! let storm = ResizeStorm::new(StormConfig::default().with_seed(7));
//! run_storm(&storm, CarouselConfig::default(), hero_cards())?.assert_passed();
//! ```
//!
//! Set `STORM_SEED` to pin the seed used by [`resize_storm::get_storm_seed`].

pub mod driver;
pub mod resize_storm;

pub use driver::{Driver, FRAME_INTERVAL, ResizeDelivery, SharedContainer};
pub use hero_carousel::engine::{CardTransform, EngineEvent};
pub use hero_core::geometry::Rect;
