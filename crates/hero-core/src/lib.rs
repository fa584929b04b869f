#![forbid(unsafe_code)]

//! Core: geometry and animation primitives shared by the carousel engine.
//!
//! Nothing in this crate touches a clock, a timer or a host element. Every
//! animation is advanced explicitly with a `Duration`, which keeps the engine
//! deterministic under test and usable from a host-driven WASM loop.

pub mod animation;
pub mod geometry;
