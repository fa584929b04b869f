#![forbid(unsafe_code)]

//! Runtime plumbing for a host-driven animation engine.
//!
//! The host (a `requestAnimationFrame` loop, a native shell, or a test)
//! owns real time. It tells the runtime what time it is; the runtime tells
//! the host when it next needs to be woken up. There are no threads and no
//! blocking calls, so everything here runs unchanged on
//! `wasm32-unknown-unknown`.
//!
//! # Primary pieces
//! - [`HostClock`](clock::HostClock): deterministic monotonic time.
//! - [`TimerQueue`](timer::TimerQueue): cancellable one-shot deadlines.
//! - [`FrameTicker`](frame::FrameTicker): per-frame subscriptions that exist
//!   only while something is animating.
//! - [`ResizeCoalescer`](resize_coalescer::ResizeCoalescer): latest-wins
//!   debouncing of viewport resize bursts.
//! - [`RectCache`](rect_cache::RectCache): TTL cache for container geometry
//!   reads.

pub mod clock;
pub mod frame;
pub mod rect_cache;
pub mod resize_coalescer;
pub mod timer;
