//! Frame timing.
//!
//! Stable, testable timing utilities with no coupling to the windowing layer.
//! The display owns one `FrameClock` and ticks it once per `update`; callers
//! read the resulting `FrameTime` to drive animation.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
