//! feigen engine crate.
//!
//! Owns the platform + GPU pieces of a windowed fractal demo: a poll-style
//! [`display`] (window, surface, frame lifecycle) and a two-stage WGSL
//! [`shader`] loader with headless compile checking.

pub mod display;
pub mod shader;

pub mod logging;
pub mod time;
