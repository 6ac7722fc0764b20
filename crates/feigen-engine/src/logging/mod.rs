//! Logging utilities.
//!
//! Centralizes logger initialization behind the standard `log` facade.
//! The engine only ever logs through `log` macros; the sink lives here.

mod init;

pub use init::{LogConfig, init, init_default};
