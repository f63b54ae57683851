//! proxfuzz firmware library.
//!
//! Motion-gated fuzzy controller that turns a hand's distance into a
//! buzzer pitch and loudness (or LED brightness).  Exposes the pure-logic
//! modules for integration testing and external inspection.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod gate;
pub mod pins;

// The actual peripheral access is guarded by cfg attributes inside;
// host builds get simulation stubs.
pub mod adapters;
pub mod drivers;
pub mod sensors;

pub use error::{ConfigError, Error, Result, SensorError};
