//! tickwork library.
//!
//! Two periodic timers, a coalescing work queue, and three LEDs: one
//! toggled directly from the timer context, one toggled from the worker
//! context via deferred work, one held idle. All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module; host
//! builds run the same logic against simulated GPIO.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod foreground;
pub mod pins;
pub mod router;
pub mod time;
pub mod timer;
pub mod workq;
