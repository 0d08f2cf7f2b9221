//! Trait definitions for hardware abstraction and diagnostic output.
//!
//! This module defines the core abstractions that allow rs-points to:
//! - Run on different hardware (ESP32, any `embedded-hal` board, desktop mock)
//! - Report state changes without knowing where the text ends up
//!
//! # Submodules
//!
//! - `hardware`: Sensor input, relay output, clock
//! - `sink`: Diagnostic event sink
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`SensorInput`]: Analog or digital point-position sensor
//! - [`RelayOutput`]: Track-power relay or lamp
//! - [`Clock`]: Wrapping millisecond time source

pub mod hardware;
pub mod sink;

pub use hardware::*;
pub use sink::*;
