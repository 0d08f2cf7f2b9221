//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `gpio`: Adapters for any `embedded-hal` 1.0 digital pin
//! - `log_sink`: Event sink writing to the `log` facade
//! - `esp32`: ESP32-C3 ADC sensors and clock (requires `esp32` feature)

pub mod gpio;
pub mod log_sink;
pub mod mock;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use gpio::{DigitalSensor, GpioRelay};
pub use log_sink::LogSink;
pub use mock::*;

#[cfg(feature = "esp32")]
pub use esp32::*;
