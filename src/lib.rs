//! # rs-points
//!
//! Relay control for model railway points (turnouts) and crossovers, driven
//! by a position sensor on each point, plus a level crossing flasher.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for position sensors, relay outputs and clocks
//! - **Hysteresis**: Noisy analog readings are interpreted against a dead band
//! - **Debounce**: A new position must hold for a stable duration before it is acted on
//! - **Two relay mappings**: Coacting crossover pairs and Y-branch feeds
//! - **Fail-safe crossing**: Flashers release after the train clears, or on timeout
//!
//! ## Architecture
//!
//! Each point is a pipeline of independent stages:
//!
//! ```text
//! SensorInput ─▶ SensorChannel ─▶ Threshold ─▶ DebounceGate ─▶ PointKind ─▶ RelayPair
//!   (raw)         (rate limit)     (level)      (settled)       (state)      (relays)
//! ```
//!
//! - `traits` - Hardware and event sink abstractions
//! - `sensor`, `threshold`, `debounce` - The sampling pipeline
//! - `point` - Point controller and relay mapping
//! - `registry` - Owns all points and drives them from the main loop
//! - `crossing` - Level crossing flasher
//! - `hal` - Concrete implementations (mock for testing, gpio, esp32 for hardware)
//!
//! The crate is structured to allow testing on desktop without hardware.
//!
//! ## Example
//!
//! ```rust
//! use rs_points::{
//!     PointConfig, PointController, PointState, Route,
//!     hal::{MockRelay, MockSensor, RecordingSink},
//! };
//!
//! // Y-branch point: sensor high feeds leg B
//! let config = PointConfig::y_branch("headshunt");
//! let mut point = PointController::new(
//!     &config,
//!     MockSensor::analog(100),
//!     MockRelay::new(),
//!     MockRelay::new(),
//! );
//! let mut sink = RecordingSink::new();
//!
//! assert_eq!(point.init(0, &mut sink).unwrap(), Some(PointState::YBranch(Route::FeedA)));
//!
//! // Point thrown: the new reading must hold for 50ms
//! point.sensor_mut().set(900);
//! for now in (10..=60).step_by(10) {
//!     point.update(now, &mut sink).unwrap();
//! }
//! assert_eq!(point.state(), Some(PointState::YBranch(Route::FeedB)));
//! assert!(point.second_relay().is_on());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Shared configuration system for desktop and ESP32.
pub mod config;
/// Level crossing flasher with fail-safe release.
pub mod crossing;
/// Generic debounce gate.
pub mod debounce;
/// Events reported to an [`EventSink`].
pub mod events;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Point controller and relay mapping.
pub mod point;
/// Controller registry and loop driver.
pub mod registry;
/// Rate-limited sensor sampling.
pub mod sensor;
/// Hysteresis interpreter.
pub mod threshold;
/// Wrapping millisecond timestamps.
pub mod time;
/// Core traits for hardware abstraction and event reporting.
pub mod traits;

// Re-exports for convenience
pub use crossing::{CrossingController, CrossingState, ReleaseReason, Side};
pub use debounce::{Accepted, DebounceGate};
pub use events::{Event, PointChange, StatusSummary};
pub use point::{CrossoverState, PointController, PointKind, PointState, RelayPair, Route};
pub use registry::{AnyPoint, Point, PointRegistry};
pub use sensor::SensorChannel;
pub use threshold::Threshold;
pub use time::Millis;
pub use traits::{Clock, EventSink, Power, RelayOutput, SensorInput, SensorLevel};

// Config re-exports
pub use config::{Config, CrossingConfig, DeviceConfig, LoopConfig, PointConfig, RelayPolarity};
