//! Hardware abstraction traits for point sensors and track-power relays.
//!
//! This module defines the hardware interfaces that let rs-points run the
//! same control logic on an ESP32, behind any `embedded-hal` pin, or against
//! desktop mocks.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`SensorInput`] | Raw analog or digital point-position reading |
//! | [`RelayOutput`] | Track-power relay (or lamp) driven on/off |
//! | [`Clock`] | Wrapping millisecond time source |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. Generic `embedded-hal` pins are wrapped by
//! [`crate::hal::gpio`], and ESP32 ADC channels by `hal::esp32`
//! (requires `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_points::traits::{Power, RelayOutput, SensorInput};
//! use rs_points::hal::{MockRelay, MockSensor};
//!
//! let mut sensor = MockSensor::analog(612);
//! assert_eq!(sensor.read().unwrap(), 612);
//! assert_eq!(sensor.max_raw(), 1023);
//!
//! let mut relay = MockRelay::new();
//! relay.set_power(Power::On).unwrap();
//! assert_eq!(relay.power, Some(Power::On));
//! ```

use crate::time::Millis;

/// Logical state of a relay output.
///
/// This is a label, not a pin level: whether `On` drives the pin high or low
/// is a per-deployment wiring convention handled by the concrete output
/// (see [`RelayPolarity`](crate::config::RelayPolarity)).
///
/// # Default
///
/// Defaults to [`Off`](Self::Off).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Power {
    /// Approach fed with track power.
    On,
    /// Approach isolated.
    #[default]
    Off,
}

impl Power {
    /// Returns the power state as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_points::Power;
    ///
    /// assert_eq!(Power::On.as_str(), "on");
    /// assert_eq!(Power::Off.as_str(), "off");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Power::On => "on",
            Power::Off => "off",
        }
    }

    /// Returns true for [`Power::On`].
    #[inline]
    pub const fn is_on(&self) -> bool {
        matches!(self, Power::On)
    }
}

/// Two-valued output of the threshold interpreter.
///
/// `Low` is the state on the lower side of the threshold, `High` the state
/// past it. Which physical point position each level means is decided by the
/// point's wiring, see [`PointKind`](crate::point::PointKind).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SensorLevel {
    /// At or below the threshold band.
    #[default]
    Low,
    /// Above the threshold band.
    High,
}

impl SensorLevel {
    /// Returns the level as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SensorLevel::Low => "low",
            SensorLevel::High => "high",
        }
    }
}

/// Point position sensor trait - abstracts one analog or digital input.
///
/// Implement this for whatever reports the point's mechanical position:
/// an ADC channel watching a bipolar LED's forward voltage, a microswitch on
/// a GPIO, an optical sensor comparator.
///
/// # Implementation Notes
///
/// - `read()` performs the actual hardware access; it is only called when
///   the sampling interval has elapsed
/// - Values must lie in `0..=max_raw()`; anything larger is clamped by the
///   interpreter rather than rejected
/// - Errors are tolerated: the sampler keeps the last good reading
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_points::traits::SensorInput;
///
/// struct LedVoltage { /* adc handle */ }
///
/// impl SensorInput for LedVoltage {
///     type Error = ();
///
///     fn read(&mut self) -> Result<u16, ()> {
///         // Read the ADC...
///         Ok(520)
///     }
/// }
/// ```
pub trait SensorInput {
    /// Error type for a failed read.
    type Error;

    /// Read the raw sensor value.
    fn read(&mut self) -> Result<u16, Self::Error>;

    /// Largest value `read()` can return.
    ///
    /// Defaults to 1023 (10-bit ADC). Digital inputs return 1.
    fn max_raw(&self) -> u16 {
        1023
    }
}

/// Relay output trait - one track-power relay or indicator lamp.
///
/// # Implementation Notes
///
/// - Writes should be synchronous and bounded in time
/// - The active-high/active-low mapping belongs to the implementation
pub trait RelayOutput {
    /// Error type for relay operations.
    type Error;

    /// Drive the output to the given logical state.
    fn set_power(&mut self, power: Power) -> Result<(), Self::Error>;

    /// Convenience method to isolate the output.
    fn power_off(&mut self) -> Result<(), Self::Error> {
        self.set_power(Power::Off)
    }
}

/// Time source trait for `no_std` compatibility.
///
/// Provides wrapping millisecond time for sampling and debounce timing.
/// On desktop, this can wrap `std::time::Instant`. On embedded, use a
/// hardware timer truncated to 32 bits.
///
/// # Example
///
/// ```rust
/// use rs_points::traits::Clock;
/// use rs_points::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonic modulo 2^32.
    fn now_ms(&self) -> Millis;
}
