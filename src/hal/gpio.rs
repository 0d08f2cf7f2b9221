//! `embedded-hal` adapters for binary point sensors and relay outputs.
//!
//! Any board whose HAL implements `embedded_hal::digital::{InputPin, OutputPin}`
//! can drive point controllers through these wrappers.
//!
//! # Wiring
//!
//! - Microswitch or optical point sensor → input pin (pull-up, switch to GND
//!   reads low, hence [`DigitalSensor::active_low`])
//! - Relay module IN → output pin. Opto-isolated modules usually energise on
//!   a low input, see [`RelayPolarity`].

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::config::RelayPolarity;
use crate::traits::{Power, RelayOutput, SensorInput};

/// Binary point sensor on a GPIO input.
///
/// Reads as `1` when the sensor is asserted, `0` otherwise.
#[derive(Debug)]
pub struct DigitalSensor<P> {
    pin: P,
    active_low: bool,
}

impl<P: InputPin> DigitalSensor<P> {
    /// Sensor asserted when the pin is high.
    pub fn active_high(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Sensor asserted when the pin is pulled low.
    pub fn active_low(pin: P) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Release the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> SensorInput for DigitalSensor<P> {
    type Error = P::Error;

    fn read(&mut self) -> Result<u16, Self::Error> {
        let high = self.pin.is_high()?;
        Ok(u16::from(high != self.active_low))
    }

    fn max_raw(&self) -> u16 {
        1
    }
}

/// Relay (or lamp) on a GPIO output.
#[derive(Debug)]
pub struct GpioRelay<P> {
    pin: P,
    polarity: RelayPolarity,
}

impl<P: OutputPin> GpioRelay<P> {
    /// Wrap an output pin.
    ///
    /// The pin is not touched until the first [`set_power`](RelayOutput::set_power).
    pub fn new(pin: P, polarity: RelayPolarity) -> Self {
        Self { pin, polarity }
    }

    /// Pin level that produces `power` under this relay's polarity.
    pub fn level_for(&self, power: Power) -> PinState {
        match (power, self.polarity) {
            (Power::On, RelayPolarity::ActiveHigh) | (Power::Off, RelayPolarity::ActiveLow) => {
                PinState::High
            }
            (Power::On, RelayPolarity::ActiveLow) | (Power::Off, RelayPolarity::ActiveHigh) => {
                PinState::Low
            }
        }
    }

    /// Release the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> RelayOutput for GpioRelay<P> {
    type Error = P::Error;

    fn set_power(&mut self, power: Power) -> Result<(), Self::Error> {
        let level = self.level_for(power);
        self.pin.set_state(level)
    }
}
