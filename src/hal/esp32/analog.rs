//! Analog point sensor via the ESP32 ADC.
//!
//! Hall-effect and potentiometer position sensors output a voltage that
//! moves with the point blades. The one-shot ADC driver samples it at 12
//! bits, so raw readings span `0..=4095`.
//!
//! # Wiring
//!
//! - Sensor output → any ADC1 pin (GPIO0-4 on the ESP32-C3)
//! - Sensor VCC → 3.3V, GND → GND
//!
//! Note: GPIO5 is on ADC2, which is shared with the radio. Keep point
//! sensors on ADC1.

use crate::traits::SensorInput;
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::gpio::ADCPin;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

/// Full-scale reading of the 12-bit one-shot ADC.
pub const ADC_MAX_RAW: u16 = 4095;

/// Point sensor on an ADC channel.
///
/// # Example
///
/// ```ignore
/// use rs_points::hal::esp32::Esp32AnalogSensor;
///
/// let peripherals = Peripherals::take()?;
/// let adc1 = AdcDriver::new(peripherals.adc1)?;
/// let sensor = Esp32AnalogSensor::new(&adc1, peripherals.pins.gpio0)?;
/// ```
pub struct Esp32AnalogSensor<'d, T: ADCPin> {
    channel: AdcChannelDriver<'d, T, &'d AdcDriver<'d, T::Adc>>,
}

impl<'d, T: ADCPin> Esp32AnalogSensor<'d, T> {
    /// Creates a sensor on `pin`, sharing the ADC driver `adc`.
    ///
    /// # Errors
    ///
    /// Returns an error if ADC channel initialization fails.
    pub fn new(
        adc: &'d AdcDriver<'d, T::Adc>,
        pin: impl Peripheral<P = T> + 'd,
    ) -> Result<Self, EspError> {
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(adc, pin, &config)?;
        Ok(Self { channel })
    }
}

impl<T: ADCPin> SensorInput for Esp32AnalogSensor<'_, T> {
    type Error = EspError;

    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(self.channel.read()?.min(ADC_MAX_RAW))
    }

    fn max_raw(&self) -> u16 {
        ADC_MAX_RAW
    }
}
