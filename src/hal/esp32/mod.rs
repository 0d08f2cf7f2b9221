//! ESP32-C3 SuperMini hardware abstraction layer for point control.
//!
//! Digital sensors and relay outputs go through the generic
//! [`DigitalSensor`](crate::hal::DigitalSensor) and
//! [`GpioRelay`](crate::hal::GpioRelay) adapters, since `PinDriver`
//! implements the `embedded-hal` 1.0 pin traits. This module adds what is
//! specific to the chip: the ADC and the system timer.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Relays**: 4-channel opto-isolated relay module (active low)
//! - **Point sensors**: Hall-effect (analog) or microswitch (digital)
//! - **Crossing**: IR occupancy detectors, two LED lamps
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod analog;
mod clock;

pub use analog::{Esp32AnalogSensor, ADC_MAX_RAW};
pub use clock::Esp32Clock;

/// Pin assignments for SuperMini ESP32-C3.
///
/// - Crossover sensor on ADC1 (GPIO0)
/// - Y-branch microswitch on GPIO1
/// - Relays on GPIO2-5
/// - Crossing detectors on GPIO6/7, lamps on GPIO10/21
pub mod pins {
    // =========================================================================
    // Crossover (coacting pair)
    // =========================================================================

    /// Crossover position sensor (ADC1 channel 0)
    pub const XOVER_SENSE: i32 = 0;

    /// Crossover relay, first point motor
    pub const XOVER_RELAY_1: i32 = 2;

    /// Crossover relay, second point motor
    pub const XOVER_RELAY_2: i32 = 3;

    // =========================================================================
    // Y-Branch
    // =========================================================================

    /// Y-branch microswitch (pull-up, closes to GND)
    pub const BRANCH_SENSE: i32 = 1;

    /// Y-branch relay feeding leg A
    pub const BRANCH_RELAY_A: i32 = 4;

    /// Y-branch relay feeding leg B
    pub const BRANCH_RELAY_B: i32 = 5;

    // =========================================================================
    // Level Crossing
    // =========================================================================

    /// West approach detector (active low)
    pub const CROSSING_WEST: i32 = 6;

    /// East approach detector (active low)
    pub const CROSSING_EAST: i32 = 7;

    /// First flasher lamp
    pub const LAMP_A: i32 = 10;

    /// Second flasher lamp (U0TXD, free when using USB-CDC console)
    pub const LAMP_B: i32 = 21;
}
