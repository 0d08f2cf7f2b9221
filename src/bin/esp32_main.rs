//! ESP32-C3 SuperMini point and crossing controller.
//!
//! This is the main entry point for the layout board. It runs a fixed-rate
//! loop that:
//! - Samples the crossover and Y-branch position sensors
//! - Drives the point relays once a new position has settled
//! - Runs the level crossing flasher from two occupancy detectors
//! - Logs every change and a periodic status line
//!
//! # Hardware Setup
//!
//! See [`rs_points::hal::esp32::pins`] for the wiring.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//! espflash flash --monitor target/riscv32imc-esp-espidf/release/esp32_main
//! ```

use esp_idf_hal::adc::oneshot::AdcDriver;
use esp_idf_hal::gpio::{
    AnyInputPin, AnyOutputPin, Input, InputPin, Output, OutputPin, PinDriver, Pull,
};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use log::info;
use rs_points::config::{CrossingConfig, DeviceConfig, LoopConfig};
use rs_points::hal::esp32::{Esp32AnalogSensor, Esp32Clock};
use rs_points::hal::{DigitalSensor, GpioRelay, LogSink};
use rs_points::traits::{Clock, EventSink};
use rs_points::{
    AnyPoint, Config, CrossingController, Event, PointConfig, PointController, PointRegistry,
};
use std::thread;
use std::time::Duration;

type Relay<'d> = GpioRelay<PinDriver<'d, AnyOutputPin, Output>>;
type Detector<'d> = DigitalSensor<PinDriver<'d, AnyInputPin, Input>>;

fn relay<'d>(pin: AnyOutputPin, config: &Config) -> anyhow::Result<Relay<'d>> {
    Ok(GpioRelay::new(PinDriver::output(pin)?, config.relay_polarity))
}

fn detector<'d>(pin: AnyInputPin) -> anyhow::Result<Detector<'d>> {
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(Pull::Up)?;
    Ok(DigitalSensor::active_low(driver))
}

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = Config::default()
        .with_device(DeviceConfig::default().with_name("rs-points yard"))
        .with_timing(LoopConfig::default().with_status_interval_ms(30_000))
        .with_crossing(
            CrossingConfig::default()
                .with_label("station crossing")
                .with_release_timeout_ms(15_000),
        );

    info!("================================");
    info!("  {}", config.device.name);
    info!("================================");

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // =========================================================================
    // Crossover (Hall sensor on GPIO0, relays on GPIO2/3)
    // =========================================================================
    let adc1 = AdcDriver::new(peripherals.adc1)?;
    let xover = PointController::new(
        &PointConfig::coacting("crossover").with_threshold(2048, 80),
        Esp32AnalogSensor::new(&adc1, pins.gpio0)?,
        relay(pins.gpio2.downgrade_output(), &config)?,
        relay(pins.gpio3.downgrade_output(), &config)?,
    );
    info!("[OK] Crossover initialized (GPIO0 ADC, relays GPIO2/3)");

    // =========================================================================
    // Y-Branch (microswitch on GPIO1, relays on GPIO4/5)
    // =========================================================================
    let branch = PointController::new(
        &PointConfig::y_branch("yard branch").digital(),
        detector(pins.gpio1.downgrade_input())?,
        relay(pins.gpio4.downgrade_output(), &config)?,
        relay(pins.gpio5.downgrade_output(), &config)?,
    );
    info!("[OK] Y-branch initialized (GPIO1, relays GPIO4/5)");

    let points: Vec<AnyPoint> = vec![Box::new(xover), Box::new(branch)];
    let mut registry =
        PointRegistry::new(points).with_status_interval(config.timing.status_interval_ms);

    // =========================================================================
    // Level Crossing (detectors on GPIO6/7, lamps on GPIO10/21)
    // =========================================================================
    let mut crossing = CrossingController::new(
        &config.crossing,
        detector(pins.gpio6.downgrade_input())?,
        detector(pins.gpio7.downgrade_input())?,
        relay(pins.gpio10.downgrade_output(), &config)?,
        relay(pins.gpio21.downgrade_output(), &config)?,
    );
    info!("[OK] Crossing initialized (GPIO6/7, lamps GPIO10/21)");

    // =========================================================================
    // Initialize Clock and Controllers
    // =========================================================================
    let clock = Esp32Clock::new();
    let mut sink = LogSink::new();

    let now = clock.now_ms();
    registry.init(now, &mut sink);
    if let Err(e) = crossing.init(now, &mut sink) {
        sink.emit(&Event::output_fault(crossing.label(), &e));
    }

    info!(
        "Starting control loop ({}ms tick)...",
        config.timing.tick_interval_ms
    );

    // =========================================================================
    // Main Control Loop
    // =========================================================================
    loop {
        let now = clock.now_ms();

        registry.tick(now, &mut sink);

        if let Err(e) = crossing.update(now, &mut sink) {
            sink.emit(&Event::output_fault(crossing.label(), &e));
        }

        // Sleep until next tick
        thread::sleep(Duration::from_millis(u64::from(
            config.timing.tick_interval_ms,
        )));
    }
}
