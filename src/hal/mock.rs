//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware traits and the event
//! sink, enabling development and testing on desktop without a layout.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockSensor`] | [`SensorInput`] | Settable reading, injectable read failures |
//! | [`MockRelay`] | [`RelayOutput`] | Records every write with a global sequence number |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//! | [`RecordingSink`] | [`EventSink`] | Captures emitted events |
//!
//! # Example
//!
//! ```rust
//! use rs_points::{PointConfig, PointController};
//! use rs_points::hal::{MockRelay, MockSensor, RecordingSink};
//!
//! let config = PointConfig::coacting("xover");
//! let mut point = PointController::new(
//!     &config,
//!     MockSensor::analog(800),
//!     MockRelay::new(),
//!     MockRelay::new(),
//! );
//! let mut sink = RecordingSink::new();
//! point.init(0, &mut sink).unwrap();
//!
//! assert_eq!(sink.changes().count(), 1);
//! assert_eq!(point.first_relay().writes.len(), 1);
//! ```
//!
//! [`SensorInput`]: crate::traits::SensorInput
//! [`RelayOutput`]: crate::traits::RelayOutput
//! [`Clock`]: crate::traits::Clock
//! [`EventSink`]: crate::traits::EventSink

extern crate alloc;

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::events::{Event, PointChange};
use crate::time::Millis;
use crate::traits::{Clock, EventSink, Power, RelayOutput, SensorInput};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock point sensor.
///
/// Returns whatever value was last [`set`](Self::set). Read failures can be
/// queued with [`fail_next`](Self::fail_next).
///
/// # Example
///
/// ```rust
/// use rs_points::hal::MockSensor;
/// use rs_points::traits::SensorInput;
///
/// let mut sensor = MockSensor::digital(true);
/// assert_eq!(sensor.max_raw(), 1);
/// assert_eq!(sensor.read(), Ok(1));
///
/// sensor.fail_next(1);
/// assert!(sensor.read().is_err());
/// assert_eq!(sensor.read(), Ok(1));
/// assert_eq!(sensor.reads, 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockSensor {
    /// Value returned by the next successful read.
    pub value: u16,
    /// Full-scale value.
    pub max_raw: u16,
    /// Number of successful reads.
    pub reads: usize,
    failures_pending: usize,
}

impl MockSensor {
    /// 10-bit analog sensor reading `value`.
    pub fn analog(value: u16) -> Self {
        Self {
            value,
            max_raw: 1023,
            reads: 0,
            failures_pending: 0,
        }
    }

    /// Binary sensor.
    pub fn digital(high: bool) -> Self {
        Self {
            value: high as u16,
            max_raw: 1,
            reads: 0,
            failures_pending: 0,
        }
    }

    /// Change the reading.
    pub fn set(&mut self, value: u16) {
        self.value = value;
    }

    /// Change a binary reading.
    pub fn set_high(&mut self, high: bool) {
        self.value = high as u16;
    }

    /// Make the next `count` reads fail.
    pub fn fail_next(&mut self, count: usize) {
        self.failures_pending = count;
    }
}

impl SensorInput for MockSensor {
    type Error = ();

    fn read(&mut self) -> Result<u16, ()> {
        if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(());
        }
        self.reads += 1;
        Ok(self.value)
    }

    fn max_raw(&self) -> u16 {
        self.max_raw
    }
}

static WRITE_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Mock relay output.
///
/// Records every successful write along with a sequence number that is
/// shared by all mock relays, so tests can check write ordering across a
/// pair.
///
/// # Example
///
/// ```rust
/// use rs_points::hal::MockRelay;
/// use rs_points::traits::{Power, RelayOutput};
///
/// let mut relay = MockRelay::new();
/// relay.set_power(Power::On).unwrap();
/// relay.power_off().unwrap();
///
/// assert_eq!(relay.power, Some(Power::Off));
/// assert_eq!(relay.writes.len(), 2);
/// assert!(relay.writes[0].1 < relay.writes[1].1);
/// ```
#[derive(Debug, Default)]
pub struct MockRelay {
    /// Last value written, `None` if never written.
    pub power: Option<Power>,
    /// Every successful write with its global sequence number.
    pub writes: Vec<(Power, u32)>,
    failures_pending: usize,
}

impl MockRelay {
    /// Creates a relay that has never been written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` writes fail.
    pub fn fail_next(&mut self, count: usize) {
        self.failures_pending = count;
    }

    /// True if the relay is currently powered.
    pub fn is_on(&self) -> bool {
        self.power == Some(Power::On)
    }
}

impl RelayOutput for MockRelay {
    type Error = ();

    fn set_power(&mut self, power: Power) -> Result<(), ()> {
        if self.failures_pending > 0 {
            self.failures_pending -= 1;
            return Err(());
        }
        self.power = Some(power);
        let seq = WRITE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.writes.push((power, seq));
        Ok(())
    }
}

/// Mock clock for testing.
///
/// Provides a controllable time source for testing time-dependent behavior.
///
/// # Example
///
/// ```rust
/// use rs_points::hal::MockClock;
/// use rs_points::traits::Clock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
///
/// clock.set(u32::MAX);
/// clock.advance(2);
/// assert_eq!(clock.now_ms(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    current_ms: Millis,
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self { current_ms: 0 }
    }

    /// Sets the current time in milliseconds.
    pub fn set(&mut self, ms: Millis) {
        self.current_ms = ms;
    }

    /// Advances the clock, wrapping like a hardware counter.
    pub fn advance(&mut self, ms: Millis) {
        self.current_ms = self.current_ms.wrapping_add(ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> Millis {
        self.current_ms
    }
}

// ============================================================================
// Sink Mocks
// ============================================================================

/// Event sink that keeps every event for inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Events in emission order.
    pub events: Vec<Event>,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point change notifications in emission order.
    pub fn changes(&self) -> impl Iterator<Item = &PointChange> {
        self.events.iter().filter_map(|e| match e {
            Event::PointChanged(change) => Some(change),
            _ => None,
        })
    }

    /// Point change notifications for one label.
    pub fn changes_for<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a PointChange> {
        self.changes().filter(move |c| c.label.as_str() == label)
    }

    /// Drops everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::short_string;

    // =========================================================================
    // MockSensor Tests
    // =========================================================================

    #[test]
    fn mock_sensor_analog() {
        let mut sensor = MockSensor::analog(321);
        assert_eq!(sensor.max_raw(), 1023);
        assert_eq!(sensor.read(), Ok(321));
        sensor.set(5);
        assert_eq!(sensor.read(), Ok(5));
        assert_eq!(sensor.reads, 2);
    }

    #[test]
    fn mock_sensor_digital() {
        let mut sensor = MockSensor::digital(false);
        assert_eq!(sensor.read(), Ok(0));
        sensor.set_high(true);
        assert_eq!(sensor.read(), Ok(1));
    }

    #[test]
    fn mock_sensor_failures_do_not_count_as_reads() {
        let mut sensor = MockSensor::analog(1);
        sensor.fail_next(2);
        assert!(sensor.read().is_err());
        assert!(sensor.read().is_err());
        assert_eq!(sensor.reads, 0);
        assert_eq!(sensor.read(), Ok(1));
    }

    // =========================================================================
    // MockRelay Tests
    // =========================================================================

    #[test]
    fn mock_relay_default() {
        let relay = MockRelay::new();
        assert!(relay.power.is_none());
        assert!(relay.writes.is_empty());
        assert!(!relay.is_on());
    }

    #[test]
    fn mock_relay_failure_leaves_state() {
        let mut relay = MockRelay::new();
        relay.set_power(Power::On).unwrap();
        relay.fail_next(1);
        assert!(relay.set_power(Power::Off).is_err());
        assert!(relay.is_on());
        assert_eq!(relay.writes.len(), 1);
    }

    #[test]
    fn mock_relay_sequence_orders_across_relays() {
        let mut a = MockRelay::new();
        let mut b = MockRelay::new();
        a.set_power(Power::Off).unwrap();
        b.set_power(Power::On).unwrap();
        assert!(a.writes[0].1 < b.writes[0].1);
    }

    // =========================================================================
    // MockClock Tests
    // =========================================================================

    #[test]
    fn mock_clock_advance() {
        let mut clock = MockClock::new();
        clock.advance(500);
        assert_eq!(clock.now_ms(), 500);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 750);
    }

    #[test]
    fn mock_clock_wraps() {
        let mut clock = MockClock::new();
        clock.set(u32::MAX - 1);
        clock.advance(3);
        assert_eq!(clock.now_ms(), 1);
    }

    // =========================================================================
    // RecordingSink Tests
    // =========================================================================

    #[test]
    fn recording_sink_filters_changes() {
        let mut sink = RecordingSink::new();
        sink.emit(&Event::Ready { points: 2 });
        sink.emit(&Event::OutputFault {
            label: short_string("a"),
            reason: short_string("()"),
        });
        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.changes().count(), 0);

        sink.clear();
        assert!(sink.events.is_empty());
    }
}
