//! Rate-limited sampling of one sensor input.
//!
//! [`SensorChannel`] owns a [`SensorInput`] and decides *when* it is read.
//! It never interprets the value; see [`crate::threshold`] for that.
//!
//! # Example
//!
//! ```rust
//! use rs_points::sensor::SensorChannel;
//! use rs_points::hal::MockSensor;
//!
//! let mut channel = SensorChannel::new(MockSensor::analog(300), 10);
//! assert_eq!(channel.force_sample(0), 300);
//!
//! channel.input_mut().set(700);
//! assert_eq!(channel.sample(5), 300);  // too soon, hardware untouched
//! assert_eq!(channel.sample(10), 700); // interval elapsed
//! ```

use crate::time::{has_elapsed, Millis};
use crate::traits::SensorInput;

/// One physical sensing input with a minimum sampling interval.
#[derive(Debug)]
pub struct SensorChannel<S: SensorInput> {
    input: S,
    min_interval_ms: Millis,
    last_raw: u16,
    last_sample_at: Millis,
    sampled: bool,
    read_failures: u32,
}

impl<S: SensorInput> SensorChannel<S> {
    /// Create a channel that reads `input` at most once per `min_interval_ms`.
    pub fn new(input: S, min_interval_ms: Millis) -> Self {
        Self {
            input,
            min_interval_ms,
            last_raw: 0,
            last_sample_at: 0,
            sampled: false,
            read_failures: 0,
        }
    }

    /// Returns a fresh reading if the sampling interval has elapsed,
    /// otherwise the stored one.
    ///
    /// A channel that has never been sampled reads immediately.
    pub fn sample(&mut self, now: Millis) -> u16 {
        if self.sampled && !has_elapsed(now, self.last_sample_at, self.min_interval_ms) {
            return self.last_raw;
        }
        self.force_sample(now)
    }

    /// Reads the input regardless of the sampling interval.
    ///
    /// On a read error the previous value is returned and the sample
    /// timestamp is left alone, so the next tick tries again.
    pub fn force_sample(&mut self, now: Millis) -> u16 {
        match self.input.read() {
            Ok(raw) => {
                self.last_raw = raw;
                self.last_sample_at = now;
                self.sampled = true;
            }
            Err(_) => {
                self.read_failures = self.read_failures.saturating_add(1);
            }
        }
        self.last_raw
    }

    /// Last stored raw value.
    #[inline]
    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }

    /// Timestamp of the last successful read, if any.
    pub fn last_sample_at(&self) -> Option<Millis> {
        self.sampled.then_some(self.last_sample_at)
    }

    /// Minimum interval between hardware reads.
    #[inline]
    pub fn min_interval_ms(&self) -> Millis {
        self.min_interval_ms
    }

    /// Number of failed reads since construction.
    #[inline]
    pub fn read_failures(&self) -> u32 {
        self.read_failures
    }

    /// Full-scale value of the underlying input.
    #[inline]
    pub fn max_raw(&self) -> u16 {
        self.input.max_raw()
    }

    /// Borrow the underlying input.
    pub fn input(&self) -> &S {
        &self.input
    }

    /// Mutably borrow the underlying input.
    pub fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockSensor;

    #[test]
    fn first_sample_reads_immediately() {
        let mut channel = SensorChannel::new(MockSensor::analog(512), 100);
        assert_eq!(channel.last_sample_at(), None);
        assert_eq!(channel.sample(3), 512);
        assert_eq!(channel.last_sample_at(), Some(3));
        assert_eq!(channel.input().reads, 1);
    }

    #[test]
    fn sample_respects_interval() {
        let mut channel = SensorChannel::new(MockSensor::analog(100), 10);
        channel.sample(0);

        channel.input_mut().set(900);
        assert_eq!(channel.sample(9), 100);
        assert_eq!(channel.input().reads, 1);

        assert_eq!(channel.sample(10), 900);
        assert_eq!(channel.input().reads, 2);
        assert_eq!(channel.last_sample_at(), Some(10));
    }

    #[test]
    fn force_sample_ignores_interval() {
        let mut channel = SensorChannel::new(MockSensor::analog(100), 1000);
        channel.sample(0);
        channel.input_mut().set(200);
        assert_eq!(channel.force_sample(1), 200);
    }

    #[test]
    fn read_failure_keeps_last_value() {
        let mut channel = SensorChannel::new(MockSensor::analog(400), 10);
        channel.sample(0);

        channel.input_mut().fail_next(1);
        channel.input_mut().set(800);
        assert_eq!(channel.sample(10), 400);
        assert_eq!(channel.read_failures(), 1);
        assert_eq!(channel.last_sample_at(), Some(0));

        // Retried on the very next tick
        assert_eq!(channel.sample(11), 800);
    }

    #[test]
    fn interval_survives_timer_wrap() {
        let start = u32::MAX - 4;
        let mut channel = SensorChannel::new(MockSensor::analog(1), 10);
        channel.sample(start);
        channel.input_mut().set(2);

        assert_eq!(channel.sample(4), 1); // 9ms after start
        assert_eq!(channel.sample(5), 2); // 10ms after start
    }
}
