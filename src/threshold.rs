//! Hysteresis comparator turning a raw reading into a [`SensorLevel`].
//!
//! The band `[lower, upper]` around the threshold is sticky: a reading inside
//! it always keeps the prior level. To move from `Low` to `High` a reading has
//! to go strictly above `upper`; to move back it has to go strictly below
//! `lower`.
//!
//! ```text
//!   raw:  0 ........ lower ==== threshold ==== upper ........ max_raw
//!         always Low  |<------ keeps prior level ------>|  always High
//! ```
//!
//! With zero hysteresis this is a plain comparator: `raw > threshold` is
//! `High`, anything else `Low`.
//!
//! # Example
//!
//! ```rust
//! use rs_points::threshold::Threshold;
//! use rs_points::SensorLevel;
//!
//! let t = Threshold::new(512, 20, 1023);
//! assert_eq!((t.lower(), t.upper()), (492, 532));
//!
//! assert_eq!(t.interpret(520, SensorLevel::Low), SensorLevel::Low);
//! assert_eq!(t.interpret(533, SensorLevel::Low), SensorLevel::High);
//! assert_eq!(t.interpret(500, SensorLevel::High), SensorLevel::High);
//! assert_eq!(t.interpret(491, SensorLevel::High), SensorLevel::Low);
//! ```

use crate::traits::SensorLevel;

/// A decision threshold with a hysteresis half-width, in raw sensor units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Threshold {
    threshold: u16,
    hysteresis: u16,
    max_raw: u16,
}

impl Threshold {
    /// Create a threshold for a sensor whose readings span `0..=max_raw`.
    ///
    /// The centre is clamped into the sensor range.
    pub fn new(threshold: u16, hysteresis: u16, max_raw: u16) -> Self {
        Self {
            threshold: threshold.min(max_raw),
            hysteresis,
            max_raw,
        }
    }

    /// Plain comparator for a binary input: 1 is `High`, 0 is `Low`.
    pub const fn digital() -> Self {
        Self {
            threshold: 0,
            hysteresis: 0,
            max_raw: 1,
        }
    }

    /// Centre threshold.
    #[inline]
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    /// Hysteresis half-width.
    #[inline]
    pub fn hysteresis(&self) -> u16 {
        self.hysteresis
    }

    /// Full-scale sensor value.
    #[inline]
    pub fn max_raw(&self) -> u16 {
        self.max_raw
    }

    /// Lower edge of the sticky band, clamped at 0.
    #[inline]
    pub fn lower(&self) -> u16 {
        self.threshold.saturating_sub(self.hysteresis)
    }

    /// Upper edge of the sticky band, clamped at `max_raw`.
    #[inline]
    pub fn upper(&self) -> u16 {
        self.threshold
            .saturating_add(self.hysteresis)
            .min(self.max_raw)
    }

    /// Interpret `raw` given the currently accepted level.
    ///
    /// Zero hysteresis has no band to hold, so `prior` is ignored and the
    /// reading is compared against the centre alone.
    pub fn interpret(&self, raw: u16, prior: SensorLevel) -> SensorLevel {
        if self.hysteresis == 0 {
            return self.classify(raw);
        }
        let raw = raw.min(self.max_raw);
        match prior {
            SensorLevel::Low if raw > self.upper() => SensorLevel::High,
            SensorLevel::High if raw < self.lower() => SensorLevel::Low,
            _ => prior,
        }
    }

    /// Level for a first reading with no history.
    ///
    /// Readings inside the band resolve by which side of the centre they fall.
    pub fn classify(&self, raw: u16) -> SensorLevel {
        if raw.min(self.max_raw) > self.threshold {
            SensorLevel::High
        } else {
            SensorLevel::Low
        }
    }
}
