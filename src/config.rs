//! Controller configuration for the point, crossing and loop settings.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_points::config::{Config, LoopConfig, PointConfig, RelayPolarity};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.relay_polarity, RelayPolarity::ActiveLow);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_timing(LoopConfig::default().with_tick_interval_ms(2))
//!     .with_relay_polarity(RelayPolarity::ActiveHigh);
//!
//! let point = PointConfig::y_branch("fiddle yard")
//!     .with_threshold(600, 25)
//!     .with_stable_ms(80);
//! assert_eq!(point.label.as_str(), "fiddle yard");
//! ```

use heapless::String as HString;

use crate::point::PointKind;
use crate::threshold::Threshold;
use crate::time::Millis;
use crate::traits::SensorLevel;

/// Maximum length for labels and names
pub const MAX_SHORT_STRING: usize = 32;

/// Type alias for labels and names
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating at a character boundary if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete board configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Device identification
    pub device: DeviceConfig,
    /// Loop driver timing
    pub timing: LoopConfig,
    /// Crossing-light controller settings
    pub crossing: CrossingConfig,
    /// How logical relay power maps to pin levels on this board
    pub relay_polarity: RelayPolarity,
}

impl Config {
    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Set loop timing configuration
    pub fn with_timing(mut self, timing: LoopConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set crossing configuration
    pub fn with_crossing(mut self, crossing: CrossingConfig) -> Self {
        self.crossing = crossing;
        self
    }

    /// Set relay polarity
    pub fn with_relay_polarity(mut self, polarity: RelayPolarity) -> Self {
        self.relay_polarity = polarity;
        self
    }
}

// ============================================================================
// Relay Polarity
// ============================================================================

/// Pin level that energises a relay (or lights a lamp).
///
/// Most opto-isolated relay boards are active low.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RelayPolarity {
    /// Pin high = power on
    ActiveHigh,
    /// Pin low = power on
    #[default]
    ActiveLow,
}

// ============================================================================
// Point Config
// ============================================================================

/// Configuration for one point controller
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointConfig {
    /// Label shown in diagnostics
    pub label: ShortString,
    /// Coacting crossover or Y-branch, with sensor polarity
    pub kind: PointKind,
    /// Centre threshold in raw sensor units
    pub threshold: u16,
    /// Hysteresis half-width in raw sensor units
    pub hysteresis: u16,
    /// Minimum interval between sensor reads in milliseconds
    pub sample_interval_ms: Millis,
    /// How long a new reading must hold before it is accepted
    pub stable_ms: Millis,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            label: short_string("point"),
            kind: PointKind::Coacting {
                active_when: SensorLevel::High,
            },
            threshold: 512,
            hysteresis: 20,
            sample_interval_ms: 10,
            stable_ms: 50,
        }
    }
}

impl PointConfig {
    /// Coacting crossover, active when the sensor reads high
    pub fn coacting(label: &str) -> Self {
        Self::default().with_label(label)
    }

    /// Y-branch routing to feed B when the sensor reads high
    pub fn y_branch(label: &str) -> Self {
        Self::default()
            .with_label(label)
            .with_kind(PointKind::YBranch {
                feed_b_when: SensorLevel::High,
            })
    }

    /// Set the label
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = short_string(label);
        self
    }

    /// Set the point kind
    pub fn with_kind(mut self, kind: PointKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set threshold and hysteresis
    pub fn with_threshold(mut self, threshold: u16, hysteresis: u16) -> Self {
        self.threshold = threshold;
        self.hysteresis = hysteresis;
        self
    }

    /// Configure for a binary sensor (plain comparator, no hysteresis)
    pub fn digital(self) -> Self {
        self.with_threshold(0, 0)
    }

    /// Set the sampling interval
    pub fn with_sample_interval_ms(mut self, ms: Millis) -> Self {
        self.sample_interval_ms = ms;
        self
    }

    /// Set the debounce stable duration
    pub fn with_stable_ms(mut self, ms: Millis) -> Self {
        self.stable_ms = ms;
        self
    }

    /// Build the comparator for a sensor spanning `0..=max_raw`
    pub fn threshold_for(&self, max_raw: u16) -> Threshold {
        Threshold::new(self.threshold, self.hysteresis, max_raw)
    }
}

// ============================================================================
// Crossing Config
// ============================================================================

/// Crossing-light controller configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossingConfig {
    /// Label shown in diagnostics
    pub label: ShortString,
    /// Occupancy threshold in raw sensor units (0 for binary detectors)
    pub occupancy_threshold: u16,
    /// Occupancy hysteresis half-width
    pub occupancy_hysteresis: u16,
    /// Occupancy debounce stable duration in milliseconds
    pub debounce_ms: Millis,
    /// Minimum interval between occupancy sensor reads
    pub sample_interval_ms: Millis,
    /// Release after the near side clears if the far side is never seen
    pub release_timeout_ms: Millis,
    /// Lamp alternation period in milliseconds
    pub flash_interval_ms: Millis,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            label: short_string("crossing"),
            occupancy_threshold: 0,
            occupancy_hysteresis: 0,
            debounce_ms: 50,
            sample_interval_ms: 10,
            release_timeout_ms: 10_000,
            flash_interval_ms: 500,
        }
    }
}

impl CrossingConfig {
    /// Set the label
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = short_string(label);
        self
    }

    /// Set the occupancy threshold for analog detectors
    pub fn with_occupancy_threshold(mut self, threshold: u16, hysteresis: u16) -> Self {
        self.occupancy_threshold = threshold;
        self.occupancy_hysteresis = hysteresis;
        self
    }

    /// Build the occupancy comparator for a detector spanning `0..=max_raw`
    pub fn threshold_for(&self, max_raw: u16) -> Threshold {
        Threshold::new(self.occupancy_threshold, self.occupancy_hysteresis, max_raw)
    }

    /// Set the occupancy debounce duration
    pub fn with_debounce_ms(mut self, ms: Millis) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Set the occupancy sampling interval
    pub fn with_sample_interval_ms(mut self, ms: Millis) -> Self {
        self.sample_interval_ms = ms;
        self
    }

    /// Set the fail-safe release timeout
    pub fn with_release_timeout_ms(mut self, ms: Millis) -> Self {
        self.release_timeout_ms = ms;
        self
    }

    /// Set the flash interval (clamped to at least 1ms)
    pub fn with_flash_interval_ms(mut self, ms: Millis) -> Self {
        self.flash_interval_ms = ms.max(1);
        self
    }
}

// ============================================================================
// Loop Config
// ============================================================================

/// Loop driver timing
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopConfig {
    /// Sleep between ticks in milliseconds
    pub tick_interval_ms: Millis,
    /// Status summary period in milliseconds (0 = never)
    pub status_interval_ms: Millis,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 5,
            status_interval_ms: 10_000,
        }
    }
}

impl LoopConfig {
    /// Set the tick interval
    pub fn with_tick_interval_ms(mut self, ms: Millis) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Set the status summary interval
    pub fn with_status_interval_ms(mut self, ms: Millis) -> Self {
        self.status_interval_ms = ms;
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable board name
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-points"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.device.name.as_str(), "rs-points");
        assert_eq!(config.timing.tick_interval_ms, 5);
        assert_eq!(config.crossing.release_timeout_ms, 10_000);
        assert_eq!(config.crossing.flash_interval_ms, 500);
        assert_eq!(config.relay_polarity, RelayPolarity::ActiveLow);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_device(DeviceConfig::default().with_name("Station throat"))
            .with_timing(LoopConfig::default().with_status_interval_ms(0))
            .with_crossing(CrossingConfig::default().with_release_timeout_ms(5000))
            .with_relay_polarity(RelayPolarity::ActiveHigh);

        assert_eq!(config.device.name.as_str(), "Station throat");
        assert_eq!(config.timing.status_interval_ms, 0);
        assert_eq!(config.crossing.release_timeout_ms, 5000);
        assert_eq!(config.relay_polarity, RelayPolarity::ActiveHigh);
    }

    // =========================================================================
    // PointConfig Tests
    // =========================================================================

    #[test]
    fn point_config_default() {
        let point = PointConfig::default();
        assert_eq!(point.threshold, 512);
        assert_eq!(point.hysteresis, 20);
        assert_eq!(point.sample_interval_ms, 10);
        assert_eq!(point.stable_ms, 50);
        assert!(matches!(point.kind, PointKind::Coacting { .. }));
    }

    #[test]
    fn point_config_constructors() {
        let xover = PointConfig::coacting("xover 1");
        assert_eq!(xover.label.as_str(), "xover 1");
        assert_eq!(
            xover.kind,
            PointKind::Coacting {
                active_when: SensorLevel::High
            }
        );

        let branch = PointConfig::y_branch("loop entry");
        assert_eq!(
            branch.kind,
            PointKind::YBranch {
                feed_b_when: SensorLevel::High
            }
        );
    }

    #[test]
    fn point_config_digital() {
        let point = PointConfig::coacting("switch").digital();
        let threshold = point.threshold_for(1);
        assert_eq!(threshold, Threshold::digital());
    }

    #[test]
    fn point_config_threshold_for_clamps() {
        let point = PointConfig::default().with_threshold(1010, 30);
        let threshold = point.threshold_for(1023);
        assert_eq!(threshold.upper(), 1023);
        assert_eq!(threshold.lower(), 980);
    }

    // =========================================================================
    // CrossingConfig Tests
    // =========================================================================

    #[test]
    fn crossing_config_builder() {
        let crossing = CrossingConfig::default()
            .with_label("level crossing")
            .with_debounce_ms(100)
            .with_sample_interval_ms(20)
            .with_flash_interval_ms(0);

        assert_eq!(crossing.label.as_str(), "level crossing");
        assert_eq!(crossing.debounce_ms, 100);
        assert_eq!(crossing.sample_interval_ms, 20);
        assert_eq!(crossing.flash_interval_ms, 1);
    }

    #[test]
    fn crossing_config_occupancy_threshold() {
        let binary = CrossingConfig::default();
        assert_eq!(binary.threshold_for(1), Threshold::digital());

        let analog = CrossingConfig::default().with_occupancy_threshold(300, 15);
        let threshold = analog.threshold_for(1023);
        assert_eq!((threshold.lower(), threshold.upper()), (285, 315));
    }

    // =========================================================================
    // String Helper Tests
    // =========================================================================

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert_eq!(s.len(), MAX_SHORT_STRING);
    }

    #[test]
    fn short_string_utf8_boundary() {
        let input = "\u{1F682}".repeat(10); // 4 bytes each
        let s = short_string(&input);
        assert!(s.len() <= MAX_SHORT_STRING);
        assert_eq!(s.chars().count(), 8);
    }
}
