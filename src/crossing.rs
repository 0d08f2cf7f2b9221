//! Level crossing flasher driven by two occupancy detectors.
//!
//! The crossing watches one detector on each approach (west and east). It
//! starts flashing as soon as either side sees a train and keeps flashing
//! until the train has been seen on the far side and both sides are clear
//! again.
//!
//! A train that backs out, or a far detector that never fires, would leave
//! the lights on forever. To guard against that, once the near side clears
//! without the far side ever having been occupied, a fail-safe timer starts;
//! when it expires the crossing releases anyway.
//!
//! Each detector goes through the same [`SensorChannel`], [`Threshold`] and
//! [`DebounceGate`] stages as a point sensor.
//!
//! # State Machine
//!
//! ```text
//!            west or east occupied
//!   Idle ─────────────────────────────▶ Active { from, far_seen = false }
//!    ▲                                      │ far occupied
//!    │ both clear                           ▼
//!    ├──────────────────────────── Active { far_seen = true }
//!    │
//!    │ near clear for release_timeout (far never seen)
//!    └──────────────────────────── Active { far_seen = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use rs_points::crossing::{CrossingController, Side};
//! use rs_points::config::CrossingConfig;
//! use rs_points::hal::{MockRelay, MockSensor, RecordingSink};
//!
//! let config = CrossingConfig::default().with_debounce_ms(0);
//! let mut crossing = CrossingController::new(
//!     &config,
//!     MockSensor::digital(false),
//!     MockSensor::digital(false),
//!     MockRelay::new(),
//!     MockRelay::new(),
//! );
//! let mut sink = RecordingSink::new();
//! crossing.init(0, &mut sink).unwrap();
//! assert!(!crossing.is_active());
//!
//! crossing.west_mut().set_high(true);
//! crossing.update(10, &mut sink).unwrap();
//! assert_eq!(crossing.active_from(), Some(Side::West));
//! assert!(crossing.lamps().0.is_on());
//! ```

use crate::config::{CrossingConfig, ShortString};
use crate::debounce::DebounceGate;
use crate::events::Event;
use crate::sensor::SensorChannel;
use crate::threshold::Threshold;
use crate::time::{elapsed_ms, has_elapsed, Millis};
use crate::traits::{EventSink, Power, RelayOutput, SensorInput, SensorLevel};

/// Approach side of the crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// West approach.
    West,
    /// East approach.
    East,
}

impl Side {
    /// Returns the side as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Side::West => "west",
            Side::East => "east",
        }
    }
}

/// Why the crossing stopped flashing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReleaseReason {
    /// Train passed the far detector and both sides cleared.
    Cleared,
    /// Far detector never fired; fail-safe timer expired.
    Timeout,
}

/// Crossing controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossingState {
    /// Lights off.
    Idle,
    /// Lights flashing.
    Active {
        /// Side that triggered activation.
        from: Side,
        /// Far-side detector has been occupied since activation.
        far_seen: bool,
        /// When the near side cleared, while the fail-safe timer runs.
        near_cleared_at: Option<Millis>,
        /// Activation time, used to phase the flashing.
        since: Millis,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LampPhase {
    Dark,
    First,
    Second,
}

impl LampPhase {
    fn outputs(self) -> (Power, Power) {
        match self {
            LampPhase::Dark => (Power::Off, Power::Off),
            LampPhase::First => (Power::On, Power::Off),
            LampPhase::Second => (Power::Off, Power::On),
        }
    }
}

/// One debounced occupancy detector.
struct Occupancy<S: SensorInput> {
    channel: SensorChannel<S>,
    threshold: Threshold,
    gate: DebounceGate<bool>,
}

impl<S: SensorInput> Occupancy<S> {
    fn new(input: S, config: &CrossingConfig) -> Self {
        let threshold = config.threshold_for(input.max_raw());
        Self {
            channel: SensorChannel::new(input, config.sample_interval_ms),
            threshold,
            gate: DebounceGate::new(false, config.debounce_ms, 0),
        }
    }

    /// `None` until the detector has been read successfully.
    fn init(&mut self, now: Millis) -> Option<bool> {
        let raw = self.channel.force_sample(now);
        self.channel.last_sample_at()?;
        let occupied = self.threshold.classify(raw) == SensorLevel::High;
        self.gate.reset(occupied, now);
        Some(occupied)
    }

    fn update(&mut self, now: Millis) -> bool {
        let raw = self.channel.sample(now);
        let prior = if self.gate.accepted() {
            SensorLevel::High
        } else {
            SensorLevel::Low
        };
        let occupied = self.threshold.interpret(raw, prior) == SensorLevel::High;
        self.gate.accept(occupied, now).state
    }
}

/// Crossing flasher with west/east occupancy detectors and two lamps.
///
/// # Type Parameters
///
/// - `SW`, `SE`: West and east detectors ([`SensorInput`])
/// - `L`: Lamp outputs ([`RelayOutput`])
pub struct CrossingController<SW: SensorInput, SE: SensorInput, L: RelayOutput> {
    label: ShortString,
    west: Occupancy<SW>,
    east: Occupancy<SE>,
    lamp_a: L,
    lamp_b: L,
    state: CrossingState,
    lamps: Option<LampPhase>,
    flash_interval_ms: Millis,
    release_timeout_ms: Millis,
    initialized: bool,
}

impl<SW: SensorInput, SE: SensorInput, L: RelayOutput> CrossingController<SW, SE, L> {
    /// Create a crossing from its configuration and hardware.
    pub fn new(config: &CrossingConfig, west: SW, east: SE, lamp_a: L, lamp_b: L) -> Self {
        Self {
            label: config.label.clone(),
            west: Occupancy::new(west, config),
            east: Occupancy::new(east, config),
            lamp_a,
            lamp_b,
            state: CrossingState::Idle,
            lamps: None,
            flash_interval_ms: config.flash_interval_ms.max(1),
            release_timeout_ms: config.release_timeout_ms,
            initialized: false,
        }
    }

    /// Read both detectors immediately and drive the lamps to match.
    ///
    /// If either detector cannot be read the lamps are left untouched and the
    /// next [`update`](Self::update) tries again.
    pub fn init(&mut self, now: Millis, sink: &mut dyn EventSink) -> Result<(), L::Error> {
        let (Some(west), Some(east)) = (self.west.init(now), self.east.init(now)) else {
            return Ok(());
        };
        self.initialized = true;
        self.step(west, east, now, sink);
        self.drive_lamps(now)
    }

    /// Advance the crossing to `now`.
    pub fn update(&mut self, now: Millis, sink: &mut dyn EventSink) -> Result<(), L::Error> {
        if !self.initialized {
            return self.init(now, sink);
        }
        let west = self.west.update(now);
        let east = self.east.update(now);
        self.step(west, east, now, sink);
        self.drive_lamps(now)
    }

    fn step(&mut self, west: bool, east: bool, now: Millis, sink: &mut dyn EventSink) {
        self.state = match self.state {
            CrossingState::Idle if west || east => {
                let from = if west { Side::West } else { Side::East };
                sink.emit(&Event::CrossingActivated {
                    label: self.label.clone(),
                    from,
                });
                CrossingState::Active {
                    from,
                    far_seen: false,
                    near_cleared_at: None,
                    since: now,
                }
            }
            CrossingState::Idle => CrossingState::Idle,
            CrossingState::Active {
                from,
                far_seen,
                near_cleared_at,
                since,
            } => {
                let (near, far) = match from {
                    Side::West => (west, east),
                    Side::East => (east, west),
                };
                let far_seen = far_seen || far;

                let (release, near_cleared_at) = if far_seen {
                    (
                        (!near && !far).then_some(ReleaseReason::Cleared),
                        None,
                    )
                } else if near {
                    (None, None)
                } else {
                    let cleared_at = near_cleared_at.unwrap_or(now);
                    (
                        has_elapsed(now, cleared_at, self.release_timeout_ms)
                            .then_some(ReleaseReason::Timeout),
                        Some(cleared_at),
                    )
                };

                match release {
                    Some(reason) => {
                        sink.emit(&Event::CrossingReleased {
                            label: self.label.clone(),
                            reason,
                        });
                        CrossingState::Idle
                    }
                    None => CrossingState::Active {
                        from,
                        far_seen,
                        near_cleared_at,
                        since,
                    },
                }
            }
        };
    }

    fn phase(&self, now: Millis) -> LampPhase {
        match self.state {
            CrossingState::Idle => LampPhase::Dark,
            CrossingState::Active { since, .. } => {
                if (elapsed_ms(now, since) / self.flash_interval_ms) % 2 == 0 {
                    LampPhase::First
                } else {
                    LampPhase::Second
                }
            }
        }
    }

    fn drive_lamps(&mut self, now: Millis) -> Result<(), L::Error> {
        let phase = self.phase(now);
        if self.lamps == Some(phase) {
            return Ok(());
        }
        let (a, b) = phase.outputs();
        if a == Power::Off {
            self.lamp_a.set_power(a)?;
            self.lamp_b.set_power(b)?;
        } else {
            self.lamp_b.set_power(b)?;
            self.lamp_a.set_power(a)?;
        }
        self.lamps = Some(phase);
        Ok(())
    }

    /// Diagnostic label.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> CrossingState {
        self.state
    }

    /// True while the lights are flashing.
    pub fn is_active(&self) -> bool {
        matches!(self.state, CrossingState::Active { .. })
    }

    /// Side that triggered the current activation.
    pub fn active_from(&self) -> Option<Side> {
        match self.state {
            CrossingState::Active { from, .. } => Some(from),
            CrossingState::Idle => None,
        }
    }

    /// Debounced occupancy of (west, east).
    pub fn occupancy(&self) -> (bool, bool) {
        (self.west.gate.accepted(), self.east.gate.accepted())
    }

    /// The two lamp outputs.
    pub fn lamps(&self) -> (&L, &L) {
        (&self.lamp_a, &self.lamp_b)
    }

    /// Mutably borrow the west detector.
    pub fn west_mut(&mut self) -> &mut SW {
        self.west.channel.input_mut()
    }

    /// Mutably borrow the east detector.
    pub fn east_mut(&mut self) -> &mut SE {
        self.east.channel.input_mut()
    }
}
