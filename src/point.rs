//! Point controller: sensor interpretation coupled to a relay pair.
//!
//! This module provides [`PointController`], which owns one sampled sensor,
//! its hysteresis comparator and debounce gate, and the two relays that
//! feed the approaches protected by the point.
//!
//! # Point Kinds
//!
//! | Kind | States | Relays |
//! |------|--------|--------|
//! | Coacting crossover | `Active` / `Inactive` | both off / both on |
//! | Y-branch | `FeedA` / `FeedB` | exactly one on |
//!
//! # Example
//!
//! ```rust
//! use rs_points::{PointConfig, PointController, PointState, Route, Power};
//! use rs_points::hal::{MockRelay, MockSensor, RecordingSink};
//!
//! let config = PointConfig::y_branch("loop entry").with_stable_ms(50);
//! let mut point = PointController::new(
//!     &config,
//!     MockSensor::analog(100),
//!     MockRelay::new(),
//!     MockRelay::new(),
//! );
//! let mut sink = RecordingSink::new();
//!
//! // Startup applies the relays straight away
//! assert_eq!(point.init(0, &mut sink).unwrap(), Some(PointState::YBranch(Route::FeedA)));
//! assert_eq!(point.first_relay().power, Some(Power::On));
//! assert_eq!(point.second_relay().power, Some(Power::Off));
//!
//! // Throw the point: accepted once the reading has held for 50ms
//! point.sensor_mut().set(900);
//! for now in (10..=60).step_by(10) {
//!     point.update(now, &mut sink).unwrap();
//! }
//! assert_eq!(point.state(), Some(PointState::YBranch(Route::FeedB)));
//! assert_eq!(point.second_relay().power, Some(Power::On));
//! ```

use crate::config::{PointConfig, ShortString};
use crate::debounce::DebounceGate;
use crate::events::{Event, PointChange};
use crate::sensor::SensorChannel;
use crate::threshold::Threshold;
use crate::time::Millis;
use crate::traits::{EventSink, Power, RelayOutput, SensorInput, SensorLevel};

/// What the point mechanism is, and which sensor level means what.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum PointKind {
    /// Crossover whose two protected approaches are blocked together.
    Coacting {
        /// Sensor level that means the crossover is engaged.
        active_when: SensorLevel,
    },
    /// Point selecting one of two incoming feeds.
    YBranch {
        /// Sensor level that means the point routes from feed B.
        feed_b_when: SensorLevel,
    },
}

impl PointKind {
    /// Map an accepted sensor level to the point's logical state.
    pub fn state_for(&self, level: SensorLevel) -> PointState {
        match *self {
            PointKind::Coacting { active_when } => PointState::Coacting(if level == active_when {
                CrossoverState::Active
            } else {
                CrossoverState::Inactive
            }),
            PointKind::YBranch { feed_b_when } => PointState::YBranch(if level == feed_b_when {
                Route::FeedB
            } else {
                Route::FeedA
            }),
        }
    }
}

/// State of a coacting crossover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CrossoverState {
    /// Crossover engaged: both protected approaches isolated.
    Active,
    /// Crossover clear: both approaches fed.
    Inactive,
}

/// Feed selected by a Y-branch point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Route {
    /// First relay powered.
    FeedA,
    /// Second relay powered.
    FeedB,
}

/// Externally visible state of a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointState {
    /// Coacting crossover state.
    Coacting(CrossoverState),
    /// Y-branch route.
    YBranch(Route),
}

impl PointState {
    /// Relay outputs for this state.
    pub const fn relays(&self) -> RelayPair {
        match self {
            PointState::Coacting(CrossoverState::Active) => RelayPair::new(Power::Off, Power::Off),
            PointState::Coacting(CrossoverState::Inactive) => RelayPair::new(Power::On, Power::On),
            PointState::YBranch(Route::FeedA) => RelayPair::new(Power::On, Power::Off),
            PointState::YBranch(Route::FeedB) => RelayPair::new(Power::Off, Power::On),
        }
    }

    /// Short lowercase name for diagnostics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PointState::Coacting(CrossoverState::Active) => "active",
            PointState::Coacting(CrossoverState::Inactive) => "inactive",
            PointState::YBranch(Route::FeedA) => "feed_a",
            PointState::YBranch(Route::FeedB) => "feed_b",
        }
    }
}

/// Logical outputs for a point's two relays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelayPair {
    /// First relay (approach A).
    pub first: Power,
    /// Second relay (approach B).
    pub second: Power,
}

impl RelayPair {
    /// Create a relay pair.
    pub const fn new(first: Power, second: Power) -> Self {
        Self { first, second }
    }

    /// Number of powered relays.
    pub const fn powered(&self) -> usize {
        self.first.is_on() as usize + self.second.is_on() as usize
    }
}

/// One point: sampled sensor, hysteresis, debounce, and a relay pair.
///
/// # Type Parameters
///
/// - `S`: The sensor implementation ([`SensorInput`] trait)
/// - `R`: The relay implementation ([`RelayOutput`] trait)
///
/// # Lifecycle
///
/// Call [`init`](Self::init) once at startup, then [`update`](Self::update)
/// every tick. `init` samples immediately and drives the relays without
/// waiting for the debounce period. An `update` on a controller that was never
/// initialised, or whose first sensor read failed, performs the
/// initialisation.
pub struct PointController<S: SensorInput, R: RelayOutput> {
    label: ShortString,
    kind: PointKind,
    channel: SensorChannel<S>,
    threshold: Threshold,
    gate: DebounceGate<SensorLevel>,
    first: R,
    second: R,
    applied: Option<PointState>,
    last_reported: Option<PointState>,
    initialized: bool,
}

impl<S: SensorInput, R: RelayOutput> PointController<S, R> {
    /// Create a point controller from its configuration and hardware.
    pub fn new(config: &PointConfig, sensor: S, first: R, second: R) -> Self {
        let threshold = config.threshold_for(sensor.max_raw());
        Self {
            label: config.label.clone(),
            kind: config.kind,
            channel: SensorChannel::new(sensor, config.sample_interval_ms),
            threshold,
            gate: DebounceGate::new(SensorLevel::Low, config.stable_ms, 0),
            first,
            second,
            applied: None,
            last_reported: None,
            initialized: false,
        }
    }

    /// Take the first reading and drive the relays to match it.
    ///
    /// Ignores the sampling interval and debounce period so the outputs are
    /// in a known state from the first tick. Returns `None` if the sensor could
    /// not be read: the relays are left untouched and the next
    /// [`update`](Self::update) tries again.
    pub fn init(
        &mut self,
        now: Millis,
        sink: &mut dyn EventSink,
    ) -> Result<Option<PointState>, R::Error> {
        self.start(now, sink)?;
        Ok(self
            .initialized
            .then(|| self.kind.state_for(self.gate.accepted())))
    }

    fn start(
        &mut self,
        now: Millis,
        sink: &mut dyn EventSink,
    ) -> Result<Option<PointChange>, R::Error> {
        let raw = self.channel.force_sample(now);
        if self.channel.last_sample_at().is_none() {
            // no reading yet, outputs stay as they are
            return Ok(None);
        }
        self.gate.reset(self.threshold.classify(raw), now);
        self.initialized = true;
        self.settle(raw, now, sink)
    }

    /// Advance the controller to `now`.
    ///
    /// Returns the change notification if this tick produced one.
    pub fn update(
        &mut self,
        now: Millis,
        sink: &mut dyn EventSink,
    ) -> Result<Option<PointChange>, R::Error> {
        if !self.initialized {
            return self.start(now, sink);
        }

        let raw = self.channel.sample(now);
        let candidate = self.threshold.interpret(raw, self.gate.accepted());
        self.gate.accept(candidate, now);
        self.settle(raw, now, sink)
    }

    /// Drive the relays to the accepted state if they are not there yet, then
    /// report the state if it has not been reported.
    ///
    /// Relays are only written when the accepted state differs from what was
    /// last applied, which after a successful write means only on an accepted
    /// change. A failed write leaves `applied` stale so the next tick retries.
    fn settle(
        &mut self,
        raw: u16,
        now: Millis,
        sink: &mut dyn EventSink,
    ) -> Result<Option<PointChange>, R::Error> {
        let state = self.kind.state_for(self.gate.accepted());

        if self.applied != Some(state) {
            self.apply(state)?;
        }

        if self.last_reported == Some(state) {
            return Ok(None);
        }
        self.last_reported = Some(state);

        let change = PointChange {
            label: self.label.clone(),
            state,
            raw,
            threshold: self.threshold,
            at: now,
        };
        sink.emit(&Event::PointChanged(change.clone()));
        Ok(Some(change))
    }

    fn apply(&mut self, state: PointState) -> Result<(), R::Error> {
        let pair = state.relays();
        // Break before make: isolate first so a Y-branch never feeds both
        // approaches between the two writes.
        if pair.first == Power::Off {
            self.first.set_power(pair.first)?;
            self.second.set_power(pair.second)?;
        } else {
            self.second.set_power(pair.second)?;
            self.first.set_power(pair.first)?;
        }
        self.applied = Some(state);
        Ok(())
    }

    /// Diagnostic label.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Point kind.
    #[inline]
    pub fn kind(&self) -> PointKind {
        self.kind
    }

    /// State currently applied to the relays, `None` before the first
    /// successful write.
    #[inline]
    pub fn state(&self) -> Option<PointState> {
        self.applied
    }

    /// Accepted (debounced) sensor level.
    #[inline]
    pub fn accepted_level(&self) -> SensorLevel {
        self.gate.accepted()
    }

    /// True while a new reading is waiting out the debounce period.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.gate.pending()
    }

    /// Comparator used for this point.
    #[inline]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Sampler for this point's sensor.
    pub fn channel(&self) -> &SensorChannel<S> {
        &self.channel
    }

    /// Mutably borrow the sensor, e.g. to script a mock.
    pub fn sensor_mut(&mut self) -> &mut S {
        self.channel.input_mut()
    }

    /// First relay (approach A).
    pub fn first_relay(&self) -> &R {
        &self.first
    }

    /// Second relay (approach B).
    pub fn second_relay(&self) -> &R {
        &self.second
    }

    /// Mutably borrow both relays, e.g. to inject a mock fault.
    pub fn relays_mut(&mut self) -> (&mut R, &mut R) {
        (&mut self.first, &mut self.second)
    }
}
