//! Controller registry and loop driver.
//!
//! [`PointRegistry`] owns every point controller on the board and advances
//! them all on each [`tick`](PointRegistry::tick). Controllers share nothing,
//! so the order they are updated in (registration order) has no effect on
//! the outcome.
//!
//! Points with different sensor and relay types live side by side as
//! [`AnyPoint`], a boxed [`Point`] trait object. [`Point`] is implemented for
//! every [`PointController`], so construction is just `Box::new(controller)`.
//!
//! # Example
//!
//! ```rust
//! use rs_points::{PointConfig, PointController, PointRegistry, AnyPoint};
//! use rs_points::hal::{MockRelay, MockSensor, RecordingSink};
//!
//! let xover = PointController::new(
//!     &PointConfig::coacting("xover"),
//!     MockSensor::analog(100),
//!     MockRelay::new(),
//!     MockRelay::new(),
//! );
//! let branch = PointController::new(
//!     &PointConfig::y_branch("branch").digital(),
//!     MockSensor::digital(true),
//!     MockRelay::new(),
//!     MockRelay::new(),
//! );
//!
//! let points: Vec<AnyPoint> = vec![Box::new(xover), Box::new(branch)];
//! let mut registry = PointRegistry::new(points);
//! let mut sink = RecordingSink::new();
//!
//! registry.init(0, &mut sink);
//! for now in (5..100).step_by(5) {
//!     registry.tick(now, &mut sink);
//! }
//! assert_eq!(registry.len(), 2);
//! assert_eq!(sink.changes().count(), 2);
//! ```

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::events::{Event, PointChange, StatusSummary};
use crate::point::{PointController, PointState};
use crate::time::{has_elapsed, Millis};
use crate::traits::{EventSink, RelayOutput, SensorInput};

/// Object-safe view of a point controller.
///
/// The loop driver cannot fail, so relay write errors are reported to the
/// sink as [`Event::OutputFault`], with the HAL error rendered as its reason,
/// instead of being returned. The controller retries the write on its next
/// update.
pub trait Point {
    /// Diagnostic label.
    fn label(&self) -> &str;

    /// Take the first reading and drive the relays.
    fn init(&mut self, now: Millis, sink: &mut dyn EventSink) -> Option<PointState>;

    /// Advance to `now`, returning the change notification if any.
    fn update(&mut self, now: Millis, sink: &mut dyn EventSink) -> Option<PointChange>;

    /// State currently applied to the relays.
    fn state(&self) -> Option<PointState>;

    /// True while a new reading is waiting out the debounce period.
    fn is_pending(&self) -> bool;

    /// Sensor read failures since startup.
    fn read_failures(&self) -> u32;

    /// Relays currently powered by the applied state.
    fn powered_relays(&self) -> usize {
        self.state().map_or(0, |s| s.relays().powered())
    }
}

impl<S, R> Point for PointController<S, R>
where
    S: SensorInput,
    R: RelayOutput,
    R::Error: Debug,
{
    fn label(&self) -> &str {
        PointController::label(self)
    }

    fn init(&mut self, now: Millis, sink: &mut dyn EventSink) -> Option<PointState> {
        match PointController::init(self, now, sink) {
            Ok(state) => state,
            Err(e) => {
                sink.emit(&Event::output_fault(self.label(), &e));
                None
            }
        }
    }

    fn update(&mut self, now: Millis, sink: &mut dyn EventSink) -> Option<PointChange> {
        match PointController::update(self, now, sink) {
            Ok(change) => change,
            Err(e) => {
                sink.emit(&Event::output_fault(self.label(), &e));
                None
            }
        }
    }

    fn state(&self) -> Option<PointState> {
        PointController::state(self)
    }

    fn is_pending(&self) -> bool {
        PointController::is_pending(self)
    }

    fn read_failures(&self) -> u32 {
        self.channel().read_failures()
    }
}

/// Type-erased point controller.
pub type AnyPoint<'a> = Box<dyn Point + 'a>;

/// Owns every point controller and drives them each tick.
///
/// The collection is fixed at construction; there is no way to add or
/// remove a point afterwards.
pub struct PointRegistry<'a> {
    points: Vec<AnyPoint<'a>>,
    status_interval_ms: Millis,
    last_status_at: Option<Millis>,
}

impl<'a> PointRegistry<'a> {
    /// Take ownership of the board's points.
    pub fn new(points: Vec<AnyPoint<'a>>) -> Self {
        Self {
            points,
            status_interval_ms: 0,
            last_status_at: None,
        }
    }

    /// Emit a [`StatusSummary`] every `ms` milliseconds from [`tick`](Self::tick)
    /// (0 disables).
    pub fn with_status_interval(mut self, ms: Millis) -> Self {
        self.status_interval_ms = ms;
        self
    }

    /// Initialise every point, then report ready.
    pub fn init(&mut self, now: Millis, sink: &mut dyn EventSink) {
        for point in self.points.iter_mut() {
            point.init(now, sink);
        }
        self.last_status_at = Some(now);
        sink.emit(&Event::Ready {
            points: self.points.len(),
        });
    }

    /// Update every point in registration order.
    ///
    /// Returns how many points reported a change this tick.
    pub fn tick(&mut self, now: Millis, sink: &mut dyn EventSink) -> usize {
        let mut changes = 0;
        for point in self.points.iter_mut() {
            if point.update(now, sink).is_some() {
                changes += 1;
            }
        }

        if self.status_interval_ms > 0 {
            match self.last_status_at {
                Some(at) if !has_elapsed(now, at, self.status_interval_ms) => {}
                Some(_) => {
                    self.last_status_at = Some(now);
                    sink.emit(&Event::Status(self.status(now)));
                }
                None => self.last_status_at = Some(now),
            }
        }

        changes
    }

    /// Summarise the current state of all points.
    pub fn status(&self, now: Millis) -> StatusSummary {
        StatusSummary {
            at: now,
            points: self.points.len(),
            pending: self.points.iter().filter(|p| p.is_pending()).count(),
            powered_relays: self.points.iter().map(|p| p.powered_relays()).sum(),
            read_failures: self
                .points
                .iter()
                .fold(0u32, |acc, p| acc.saturating_add(p.read_failures())),
        }
    }

    /// Label and applied state of every point, in registration order.
    pub fn states(&self) -> impl Iterator<Item = (&str, Option<PointState>)> + '_ {
        self.points.iter().map(|p| (p.label(), p.state()))
    }

    /// Applied state of the point with `label`.
    pub fn state_of(&self, label: &str) -> Option<PointState> {
        self.points
            .iter()
            .find(|p| p.label() == label)
            .and_then(|p| p.state())
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no points are registered.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
