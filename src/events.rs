//! Structured diagnostic events.
//!
//! Every line an operator sees on the console starts life as one of these.
//! Only debounced, accepted transitions ever become a [`PointChange`], so the
//! stream never shows sensor flicker.

use core::fmt;

use crate::config::{short_string, ShortString};
use crate::crossing::{ReleaseReason, Side};
use crate::point::PointState;
use crate::threshold::Threshold;
use crate::time::Millis;

/// One accepted point state change, reported once per edge.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointChange {
    /// Point label from its configuration.
    pub label: ShortString,
    /// Newly accepted state.
    pub state: PointState,
    /// Raw sensor value at the moment of acceptance.
    pub raw: u16,
    /// Threshold the reading was judged against.
    pub threshold: Threshold,
    /// Time of acceptance.
    pub at: Millis,
}

/// Coarse periodic summary produced by the loop driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSummary {
    /// Time the summary was taken.
    pub at: Millis,
    /// Number of registered points.
    pub points: usize,
    /// Points whose sensor currently disagrees with the accepted state.
    pub pending: usize,
    /// Relay outputs currently powered across all points.
    pub powered_relays: usize,
    /// Sensor read failures since startup across all points.
    pub read_failures: u32,
}

/// Everything the controllers report to an [`EventSink`](crate::traits::EventSink).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum Event {
    /// All points initialised and driving their relays.
    Ready {
        /// Number of registered points.
        points: usize,
    },
    /// A point accepted a new state.
    PointChanged(PointChange),
    /// Periodic status summary.
    Status(StatusSummary),
    /// Writing a point's relays or a crossing's lamps failed; retried next
    /// tick.
    OutputFault {
        /// Label of the affected point or crossing.
        label: ShortString,
        /// HAL error rendered with `{:?}`, truncated to fit.
        reason: ShortString,
    },
    /// A crossing started flashing.
    CrossingActivated {
        /// Crossing label.
        label: ShortString,
        /// Side whose occupancy triggered activation.
        from: Side,
    },
    /// A crossing stopped flashing.
    CrossingReleased {
        /// Crossing label.
        label: ShortString,
        /// Why it was released.
        reason: ReleaseReason,
    },
}

impl Event {
    /// Build an [`Event::OutputFault`] from a HAL error.
    pub fn output_fault(label: &str, error: &dyn fmt::Debug) -> Self {
        Event::OutputFault {
            label: short_string(label),
            reason: short_string(&alloc::format!("{:?}", error)),
        }
    }

    /// True for events an operator should notice: output faults and
    /// fail-safe releases.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::OutputFault { .. }
                | Event::CrossingReleased {
                    reason: ReleaseReason::Timeout,
                    ..
                }
        )
    }
}

/// One console line per event.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Ready { points } => write!(f, "READY | {} point(s) initialised", points),
            Event::PointChanged(c) => write!(
                f,
                "POINT | {} -> {} | raw={} threshold={}\u{00b1}{} @{}ms",
                c.label,
                c.state.as_str(),
                c.raw,
                c.threshold.threshold(),
                c.threshold.hysteresis(),
                c.at,
            ),
            Event::Status(s) => write!(
                f,
                "STATUS | points={} pending={} powered={} read_failures={} @{}ms",
                s.points, s.pending, s.powered_relays, s.read_failures, s.at,
            ),
            Event::OutputFault { label, reason } => {
                write!(f, "FAULT | {} output write failed ({}), retrying", label, reason)
            }
            Event::CrossingActivated { label, from } => {
                write!(f, "CROSSING | {} active, approach from {}", label, from.as_str())
            }
            Event::CrossingReleased { label, reason } => match reason {
                ReleaseReason::Cleared => write!(f, "CROSSING | {} released", label),
                ReleaseReason::Timeout => {
                    write!(f, "CROSSING | {} released by fail-safe timeout", label)
                }
            },
        }
    }
}
