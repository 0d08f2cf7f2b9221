//! Debounce gate: a candidate state is only accepted after it has held
//! steady for a minimum duration.
//!
//! The gate tracks two things: the *instantaneous* candidate and when it last
//! changed, and the *accepted* state. Any flicker of the candidate restarts
//! the clock. A candidate that differs from the accepted state and has been
//! stable for `stable_ms` becomes the accepted state, and that call reports
//! `changed`. Nothing else ever updates the accepted state.
//!
//! The gate is generic over the state type so point levels and crossing
//! occupancy flags share one implementation.
//!
//! # Example
//!
//! ```rust
//! use rs_points::debounce::DebounceGate;
//!
//! let mut gate = DebounceGate::new(false, 50, 0);
//!
//! assert!(!gate.accept(true, 0).changed);   // first seen
//! assert!(!gate.accept(true, 49).changed);  // not stable long enough
//! let accepted = gate.accept(true, 50);
//! assert!(accepted.changed);
//! assert!(accepted.state);
//! assert!(!gate.accept(true, 60).changed);  // reported once only
//! ```

use crate::time::{has_elapsed, Millis};

/// Result of feeding one candidate into a [`DebounceGate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accepted<T> {
    /// Accepted state after this call.
    pub state: T,
    /// True only on the call that changed the accepted state.
    pub changed: bool,
}

/// Two-stage debouncer holding an instantaneous and an accepted state.
#[derive(Clone, Debug)]
pub struct DebounceGate<T> {
    accepted: T,
    instantaneous: T,
    last_changed_at: Millis,
    stable_ms: Millis,
}

impl<T: Copy + PartialEq> DebounceGate<T> {
    /// Create a gate that starts out accepting `initial`.
    pub fn new(initial: T, stable_ms: Millis, now: Millis) -> Self {
        Self {
            accepted: initial,
            instantaneous: initial,
            last_changed_at: now,
            stable_ms,
        }
    }

    /// Feed a candidate state observed at `now`.
    pub fn accept(&mut self, candidate: T, now: Millis) -> Accepted<T> {
        if candidate != self.instantaneous {
            self.instantaneous = candidate;
            self.last_changed_at = now;
        }

        let changed = candidate != self.accepted
            && has_elapsed(now, self.last_changed_at, self.stable_ms);
        if changed {
            self.accepted = candidate;
        }

        Accepted {
            state: self.accepted,
            changed,
        }
    }

    /// Force both stages to `state`, bypassing the stable duration.
    pub fn reset(&mut self, state: T, now: Millis) {
        self.accepted = state;
        self.instantaneous = state;
        self.last_changed_at = now;
    }

    /// Currently accepted state.
    #[inline]
    pub fn accepted(&self) -> T {
        self.accepted
    }

    /// True while a different candidate is waiting out the stable duration.
    #[inline]
    pub fn pending(&self) -> bool {
        self.instantaneous != self.accepted
    }

    /// Required stable duration in milliseconds.
    #[inline]
    pub fn stable_ms(&self) -> Millis {
        self.stable_ms
    }
}
