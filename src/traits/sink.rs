//! Diagnostic event sink.
//!
//! Controllers never print. Everything an operator might want to see
//! (startup, accepted state changes, status summaries, output faults) is
//! handed to an [`EventSink`] as a structured [`Event`]. The sink is
//! write-only from the controllers' point of view.
//!
//! Use [`LogSink`](crate::hal::LogSink) on hardware and
//! [`RecordingSink`](crate::hal::RecordingSink) in tests.

use crate::events::Event;

/// Receives diagnostic events from controllers and the loop driver.
pub trait EventSink {
    /// Record one event.
    fn emit(&mut self, event: &Event);
}

/// Discards every event.
impl EventSink for () {
    fn emit(&mut self, _event: &Event) {}
}
