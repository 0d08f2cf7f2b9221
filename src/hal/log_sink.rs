//! Log-based event sink.
//!
//! Implements [`EventSink`] by writing one human-readable line per event to
//! the `log` facade. On the ESP32 the binary installs `EspLogger`, so these
//! lines end up on the UART / USB-CDC console. The line text is the event's
//! [`Display`](core::fmt::Display) rendering.

use log::{info, warn};

use crate::events::Event;
use crate::traits::EventSink;

/// Sink that logs every [`Event`] to the console.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    /// Creates a new log sink.
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &Event) {
        if event.is_warning() {
            warn!("{}", event);
        } else {
            info!("{}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::short_string;
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::Mutex;

    static LINES: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

    struct Capture;

    impl Log for Capture {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if let Ok(mut lines) = LINES.lock() {
                lines.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture;

    // =========================================================================
    // Console Output Tests
    // =========================================================================

    #[test]
    fn one_line_per_event_at_matching_level() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(LevelFilter::Info);

        let mut sink = LogSink::new();
        sink.emit(&Event::Ready { points: 2 });
        sink.emit(&Event::OutputFault {
            label: short_string("siding"),
            reason: short_string("()"),
        });

        let lines = LINES.lock().unwrap();
        assert_eq!(
            *lines,
            [
                (Level::Info, "READY | 2 point(s) initialised".to_string()),
                (
                    Level::Warn,
                    "FAULT | siding output write failed (()), retrying".to_string()
                ),
            ]
        );
    }
}
