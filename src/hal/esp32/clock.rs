//! ESP32 clock implementation using the ESP-IDF timer.

use crate::time::Millis;
use crate::traits::Clock;

/// ESP32 clock using the hardware timer.
///
/// `esp_timer_get_time()` returns microseconds since boot as an `i64`; the
/// millisecond value is truncated to a wrapping `u32`.
///
/// # Example
///
/// ```ignore
/// use rs_points::hal::esp32::Esp32Clock;
/// use rs_points::time::elapsed_ms;
/// use rs_points::traits::Clock;
///
/// let clock = Esp32Clock::new();
/// let start = clock.now_ms();
/// // ... do work ...
/// let elapsed = elapsed_ms(clock.now_ms(), start);
/// ```
pub struct Esp32Clock;

impl Esp32Clock {
    /// Creates a new ESP32 clock instance.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for Esp32Clock {
    #[inline]
    fn now_ms(&self) -> Millis {
        // Safe: plain read of the free-running timer, no side effects
        let micros = unsafe { esp_idf_hal::sys::esp_timer_get_time() };
        (micros / 1000) as Millis
    }
}
