//! Millisecond timestamps that survive timer rollover.
//!
//! Board timers are read as a free-running `u32` millisecond counter which
//! wraps roughly every 49.7 days. Every interval check in this crate goes
//! through [`elapsed_ms`], which uses wrapping subtraction so a deadline that
//! straddles the rollover still fires on time.
//!
//! # Example
//!
//! ```rust
//! use rs_points::time::{elapsed_ms, has_elapsed};
//!
//! assert_eq!(elapsed_ms(150, 100), 50);
//!
//! // 10ms before the wrap to 20ms after it
//! let before = u32::MAX - 9;
//! assert_eq!(elapsed_ms(20, before), 30);
//! assert!(has_elapsed(20, before, 30));
//! ```

/// Wrapping millisecond timestamp.
pub type Millis = u32;

/// Milliseconds from `since` to `now`, correct across one counter rollover.
#[inline]
pub const fn elapsed_ms(now: Millis, since: Millis) -> Millis {
    now.wrapping_sub(since)
}

/// Returns true once at least `interval` ms have passed since `since`.
#[inline]
pub const fn has_elapsed(now: Millis, since: Millis, interval: Millis) -> bool {
    elapsed_ms(now, since) >= interval
}
