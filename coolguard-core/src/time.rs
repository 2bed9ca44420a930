//! Time management for the monitor
//!
//! Two kinds of time flow through the core:
//! - Monotonic milliseconds (`Timestamp`) drive every interval and the
//!   reading-buffer rate limit.
//! - Calendar time (`DateTime`) from the RTC is only used to stamp log and
//!   CSV lines. Control decisions never look at it.

use core::fmt;

/// Timestamp in milliseconds since boot
pub type Timestamp = u64;

/// Source of monotonic time for the scheduler
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Monotonic clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    boot: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    pub fn new() -> Self {
        Self { boot: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.boot.elapsed().as_millis() as Timestamp
    }
}

/// Calendar time as read from the RTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self { year, month, day, hour, minute, second }
    }
}

/// ISO-8601 UTC, e.g. `2025-07-25T14:03:09Z`
impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Calendar clock (RTC peripheral, NTP-backed host clock, ...)
pub trait WallClock {
    fn now(&self) -> DateTime;
}

/// Wall clock frozen at one instant, for tests and RTC-less boards
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWallClock(pub DateTime);

impl WallClock for FixedWallClock {
    fn now(&self) -> DateTime {
        self.0
    }
}

/// Elapsed milliseconds since `since`, treating "never" as infinitely long ago
pub(crate) fn elapsed_since(now: Timestamp, since: Option<Timestamp>) -> Option<u64> {
    since.map(|t| now.saturating_sub(t))
}

/// True when `interval_ms` has passed since `last`, or nothing happened yet
pub(crate) fn is_due(now: Timestamp, last: Option<Timestamp>, interval_ms: u64) -> bool {
    match elapsed_since(now, last) {
        Some(elapsed) => elapsed >= interval_ms,
        None => true,
    }
}
