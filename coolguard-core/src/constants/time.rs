//! Time-Related Constants
//!
//! All values are milliseconds of monotonic time unless stated otherwise.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

// ===== LOOP INTERVALS =====

/// Minimum spacing between two samples in the reading buffer.
pub const PHYSICAL_READ_INTERVAL_MS: u64 = 100;

/// Spacing between sensor/control cycles when the timer does not fire first.
pub const SENSOR_READ_INTERVAL_MS: u64 = 5000;

/// Spacing between telemetry publications.
pub const PUBLISH_INTERVAL_MS: u64 = 5000;

/// Spacing between CSV snapshots of every channel.
pub const CSV_SAVE_INTERVAL_MS: u64 = 60_000;

/// Spacing between console status reports.
pub const STATUS_REPORT_INTERVAL_MS: u64 = 10_000;

/// Period of the hardware wake timer (1 Hz).
pub const TIMER_PERIOD_MS: u64 = 1000;

// ===== INTERRUPTS =====

/// Edges on the same button closer than this are contact bounce.
pub const BUTTON_DEBOUNCE_MS: u32 = 50;

// ===== NETWORK RETRIES =====

/// Connection attempts per reconnection round.
pub const CONNECT_MAX_ATTEMPTS: u8 = 3;

/// Delay between two connection attempts.
pub const CONNECT_RETRY_DELAY_MS: u32 = 2000;

/// Spacing between reconnection rounds once a round is exhausted.
pub const RECONNECT_INTERVAL_MS: u64 = 30_000;
