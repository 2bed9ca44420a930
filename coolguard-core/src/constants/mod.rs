//! Constants for CoolGuard Core
//!
//! Centralized values used throughout the monitor. Each constant records
//! its unit in the name and the behaviour it drives in its doc comment.
//!
//! ## Organization
//!
//! - **Sensors**: virtual channel layout, offsets, jitter and clamp ranges
//! - **Control**: setpoint ranges, defaults and the warning threshold
//! - **Time**: loop intervals, debounce window and retry timing
//! - **Buffers**: fixed capacities for samples, lines and topics
//! - **Topics**: MQTT topic suffixes
//! - **Files**: log/CSV name prefixes and the CSV header

/// Virtual sensor layout, offsets and clamp ranges.
pub mod sensors;

/// Actuator control setpoints and limits.
pub mod control;

/// Intervals, debounce windows and retry delays.
pub mod time;

/// Fixed capacities for embedded buffers.
pub mod buffers;

/// MQTT topic suffixes appended to the configured base.
pub mod topics;

/// Log and CSV file naming.
pub mod files;

// Re-export commonly used constants for convenience
pub use sensors::{
    NUM_VIRTUAL_CHANNELS, CHANNEL_TEMP_OFFSETS_C, CHANNEL_HUMIDITY_OFFSETS_PCT,
    CHANNEL_TEMP_MIN_C, CHANNEL_TEMP_MAX_C, CHANNEL_HUMIDITY_MIN_PCT, CHANNEL_HUMIDITY_MAX_PCT,
};

pub use control::{
    TEMP_MIN_LOWER_C, TEMP_MIN_UPPER_C, TEMP_MAX_LOWER_C, TEMP_MAX_UPPER_C,
    DEFAULT_TEMP_MIN_C, DEFAULT_TEMP_MAX_C, HIGH_TEMP_WARNING_C,
};

pub use time::{
    PHYSICAL_READ_INTERVAL_MS, SENSOR_READ_INTERVAL_MS, PUBLISH_INTERVAL_MS,
    CSV_SAVE_INTERVAL_MS, BUTTON_DEBOUNCE_MS,
};

pub use buffers::{READING_BUFFER_CAPACITY, MIN_MEDIAN_SAMPLES};
