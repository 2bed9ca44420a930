//! Buffer Sizes
//!
//! Fixed capacities so nothing in the hot path allocates.

/// Raw samples kept for the median.
pub const READING_BUFFER_CAPACITY: usize = 10;

/// Below this many buffered samples the median reports "no data".
pub const MIN_MEDIAN_SAMPLES: usize = 3;

/// Longest MQTT topic we build.
pub const MAX_TOPIC_LEN: usize = 64;

/// Longest inbound command payload we keep.
pub const MAX_COMMAND_PAYLOAD: usize = 32;

/// Longest formatted log or CSV line.
pub const MAX_LINE_LEN: usize = 160;

/// Longest storage file name (`system12.log`).
pub const MAX_FILE_NAME_LEN: usize = 32;

/// Highest file index probed when choosing a fresh log file.
pub const MAX_FILE_INDEX: u16 = 999;

/// Short numeric payloads such as `23.4`.
pub const MAX_NUMBER_PAYLOAD: usize = 16;

/// Inbound commands handled per loop pass; the rest wait for the next pass.
pub const MAX_COMMANDS_PER_PASS: usize = 8;

/// Control events recorded in one `CycleReport`.
pub const MAX_EVENTS_PER_PASS: usize = 16;
