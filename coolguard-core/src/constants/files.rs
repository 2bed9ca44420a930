//! Storage File Names
//!
//! Files are named `<prefix><n>.<ext>` with the first unused `n`.

/// Prefix of the event log.
pub const LOG_FILE_PREFIX: &str = "system";

pub const LOG_FILE_EXT: &str = "log";

/// Prefix of the channel/actuator CSV.
pub const CSV_FILE_PREFIX: &str = "temperatura";

pub const CSV_FILE_EXT: &str = "csv";

/// First line of every CSV file.
pub const CSV_HEADER: &str = "timestamp,device,status,temperature";
