//! Persistent log and CSV sinks
//!
//! A `DataLogger` owns one file name on the storage medium and appends whole
//! lines to it. The medium itself is passed in on every call because the
//! event log and the CSV share the same card.
//!
//! ## File selection
//!
//! At start-up each logger probes `<prefix>0.<ext>`, `<prefix>1.<ext>`, ...
//! and settles on the first name that does not exist yet, so a reboot never
//! overwrites an earlier session.
//!
//! ## Failure policy
//!
//! Every write opens the file, appends, and drops the handle. A missing
//! card or failed open returns an error for that line only; the next call
//! tries again from scratch.
//!
//! ```text
//! [2025-07-25T14:03:09Z] [WARNING] EMERGENCY ACTIVATED!
//! 2025-07-25T14:03:09Z,vent1,OFF
//! ```

use core::fmt::{self, Write};

use heapless::String;

use crate::constants::buffers::{MAX_FILE_INDEX, MAX_FILE_NAME_LEN, MAX_LINE_LEN};
use crate::errors::{MonitorError, MonitorResult};
use crate::events::Severity;
use crate::time::DateTime;
use crate::traits::{LogFile, OpenMode, Storage};

/// Longest accepted file prefix
pub const MAX_PREFIX_LEN: usize = 16;

/// Line sink bound to one indexed file
#[derive(Debug, Clone)]
pub struct DataLogger {
    prefix: String<MAX_PREFIX_LEN>,
    extension: &'static str,
    file_name: Option<String<MAX_FILE_NAME_LEN>>,
}

impl DataLogger {
    pub fn new(prefix: &str, extension: &'static str) -> MonitorResult<Self> {
        let prefix = String::try_from(prefix).map_err(|_| MonitorError::CapacityExceeded)?;
        Ok(Self { prefix, extension, file_name: None })
    }

    /// Selected file, once `open_next` succeeded
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.file_name.is_some()
    }

    /// Pick the first unused `<prefix><n>.<ext>`
    pub fn open_next<S: Storage>(&mut self, storage: &mut S) -> MonitorResult<&str> {
        if !storage.is_available() {
            return Err(MonitorError::StorageUnavailable { reason: "medium not mounted" });
        }

        for index in 0..=MAX_FILE_INDEX {
            let mut name: String<MAX_FILE_NAME_LEN> = String::new();
            write!(name, "{}{}.{}", self.prefix, index, self.extension)
                .map_err(|_| MonitorError::CapacityExceeded)?;

            if !storage.exists(&name) {
                mon_info!("Logging to {}", name.as_str());
                return Ok(self.file_name.insert(name).as_str());
            }
        }

        Err(MonitorError::CapacityExceeded)
    }

    /// Append one raw line
    pub fn append<S: Storage>(&self, storage: &mut S, line: &str) -> MonitorResult<()> {
        let name = self
            .file_name
            .as_ref()
            .ok_or(MonitorError::StorageUnavailable { reason: "no file selected" })?;

        if !storage.is_available() {
            return Err(MonitorError::StorageUnavailable { reason: "medium not mounted" });
        }

        let mut file = storage.open(name, OpenMode::Append)?;
        file.write_line(line)
    }

    /// Append a formatted line built from `args`
    pub fn append_fmt<S: Storage>(&self, storage: &mut S, args: fmt::Arguments<'_>) -> MonitorResult<()> {
        let mut line: String<MAX_LINE_LEN> = String::new();
        line.write_fmt(args).map_err(|_| MonitorError::CapacityExceeded)?;
        self.append(storage, &line)
    }

    /// Append `[timestamp] [LEVEL] message`
    pub fn log<S: Storage>(
        &self,
        storage: &mut S,
        at: &DateTime,
        severity: Severity,
        message: &dyn fmt::Display,
    ) -> MonitorResult<()> {
        self.append_fmt(storage, format_args!("[{}] [{}] {}", at, severity.as_str(), message))
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::constants::files::{CSV_FILE_EXT, LOG_FILE_EXT};
    use crate::sim::MemoryStorage;

    const AT: DateTime = DateTime::new(2025, 7, 25, 14, 3, 9);

    #[test]
    fn picks_first_free_index() {
        let mut storage = MemoryStorage::new();
        storage.insert("system0.log", &["old"]);
        storage.insert("system1.log", &["old"]);

        let mut logger = DataLogger::new("system", LOG_FILE_EXT).unwrap();
        assert_eq!(logger.open_next(&mut storage).unwrap(), "system2.log");
        assert_eq!(logger.file_name(), Some("system2.log"));
    }

    #[test]
    fn log_line_format() {
        let mut storage = MemoryStorage::new();
        let mut logger = DataLogger::new("system", LOG_FILE_EXT).unwrap();
        logger.open_next(&mut storage).unwrap();

        logger.log(&mut storage, &AT, Severity::Warning, &"EMERGENCY ACTIVATED!").unwrap();
        assert_eq!(
            storage.lines("system0.log"),
            vec!["[2025-07-25T14:03:09Z] [WARNING] EMERGENCY ACTIVATED!".to_string()]
        );
    }

    #[test]
    fn unmounted_medium_is_reported_per_write() {
        let mut storage = MemoryStorage::new();
        let mut logger = DataLogger::new("temperatura", CSV_FILE_EXT).unwrap();
        logger.open_next(&mut storage).unwrap();

        storage.set_available(false);
        let err = logger.append(&mut storage, "x").unwrap_err();
        assert!(err.is_storage_fault());

        storage.set_available(true);
        logger.append(&mut storage, "y").unwrap();
        assert_eq!(storage.lines("temperatura0.csv"), vec!["y".to_string()]);
    }

    #[test]
    fn write_before_open_fails() {
        let mut storage = MemoryStorage::new();
        let logger = DataLogger::new("system", LOG_FILE_EXT).unwrap();
        assert!(matches!(
            logger.append(&mut storage, "x"),
            Err(MonitorError::StorageUnavailable { .. })
        ));
    }

    #[test]
    fn overlong_prefix_rejected() {
        assert_eq!(
            DataLogger::new("a_very_long_prefix_name", LOG_FILE_EXT).unwrap_err(),
            MonitorError::CapacityExceeded
        );
    }
}
