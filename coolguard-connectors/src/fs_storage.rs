//! Directory-backed storage
//!
//! Each log or CSV file the core asks for becomes a plain file inside the
//! root directory. Lines are appended with a trailing `\n`.
//!
//! ## Availability
//!
//! The root directory plays the part of the card slot: if it is missing or
//! not a directory, `is_available()` is false and every `open` fails with
//! `StorageUnavailable`. Nothing is created on the caller's behalf; mounting
//! the medium is the operator's job.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use coolguard_core::errors::{MonitorError, MonitorResult};
use coolguard_core::traits::{LogFile, OpenMode, Storage};
use log::warn;

use crate::ConnectorError;

/// A directory treated as removable storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of `name`, rejecting anything that would leave the root
    fn path_of(&self, name: &str) -> MonitorResult<PathBuf> {
        let plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        if !plain {
            return Err(MonitorError::StorageWrite { reason: "invalid file name" });
        }
        Ok(self.root.join(name))
    }

    /// Read a file back, line by line
    pub fn read_lines(&self, name: &str) -> Result<Vec<String>, ConnectorError> {
        let path = self.path_of(name).map_err(|_| {
            ConnectorError::ConfigError(format!("invalid file name: {name}"))
        })?;
        let text = fs::read_to_string(path)?;
        Ok(text.lines().map(str::to_owned).collect())
    }
}

impl Storage for FileStorage {
    type File = FileSink;

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn exists(&mut self, name: &str) -> bool {
        self.path_of(name).map(|p| p.exists()).unwrap_or(false)
    }

    fn open(&mut self, name: &str, mode: OpenMode) -> MonitorResult<FileSink> {
        if !self.is_available() {
            return Err(MonitorError::StorageUnavailable { reason: "storage directory missing" });
        }
        let path = self.path_of(name)?;

        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            OpenMode::Append => options.append(true),
            OpenMode::Truncate => options.write(true).truncate(true),
        };

        let file = options.open(&path).map_err(|e| {
            warn!("Failed to open {}: {}", path.display(), e);
            MonitorError::StorageUnavailable { reason: "open failed" }
        })?;

        Ok(FileSink { writer: BufWriter::new(file) })
    }
}

/// Open handle; dropping it closes the file
#[derive(Debug)]
pub struct FileSink {
    writer: BufWriter<File>,
}

impl LogFile for FileSink {
    fn write_line(&mut self, line: &str) -> MonitorResult<()> {
        writeln!(self.writer, "{line}")
            .and_then(|_| self.writer.flush())
            .map_err(|e| {
                warn!("Write failed: {}", e);
                MonitorError::StorageWrite { reason: "write failed" }
            })
    }
}
