//! Error Types for the Monitoring Core
//!
//! ## Design Philosophy
//!
//! The monitor runs unattended next to the machines it protects, so none of
//! these errors is fatal. Every variant describes a degraded mode the
//! scheduler can keep running in:
//!
//! 1. **Small Size**: variants carry only numbers and `&'static str`, so the
//!    enum is `Copy` and can be returned from ISR-adjacent code.
//!
//! 2. **No Heap Allocation**: adapters that need owned error text (MQTT
//!    client errors, filesystem paths) log the detail themselves and map it
//!    onto one of these variants.
//!
//! ## Error Categories
//!
//! ### Sensor faults
//! - `SensorFault`: the physical driver returned NaN
//! - `InsufficientData`: not enough buffered samples for a median
//!
//! ### Storage faults
//! - `StorageUnavailable`: card missing or file could not be opened
//! - `StorageWrite`: the line could not be appended
//!
//! ### Network faults
//! - `NotConnected`, `PublishFailed`, `RetriesExhausted`
//!
//! ### Configuration
//! - `InvalidConfig`, `CapacityExceeded`
//!
//! ## Handling Strategy
//!
//! ```rust
//! use coolguard_core::MonitorError;
//!
//! fn on_storage_error(err: MonitorError) {
//!     match err {
//!         MonitorError::StorageUnavailable { .. } | MonitorError::StorageWrite { .. } => {
//!             // skip this log line, keep sensing
//!         }
//!         _ => {}
//!     }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Monitor errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MonitorError {
    /// Physical sensor returned NaN for temperature or humidity
    #[error("Sensor fault: physical reading is not a number")]
    SensorFault,

    /// Not enough buffered samples to aggregate
    #[error("Insufficient data: need {required}, have {available}")]
    InsufficientData {
        /// Minimum number of samples needed
        required: usize,
        /// Samples currently buffered
        available: usize,
    },

    /// Storage medium missing or file could not be opened
    #[error("Storage unavailable: {reason}")]
    StorageUnavailable {
        reason: &'static str,
    },

    /// A line could not be appended to an open file
    #[error("Storage write failed: {reason}")]
    StorageWrite {
        reason: &'static str,
    },

    /// Network link is down
    #[error("Not connected")]
    NotConnected,

    /// Broker rejected or dropped a publish
    #[error("Publish failed: {reason}")]
    PublishFailed {
        reason: &'static str,
    },

    /// Bounded retry loop gave up
    #[error("Gave up after {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts that were made
        attempts: u8,
    },

    /// Configuration value rejected by validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        reason: &'static str,
    },

    /// Fixed-capacity buffer (topic, line, payload) was too small
    #[error("Fixed capacity exceeded")]
    CapacityExceeded,
}

impl MonitorError {
    /// Storage faults only cost the current log write
    pub const fn is_storage_fault(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. } | Self::StorageWrite { .. })
    }

    /// Network faults only cost the current publish
    pub const fn is_network_fault(&self) -> bool {
        matches!(
            self,
            Self::NotConnected | Self::PublishFailed { .. } | Self::RetriesExhausted { .. }
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MonitorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::SensorFault =>
                defmt::write!(fmt, "Sensor fault"),
            Self::InsufficientData { required, available } =>
                defmt::write!(fmt, "Need {} samples, have {}", required, available),
            Self::StorageUnavailable { reason } =>
                defmt::write!(fmt, "Storage unavailable: {}", reason),
            Self::StorageWrite { reason } =>
                defmt::write!(fmt, "Storage write: {}", reason),
            Self::NotConnected =>
                defmt::write!(fmt, "Not connected"),
            Self::PublishFailed { reason } =>
                defmt::write!(fmt, "Publish failed: {}", reason),
            Self::RetriesExhausted { attempts } =>
                defmt::write!(fmt, "Gave up after {} attempts", attempts),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
            Self::CapacityExceeded =>
                defmt::write!(fmt, "Capacity exceeded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_classes() {
        assert!(MonitorError::StorageUnavailable { reason: "no card" }.is_storage_fault());
        assert!(MonitorError::RetriesExhausted { attempts: 3 }.is_network_fault());
        assert!(!MonitorError::SensorFault.is_network_fault());
        assert!(!MonitorError::SensorFault.is_storage_fault());
    }

    #[cfg(feature = "std")]
    #[test]
    fn messages_carry_context() {
        let err = MonitorError::InsufficientData { required: 3, available: 1 };
        assert_eq!(err.to_string(), "Insufficient data: need 3, have 1");
    }
}
