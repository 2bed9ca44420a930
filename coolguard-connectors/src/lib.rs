//! Host Adapters for the CoolGuard Monitor
//!
//! ## Overview
//!
//! `coolguard-core` never touches hardware or the network. It talks to the
//! outside world through four narrow traits, and this crate implements them
//! for a regular operating system:
//!
//! | Core trait              | Adapter           | Backing                      |
//! |-------------------------|-------------------|------------------------------|
//! | `traits::Connector`     | `MqttConnector`   | `rumqttc` blocking client    |
//! | `traits::Storage`       | `FileStorage`     | a directory on disk          |
//! | `time::WallClock`       | `SystemWallClock` | `chrono::Utc::now()`         |
//! | `embedded_hal` `DelayNs`| `StdDelay`        | `std::thread::sleep`         |
//!
//! The same `Monitor` that runs on the board therefore runs unchanged on a
//! Raspberry Pi or a laptop, with a real broker and real files.
//!
//! ## MQTT
//!
//! The connector drives the `rumqttc` event loop itself instead of spawning
//! a thread: every call that needs network progress (`connect`, `publish`,
//! `poll_message`) pumps the connection for a bounded time. A dead broker
//! costs at most `connect_timeout_ms` per connection attempt, which the
//! core's retry policy bounds further.
//!
//! ## Storage
//!
//! `FileStorage` treats a directory as the SD card. If the directory
//! disappears (USB stick pulled, network share dropped) the storage reports
//! itself unavailable and the core skips persistence until it returns.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use coolguard_connectors::{FileStorage, StdDelay, SystemWallClock};
//! use coolguard_connectors::mqtt::{MqttConfig, MqttConnector};
//! use coolguard_core::{MonitorConfig, Monitor, MonitorIo};
//! use coolguard_core::sim::SimulatedProbe;
//! use coolguard_core::synth::NoJitter;
//!
//! let io = MonitorIo {
//!     sensor: SimulatedProbe::new(24.0, 45.0),
//!     jitter: NoJitter,
//!     storage: FileStorage::new("/var/log/coolguard"),
//!     connector: MqttConnector::new(MqttConfig::default()),
//!     clock: SystemWallClock,
//!     delay: StdDelay,
//! };
//! let monitor = Monitor::new(MonitorConfig::default(), io)?;
//! # Ok::<(), coolguard_core::MonitorError>(())
//! ```

pub mod clock;
pub mod fs_storage;
#[cfg(feature = "mqtt")]
pub mod mqtt;
pub mod payload;

// Re-export common types
pub use clock::{StdDelay, SystemWallClock};
pub use fs_storage::FileStorage;
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConfig, MqttConnector};

use coolguard_core::MonitorError;
use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Not connected")]
    NotConnected,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timeout after {0} ms")]
    Timeout(u64),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Collapse into the core's `Copy` error; the detail goes to the log
impl From<ConnectorError> for MonitorError {
    fn from(err: ConnectorError) -> Self {
        log::debug!("{}", err);
        match err {
            ConnectorError::NotConnected
            | ConnectorError::ConnectionFailed(_)
            | ConnectorError::Timeout(_) => MonitorError::NotConnected,
            ConnectorError::ProtocolError(_) => MonitorError::PublishFailed { reason: "protocol error" },
            ConnectorError::ConfigError(_) => MonitorError::InvalidConfig { reason: "connector configuration" },
            ConnectorError::Io(_) => MonitorError::StorageWrite { reason: "I/O error" },
            ConnectorError::Encoding(_) => MonitorError::PublishFailed { reason: "encoding error" },
        }
    }
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Total messages published successfully
    pub messages_sent: u64,
    /// Total publishes that failed
    pub messages_failed: u64,
    /// Total payload bytes published
    pub bytes_sent: u64,
    /// Messages received on subscribed topics
    pub messages_received: u64,
    /// Successful connections after the first
    pub reconnections: u32,
    /// Last error message
    pub last_error: Option<String>,
}
