//! Interfaces to the outside world
//!
//! The core never talks to hardware or sockets directly. Each external
//! collaborator is a narrow trait, and the scheduler owns one instance of
//! each. Keep them simple - embedded devices don't need complex abstractions.

use heapless::{String, Vec};

use crate::constants::buffers::{MAX_COMMAND_PAYLOAD, MAX_TOPIC_LEN};
use crate::errors::MonitorResult;

/// One temperature/humidity pair from the physical probe
///
/// Either field may be NaN when the probe times out or fails its checksum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    /// Degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: f32,
}

impl RawReading {
    pub const fn new(temperature: f32, humidity: f32) -> Self {
        Self { temperature, humidity }
    }

    /// A fault reading (both fields NaN)
    pub const fn fault() -> Self {
        Self { temperature: f32::NAN, humidity: f32::NAN }
    }

    /// Both fields are usable numbers
    pub fn is_valid(&self) -> bool {
        self.temperature.is_valid() && self.humidity.is_valid()
    }
}

/// Trait for values that can be checked before use
pub trait Validatable {
    /// Check if the value is physically valid (not NaN, infinite, etc)
    fn is_valid(&self) -> bool;
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

/// The physical temperature/humidity probe
pub trait SensorDriver {
    /// Blocking read of both quantities. NaN fields signal a fault.
    fn read_temperature_humidity(&mut self) -> RawReading;
}

/// How a file is opened on the storage medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create if missing, write at the end
    Append,
    /// Create or truncate
    Truncate,
}

/// An open file accepting whole lines
pub trait LogFile {
    /// Append `line` followed by a newline
    fn write_line(&mut self, line: &str) -> MonitorResult<()>;
}

/// Removable storage (SD card, host directory)
pub trait Storage {
    type File: LogFile;

    /// Medium mounted and usable
    fn is_available(&self) -> bool;

    /// A file with this name already exists
    fn exists(&mut self, name: &str) -> bool;

    /// Open a file; the handle is dropped after each write batch
    fn open(&mut self, name: &str, mode: OpenMode) -> MonitorResult<Self::File>;
}

/// A message received on a subscribed topic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String<MAX_TOPIC_LEN>,
    pub payload: Vec<u8, MAX_COMMAND_PAYLOAD>,
}

impl InboundMessage {
    /// Build from borrowed parts.
    ///
    /// Returns `None` when the topic or the payload does not fit. No valid
    /// command is that long, and a cut-down payload could parse as one.
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        let topic = String::try_from(topic).ok()?;
        let payload = Vec::from_slice(payload).ok()?;
        Some(Self { topic, payload })
    }
}

/// Publish/subscribe network link (MQTT over Wi-Fi on the target)
pub trait Connector {
    /// Link and session are both up
    fn is_connected(&self) -> bool;

    /// One connection attempt; retries are the caller's business
    fn connect(&mut self) -> MonitorResult<()>;

    /// Subscribe to a command topic
    fn subscribe(&mut self, topic: &str) -> MonitorResult<()>;

    /// Publish one payload
    fn publish(&mut self, topic: &str, payload: &[u8]) -> MonitorResult<()>;

    /// Next pending inbound message, without blocking
    fn poll_message(&mut self) -> Option<InboundMessage>;
}
