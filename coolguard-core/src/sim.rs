//! In-memory collaborators for testing and host simulation
//!
//! Each type implements one of the interface traits without hardware:
//!
//! - `SimulatedProbe`: a [`SensorDriver`] whose reading is set from outside
//! - `MemoryStorage`: a [`Storage`] keeping files as vectors of lines
//! - `LoopbackConnector`: a [`Connector`] recording publishes and replaying
//!   injected commands
//!
//! All three are cheap `Clone` handles over shared state. Hand one clone to
//! the `Monitor` and keep another to drive or inspect it.
//!
//! ## Example
//!
//! ```rust
//! use coolguard_core::sim::{MemoryStorage, SimulatedProbe};
//! use coolguard_core::traits::{SensorDriver, Storage};
//!
//! let probe = SimulatedProbe::new(21.0, 45.0);
//! let mut driver = probe.clone();
//! probe.set(35.0, 40.0);
//! assert_eq!(driver.read_temperature_humidity().temperature, 35.0);
//!
//! let storage = MemoryStorage::new();
//! assert!(storage.is_available());
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::string::{String, ToString};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::vec::Vec;

use crate::errors::{MonitorError, MonitorResult};
use crate::traits::{
    Connector, InboundMessage, LogFile, OpenMode, RawReading, SensorDriver, Storage,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Probe returning whatever was last `set`
#[derive(Debug, Clone)]
pub struct SimulatedProbe {
    reading: Arc<Mutex<RawReading>>,
}

impl SimulatedProbe {
    pub fn new(temperature: f32, humidity: f32) -> Self {
        Self { reading: Arc::new(Mutex::new(RawReading::new(temperature, humidity))) }
    }

    pub fn set(&self, temperature: f32, humidity: f32) {
        *lock(&self.reading) = RawReading::new(temperature, humidity);
    }

    /// Make every following read a fault
    pub fn fail(&self) {
        *lock(&self.reading) = RawReading::fault();
    }
}

impl SensorDriver for SimulatedProbe {
    fn read_temperature_humidity(&mut self) -> RawReading {
        *lock(&self.reading)
    }
}

type FileMap = BTreeMap<String, Vec<String>>;

/// Files held in memory, one `Vec` of lines each
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    files: Arc<Mutex<FileMap>>,
    available: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(FileMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulate inserting or pulling the card
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Pre-create a file
    pub fn insert(&self, name: &str, lines: &[&str]) {
        let lines = lines.iter().map(|l| l.to_string()).collect();
        lock(&self.files).insert(name.to_string(), lines);
    }

    /// Lines of one file, empty if it does not exist
    pub fn lines(&self, name: &str) -> Vec<String> {
        lock(&self.files).get(name).cloned().unwrap_or_default()
    }

    pub fn file_names(&self) -> Vec<String> {
        lock(&self.files).keys().cloned().collect()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle into a `MemoryStorage` file
#[derive(Debug)]
pub struct MemoryFile {
    files: Arc<Mutex<FileMap>>,
    name: String,
}

impl LogFile for MemoryFile {
    fn write_line(&mut self, line: &str) -> MonitorResult<()> {
        lock(&self.files)
            .get_mut(&self.name)
            .ok_or(MonitorError::StorageWrite { reason: "file removed" })?
            .push(line.to_string());
        Ok(())
    }
}

impl Storage for MemoryStorage {
    type File = MemoryFile;

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn exists(&mut self, name: &str) -> bool {
        lock(&self.files).contains_key(name)
    }

    fn open(&mut self, name: &str, mode: OpenMode) -> MonitorResult<MemoryFile> {
        if !self.is_available() {
            return Err(MonitorError::StorageUnavailable { reason: "medium not mounted" });
        }

        let mut files = lock(&self.files);
        let lines = files.entry(name.to_string()).or_default();
        if mode == OpenMode::Truncate {
            lines.clear();
        }

        Ok(MemoryFile { files: Arc::clone(&self.files), name: name.to_string() })
    }
}

#[derive(Debug, Default)]
struct LoopbackState {
    link_up: bool,
    connected: bool,
    refuse_connects: u32,
    connect_attempts: u32,
    subscriptions: Vec<String>,
    published: Vec<(String, Vec<u8>)>,
    inbox: VecDeque<InboundMessage>,
}

/// Broker stand-in
#[derive(Debug, Clone)]
pub struct LoopbackConnector {
    state: Arc<Mutex<LoopbackState>>,
}

impl LoopbackConnector {
    /// Reachable but not yet connected
    pub fn new() -> Self {
        let state = LoopbackState { link_up: true, ..LoopbackState::default() };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Take the link down (drops the session) or bring it back
    pub fn set_link(&self, up: bool) {
        let mut state = lock(&self.state);
        state.link_up = up;
        if !up {
            state.connected = false;
        }
    }

    /// Refuse the next `n` connection attempts
    pub fn refuse_connects(&self, n: u32) {
        lock(&self.state).refuse_connects = n;
    }

    pub fn connect_attempts(&self) -> u32 {
        lock(&self.state).connect_attempts
    }

    /// Queue a message as if the broker had delivered it
    pub fn inject(&self, topic: &str, payload: &[u8]) {
        if let Some(msg) = InboundMessage::new(topic, payload) {
            lock(&self.state).inbox.push_back(msg);
        }
    }

    pub fn subscriptions(&self) -> Vec<String> {
        lock(&self.state).subscriptions.clone()
    }

    /// Every publish so far, oldest first
    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        lock(&self.state).published.clone()
    }

    /// Payloads published to `topic`, as text
    pub fn published_to(&self, topic: &str) -> Vec<String> {
        lock(&self.state)
            .published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| String::from_utf8_lossy(p).into_owned())
            .collect()
    }

    pub fn clear_published(&self) {
        lock(&self.state).published.clear();
    }
}

impl Default for LoopbackConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for LoopbackConnector {
    fn is_connected(&self) -> bool {
        let state = lock(&self.state);
        state.link_up && state.connected
    }

    fn connect(&mut self) -> MonitorResult<()> {
        let mut state = lock(&self.state);
        state.connect_attempts += 1;

        if !state.link_up {
            return Err(MonitorError::NotConnected);
        }
        if state.refuse_connects > 0 {
            state.refuse_connects -= 1;
            return Err(MonitorError::NotConnected);
        }

        state.connected = true;
        state.subscriptions.clear();
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> MonitorResult<()> {
        let mut state = lock(&self.state);
        if !state.connected {
            return Err(MonitorError::NotConnected);
        }
        state.subscriptions.push(topic.to_string());
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> MonitorResult<()> {
        let mut state = lock(&self.state);
        if !(state.link_up && state.connected) {
            return Err(MonitorError::NotConnected);
        }
        state.published.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    fn poll_message(&mut self) -> Option<InboundMessage> {
        let mut state = lock(&self.state);
        if !state.connected {
            return None;
        }
        state.inbox.pop_front()
    }
}
