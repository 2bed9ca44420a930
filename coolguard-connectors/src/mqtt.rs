//! MQTT connector backed by `rumqttc`
//!
//! Uses the blocking `Client`/`Connection` pair and drives the event loop
//! from the caller's thread, in bounded slices:
//!
//! ```text
//! connect()       new session, pump until CONNACK or connect_timeout_ms
//! subscribe()     queue SUBSCRIBE         ─┐
//! publish()       queue PUBLISH (QoS 0)   ─┼─ flushed by the next pump
//! poll_message()  pump ≤ poll_timeout_ms ─┘  inbound PUBLISH → inbox
//! ```
//!
//! A connection error drops the session. Reconnecting is left to the
//! monitor's retry policy rather than `rumqttc`'s own reconnect loop, so
//! the retry budget stays in one place.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use coolguard_core::errors::{MonitorError, MonitorResult};
use coolguard_core::traits::{Connector, InboundMessage};
use log::{debug, info, warn};
use rumqttc::{Client, ConnectReturnCode, Connection, Event, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};

use crate::{ConnectionStats, ConnectorError};

/// Events handled per pump before control returns to the monitor
const MAX_EVENTS_PER_PUMP: usize = 64;

/// rumqttc refuses keep-alive intervals shorter than this
const MIN_KEEP_ALIVE_S: u64 = 5;

/// Broker and session settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub keep_alive_s: u64,
    /// Longest a single `connect()` may block
    pub connect_timeout_ms: u64,
    /// Longest a single `poll_message()` may block waiting for traffic
    pub poll_timeout_ms: u64,
    /// Request queue depth between client and event loop
    pub capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 1883,
            client_id: "coolguard-monitor".into(),
            username: None,
            password: None,
            keep_alive_s: 15,
            connect_timeout_ms: 3000,
            poll_timeout_ms: 20,
            capacity: 64,
        }
    }
}

impl MqttConfig {
    fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(self.client_id.clone(), self.host.clone(), self.port);
        options.set_keep_alive(Duration::from_secs(self.keep_alive_s.max(MIN_KEEP_ALIVE_S)));
        options.set_clean_session(true);
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            options.set_credentials(user.clone(), pass.clone());
        }
        options
    }
}

struct Session {
    client: Client,
    connection: Connection,
    connected: bool,
}

/// `Connector` over a real MQTT broker
pub struct MqttConnector {
    config: MqttConfig,
    session: Option<Session>,
    inbox: VecDeque<InboundMessage>,
    stats: ConnectionStats,
    ever_connected: bool,
}

impl MqttConnector {
    /// No network traffic happens until `connect()`
    pub fn new(config: MqttConfig) -> Self {
        Self {
            config,
            session: None,
            inbox: VecDeque::new(),
            stats: ConnectionStats::default(),
            ever_connected: false,
        }
    }

    pub fn config(&self) -> &MqttConfig {
        &self.config
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Send DISCONNECT (best effort) and drop the session
    pub fn disconnect(&mut self) {
        let sent = match self.session.as_mut() {
            Some(s) if s.connected => s.client.try_disconnect().is_ok(),
            _ => false,
        };
        if sent {
            self.pump(Duration::from_millis(self.config.poll_timeout_ms));
        }
        self.session = None;
    }

    fn try_connect(&mut self) -> Result<(), ConnectorError> {
        self.session = None;
        let (client, connection) = Client::new(self.config.options(), self.config.capacity.max(1));
        let mut session = Session { client, connection, connected: false };

        let timeout = Duration::from_millis(self.config.connect_timeout_ms);
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ConnectorError::Timeout(self.config.connect_timeout_ms));
            }

            match session.connection.recv_timeout(remaining) {
                Ok(Ok(Event::Incoming(Packet::ConnAck(ack)))) => {
                    if ack.code != ConnectReturnCode::Success {
                        return Err(ConnectorError::ProtocolError(format!("broker refused: {:?}", ack.code)));
                    }
                    session.connected = true;
                    break;
                }
                Ok(Ok(_)) => continue,
                Ok(Err(e)) => return Err(ConnectorError::ConnectionFailed(e.to_string())),
                Err(_) => return Err(ConnectorError::Timeout(self.config.connect_timeout_ms)),
            }
        }

        if self.ever_connected {
            self.stats.reconnections += 1;
        }
        self.ever_connected = true;
        self.session = Some(session);
        Ok(())
    }

    /// Run the event loop until it goes quiet for `wait`
    fn pump(&mut self, wait: Duration) {
        let Some(session) = self.session.as_mut() else { return };

        for _ in 0..MAX_EVENTS_PER_PUMP {
            match session.connection.recv_timeout(wait) {
                Ok(Ok(Event::Incoming(Packet::Publish(p)))) => {
                    self.stats.messages_received += 1;
                    match InboundMessage::new(&p.topic, &p.payload) {
                        Some(msg) => self.inbox.push_back(msg),
                        None => debug!("Dropping oversized message on {}", p.topic),
                    }
                }
                Ok(Ok(Event::Incoming(Packet::Disconnect))) => {
                    warn!("Broker closed the session");
                    session.connected = false;
                    break;
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    warn!("MQTT connection error: {}", e);
                    self.stats.last_error = Some(e.to_string());
                    session.connected = false;
                    break;
                }
                Err(_) => break,
            }
        }

        if !session.connected {
            self.session = None;
        }
    }

    fn session(&mut self) -> Result<&mut Session, ConnectorError> {
        match self.session.as_mut() {
            Some(s) if s.connected => Ok(s),
            _ => Err(ConnectorError::NotConnected),
        }
    }

    fn record_failure(&mut self, err: &ConnectorError) {
        self.stats.messages_failed += 1;
        self.stats.last_error = Some(err.to_string());
    }
}

impl Connector for MqttConnector {
    fn is_connected(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.connected)
    }

    fn connect(&mut self) -> MonitorResult<()> {
        info!("Connecting to MQTT broker {}:{}", self.config.host, self.config.port);
        self.try_connect().map_err(|e| {
            warn!("MQTT connect failed: {}", e);
            self.stats.last_error = Some(e.to_string());
            self.session = None;
            MonitorError::from(e)
        })
    }

    fn subscribe(&mut self, topic: &str) -> MonitorResult<()> {
        let session = self.session()?;
        session
            .client
            .try_subscribe(topic, QoS::AtMostOnce)
            .map_err(|e| ConnectorError::ProtocolError(e.to_string()))?;
        debug!("Subscribed to {}", topic);
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> MonitorResult<()> {
        let queued = self.session().and_then(|s| {
            s.client
                .try_publish(topic, QoS::AtMostOnce, false, payload.to_vec())
                .map_err(|e| ConnectorError::ProtocolError(e.to_string()))
        });

        match queued {
            Ok(()) => {
                self.stats.messages_sent += 1;
                self.stats.bytes_sent += payload.len() as u64;
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err);
                Err(err.into())
            }
        }
    }

    fn poll_message(&mut self) -> Option<InboundMessage> {
        if self.inbox.is_empty() {
            self.pump(Duration::from_millis(self.config.poll_timeout_ms));
        }
        self.inbox.pop_front()
    }
}

impl Drop for MqttConnector {
    fn drop(&mut self) {
        self.disconnect();
    }
}
