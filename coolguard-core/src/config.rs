//! Monitor configuration
//!
//! `MonitorConfig::default()` reproduces the firmware's compiled-in values.
//! On hosts the same structure can be loaded from TOML; every field is
//! optional there and falls back to its default.
//!
//! ```toml
//! sensor_read_interval_ms = 2000
//! temp_min = 24.0
//! temp_max = 32.0
//! topic_base = "lab/"
//!
//! [retry]
//! max_attempts = 5
//! delay_ms = 1000
//! backoff = { exponential = { max_delay_ms = 8000 } }
//! ```

use heapless::String;

use crate::constants::control::{DEFAULT_TEMP_MAX_C, DEFAULT_TEMP_MIN_C, HIGH_TEMP_WARNING_C};
use crate::constants::files::{CSV_FILE_PREFIX, LOG_FILE_PREFIX};
use crate::constants::time::{
    BUTTON_DEBOUNCE_MS, CSV_SAVE_INTERVAL_MS, PHYSICAL_READ_INTERVAL_MS, PUBLISH_INTERVAL_MS,
    RECONNECT_INTERVAL_MS, SENSOR_READ_INTERVAL_MS, STATUS_REPORT_INTERVAL_MS,
};
use crate::constants::topics::DEFAULT_TOPIC_BASE;
use crate::control::{ControlState, Mode};
use crate::errors::{MonitorError, MonitorResult};
use crate::retry::RetryPolicy;
use crate::storage::MAX_PREFIX_LEN;
use crate::synth::ChannelOffsets;

/// Longest topic base accepted
pub const MAX_TOPIC_BASE_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    /// Minimum spacing of samples in the reading buffer
    pub physical_read_interval_ms: u64,
    /// Sensor/control cycle when the hardware timer does not fire first
    pub sensor_read_interval_ms: u64,
    pub publish_interval_ms: u64,
    pub csv_save_interval_ms: u64,
    pub status_report_interval_ms: u64,
    pub debounce_ms: u32,

    /// Initial lower setpoint, °C
    pub temp_min: f32,
    /// Initial upper setpoint, °C
    pub temp_max: f32,
    pub initial_mode: Mode,
    /// Mean temperature that raises the high-temperature warning
    pub high_temp_warning: f32,

    /// Minimum spacing between reconnection rounds
    pub reconnect_interval_ms: u64,
    pub topic_base: String<MAX_TOPIC_BASE_LEN>,

    pub log_file_prefix: String<MAX_PREFIX_LEN>,
    pub csv_file_prefix: String<MAX_PREFIX_LEN>,

    // Tables last so the struct serializes as valid TOML
    pub offsets: ChannelOffsets,
    pub retry: RetryPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            physical_read_interval_ms: PHYSICAL_READ_INTERVAL_MS,
            sensor_read_interval_ms: SENSOR_READ_INTERVAL_MS,
            publish_interval_ms: PUBLISH_INTERVAL_MS,
            csv_save_interval_ms: CSV_SAVE_INTERVAL_MS,
            status_report_interval_ms: STATUS_REPORT_INTERVAL_MS,
            debounce_ms: BUTTON_DEBOUNCE_MS,
            temp_min: DEFAULT_TEMP_MIN_C,
            temp_max: DEFAULT_TEMP_MAX_C,
            initial_mode: Mode::Automatic,
            high_temp_warning: HIGH_TEMP_WARNING_C,
            reconnect_interval_ms: RECONNECT_INTERVAL_MS,
            topic_base: fixed(DEFAULT_TOPIC_BASE),
            log_file_prefix: fixed(LOG_FILE_PREFIX),
            csv_file_prefix: fixed(CSV_FILE_PREFIX),
            offsets: ChannelOffsets::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Compile-time defaults always fit their buffers
fn fixed<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    let _ = out.push_str(s);
    out
}

impl MonitorConfig {
    /// Reject values the scheduler cannot run with
    pub fn validate(&self) -> MonitorResult<()> {
        let intervals = [
            self.physical_read_interval_ms,
            self.sensor_read_interval_ms,
            self.publish_interval_ms,
            self.csv_save_interval_ms,
            self.status_report_interval_ms,
        ];
        if intervals.iter().any(|&ms| ms == 0) {
            return Err(MonitorError::InvalidConfig { reason: "intervals must be non-zero" });
        }

        if !self.temp_min.is_finite() || !self.temp_max.is_finite() {
            return Err(MonitorError::InvalidConfig { reason: "setpoints must be finite" });
        }
        if self.temp_min > self.temp_max {
            return Err(MonitorError::InvalidConfig { reason: "temp_min above temp_max" });
        }
        if !self.high_temp_warning.is_finite() {
            return Err(MonitorError::InvalidConfig { reason: "warning threshold must be finite" });
        }

        if self.retry.max_attempts == 0 {
            return Err(MonitorError::InvalidConfig { reason: "retry needs at least one attempt" });
        }
        if self.topic_base.is_empty() {
            return Err(MonitorError::InvalidConfig { reason: "empty topic base" });
        }
        if self.log_file_prefix.is_empty() || self.csv_file_prefix.is_empty() {
            return Err(MonitorError::InvalidConfig { reason: "empty file prefix" });
        }

        Ok(())
    }

    /// Control state at boot
    pub fn initial_control_state(&self) -> ControlState {
        ControlState {
            mode: self.initial_mode,
            temp_min: self.temp_min,
            temp_max: self.temp_max,
            ..ControlState::default()
        }
    }

    /// Parse and validate a TOML document
    #[cfg(feature = "std")]
    pub fn from_toml_str(source: &str) -> MonitorResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| {
            mon_error!("Config parse error: {}", e);
            MonitorError::InvalidConfig { reason: "malformed TOML" }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// TOML form, e.g. to write out a template
    #[cfg(feature = "std")]
    pub fn to_toml_string(&self) -> MonitorResult<std::string::String> {
        toml::to_string(self).map_err(|_| MonitorError::InvalidConfig { reason: "not representable as TOML" })
    }
}
