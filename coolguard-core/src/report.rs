//! Outbound text: topics, telemetry payloads, CSV rows and status reports
//!
//! Everything here formats into fixed-capacity `heapless::String`s except
//! the JSON status document, which needs `serde_json` and an allocator.

use core::fmt::{self, Write};

use heapless::String;

use crate::aggregate::Aggregate;
use crate::constants::buffers::{MAX_LINE_LEN, MAX_NUMBER_PAYLOAD, MAX_TOPIC_LEN};
use crate::constants::time::MS_PER_SECOND;
use crate::constants::topics::{ACTUATOR_STATE, EMERGENCY_STATE, MODE_STATE, SENSOR_PREFIX};
use crate::control::{ControlState, Mode};
use crate::errors::{MonitorError, MonitorResult};
use crate::synth::SensorReading;
use crate::time::{DateTime, Timestamp};

pub type Topic = String<MAX_TOPIC_LEN>;
pub type Line = String<MAX_LINE_LEN>;

fn format_into<const N: usize>(args: fmt::Arguments<'_>) -> MonitorResult<String<N>> {
    let mut out = String::new();
    out.write_fmt(args).map_err(|_| MonitorError::CapacityExceeded)?;
    Ok(out)
}

/// `<base><suffix>`
pub fn topic(base: &str, suffix: &str) -> MonitorResult<Topic> {
    format_into(format_args!("{}{}", base, suffix))
}

/// `<base>sensor<id><suffix>`
pub fn channel_topic(base: &str, id: u8, suffix: &str) -> MonitorResult<Topic> {
    format_into(format_args!("{}{}{}{}", base, SENSOR_PREFIX, id, suffix))
}

/// One decimal, e.g. `23.4`
pub fn number_payload(value: f32) -> MonitorResult<String<MAX_NUMBER_PAYLOAD>> {
    format_into(format_args!("{:.1}", value))
}

/// `<ts>,sensor<id>,<STATE>,<temperature>`
pub fn csv_channel_row(at: &DateTime, reading: &SensorReading) -> MonitorResult<Line> {
    format_into(format_args!(
        "{},{}{},{},{:.1}",
        at,
        SENSOR_PREFIX,
        reading.id,
        reading.state.as_str(),
        reading.temperature
    ))
}

/// `<ts>,vent<n>,ON|OFF`, one row per ventilator
pub fn csv_actuator_rows(at: &DateTime, on: bool) -> MonitorResult<[Line; 2]> {
    let state = on_off(on);
    Ok([
        format_into(format_args!("{},vent1,{}", at, state))?,
        format_into(format_args!("{},vent2,{}", at, state))?,
    ])
}

pub(crate) const fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

const fn ok_nok(ok: bool) -> &'static str {
    if ok { "OK" } else { "NOK" }
}

/// Emergency flag as published on `estado/emergencia`
pub const fn emergency_payload(active: bool) -> &'static str {
    if active { "1" } else { "0" }
}

/// `estado/*` topic and payload pairs for the current control state
pub fn control_state_payloads(base: &str, state: &ControlState) -> MonitorResult<[(Topic, &'static str); 3]> {
    Ok([
        (topic(base, MODE_STATE)?, state.mode.as_str()),
        (topic(base, EMERGENCY_STATE)?, emergency_payload(state.emergency)),
        (topic(base, ACTUATOR_STATE)?, on_off(state.actuators_on)),
    ])
}

/// Storage medium state as published on `memoria/estado`
pub const fn storage_payload(available: bool) -> &'static str {
    ok_nok(available)
}

/// One entry of the `sensores/estado` document
#[cfg(feature = "serde")]
#[derive(Debug, serde::Serialize)]
struct ChannelStatus {
    id: u8,
    status: crate::synth::SensorState,
    temperatura: f32,
    humidade: f32,
}

#[cfg(feature = "serde")]
#[derive(Debug, serde::Serialize)]
struct SensorStatusDoc<'a> {
    sensores: &'a [ChannelStatus],
}

#[cfg(feature = "serde")]
fn one_decimal(v: f32) -> f32 {
    libm::roundf(v * 10.0) / 10.0
}

/// `{"sensores":[{"id":1,"status":"OK","temperatura":21.0,"humidade":45.0},...]}`
#[cfg(feature = "serde")]
pub fn sensor_status_json(channels: &[SensorReading]) -> MonitorResult<alloc::string::String> {
    let entries: heapless::Vec<ChannelStatus, { crate::constants::NUM_VIRTUAL_CHANNELS }> = channels
        .iter()
        .map(|c| ChannelStatus {
            id: c.id,
            status: c.state,
            temperatura: one_decimal(c.temperature),
            humidade: one_decimal(c.humidity),
        })
        .take(crate::constants::NUM_VIRTUAL_CHANNELS)
        .collect();

    serde_json::to_string(&SensorStatusDoc { sensores: &entries })
        .map_err(|_| MonitorError::CapacityExceeded)
}

/// Snapshot of the whole monitor for the periodic report
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusReport {
    pub at: DateTime,
    pub uptime_s: u64,
    pub mode: Mode,
    pub emergency: bool,
    pub actuators_on: bool,
    pub temp_min: f32,
    pub temp_max: f32,
    pub mean_temperature: f32,
    pub mean_humidity: f32,
    pub median_temperature: f32,
    pub ok_channels: usize,
    pub network_ok: bool,
    pub storage_ok: bool,
}

impl StatusReport {
    pub fn new(
        at: DateTime,
        now: Timestamp,
        control: &ControlState,
        aggregate: &Aggregate,
        network_ok: bool,
        storage_ok: bool,
    ) -> Self {
        Self {
            at,
            uptime_s: now / MS_PER_SECOND,
            mode: control.mode,
            emergency: control.emergency,
            actuators_on: control.actuators_on,
            temp_min: control.temp_min,
            temp_max: control.temp_max,
            mean_temperature: aggregate.mean_temperature,
            mean_humidity: aggregate.mean_humidity,
            median_temperature: aggregate.median_temperature,
            ok_channels: aggregate.ok_channels,
            network_ok,
            storage_ok,
        }
    }

    /// One-line summary persisted with every CSV snapshot
    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }
}

/// Console form
impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Status Report: Mode: {} | Emergency: {} | Temp: {:.1}°C ({:.1}-{:.1}) | Humidity: {:.1}% | Actuators: {} | MQTT: {} | SD: {}",
            self.mode.as_str(),
            if self.emergency { "YES" } else { "NO" },
            self.mean_temperature,
            self.temp_min,
            self.temp_max,
            self.mean_humidity,
            on_off(self.actuators_on),
            ok_nok(self.network_ok),
            ok_nok(self.storage_ok),
        )
    }
}

/// `System status - Mode: AUTO, Emergency: OFF, Actuators: ON, Avg Temp: 31.2°C`
pub struct Summary<'a>(&'a StatusReport);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "System status - Mode: {}, Emergency: {}, Actuators: {}, Avg Temp: {:.1}°C",
            self.0.mode.as_str(),
            on_off(self.0.emergency),
            on_off(self.0.actuators_on),
            self.0.mean_temperature
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::SensorState;

    const AT: DateTime = DateTime::new(2025, 7, 25, 14, 3, 9);

    fn reading(id: u8, temperature: f32, state: SensorState) -> SensorReading {
        SensorReading { id, temperature, humidity: 45.04, state, last_update: 0 }
    }

    #[test]
    fn topics() {
        assert_eq!(
            channel_topic("sala_maquinas/", 3, "/temperatura").unwrap().as_str(),
            "sala_maquinas/sensor3/temperatura"
        );
        assert_eq!(topic("x/", "sistema/log").unwrap().as_str(), "x/sistema/log");

        let long_base = "b".repeat(MAX_TOPIC_LEN);
        assert_eq!(topic(&long_base, "y"), Err(MonitorError::CapacityExceeded));
    }

    #[test]
    fn number_has_one_decimal() {
        assert_eq!(number_payload(23.46).unwrap().as_str(), "23.5");
        assert_eq!(number_payload(-4.0).unwrap().as_str(), "-4.0");
    }

    #[test]
    fn control_state_topics() {
        let state = ControlState { mode: Mode::Manual, emergency: true, ..ControlState::default() };
        let [mode, emergency, actuators] = control_state_payloads("sala_maquinas/", &state).unwrap();

        assert_eq!((mode.0.as_str(), mode.1), ("sala_maquinas/estado/modo", "MANUAL"));
        assert_eq!((emergency.0.as_str(), emergency.1), ("sala_maquinas/estado/emergencia", "1"));
        assert_eq!((actuators.0.as_str(), actuators.1), ("sala_maquinas/estado/atuadores", "OFF"));
    }

    #[test]
    fn csv_rows() {
        let row = csv_channel_row(&AT, &reading(2, 20.54, SensorState::Nok)).unwrap();
        assert_eq!(row.as_str(), "2025-07-25T14:03:09Z,sensor2,NOK,20.5");

        let [a, b] = csv_actuator_rows(&AT, true).unwrap();
        assert_eq!(a.as_str(), "2025-07-25T14:03:09Z,vent1,ON");
        assert_eq!(b.as_str(), "2025-07-25T14:03:09Z,vent2,ON");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn status_json() {
        let json = sensor_status_json(&[
            reading(1, 21.04, SensorState::Ok),
            reading(2, 0.0, SensorState::Disconnected),
        ])
        .unwrap();
        assert_eq!(
            json,
            r#"{"sensores":[{"id":1,"status":"OK","temperatura":21.0,"humidade":45.0},{"id":2,"status":"DISCONNECTED","temperatura":0.0,"humidade":45.0}]}"#
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn report_lines() {
        let control = ControlState { actuators_on: true, ..ControlState::default() };
        let aggregate = Aggregate {
            mean_temperature: 31.24,
            mean_humidity: 40.0,
            median_temperature: 31.0,
            median_humidity: 40.0,
            ok_channels: 4,
        };
        let report = StatusReport::new(AT, 65_000, &control, &aggregate, false, true);

        assert_eq!(report.uptime_s, 65);
        assert_eq!(
            report.summary().to_string(),
            "System status - Mode: AUTO, Emergency: OFF, Actuators: ON, Avg Temp: 31.2°C"
        );
        assert_eq!(
            report.to_string(),
            "Status Report: Mode: AUTO | Emergency: NO | Temp: 31.2°C (25.0-30.0) | Humidity: 40.0% | Actuators: ON | MQTT: NOK | SD: OK"
        );
    }
}
