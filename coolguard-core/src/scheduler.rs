//! The main loop
//!
//! ## Overview
//!
//! `Monitor` owns every piece of state and every external collaborator.
//! The firmware (or the host demo) calls `run_once` as fast as it likes;
//! each call performs one pass in a fixed order:
//!
//! ```text
//!  1. interrupts     emergency toggle, then mode toggle
//!  2. commands       inbound messages → ActuatorControl
//!  3. sampling       probe → ReadingBuffer            (every 100 ms)
//!  4. sensor cycle   latest sample → synth → aggregate → alarm → control
//!                                                     (timer tick or every 5 s)
//!  5. connection     bounded retry round              (at most every 30 s)
//!  6. publish        telemetry + control state        (every 5 s)
//!  7. CSV            channel rows + status line       (every 60 s)
//!  8. status         console report                   (every 10 s)
//! ```
//!
//! The probe is only read by the sampling step. The sensor cycle
//! synthesizes the virtual channels from the most recent sample, so the
//! channels and the median buffer always describe the same readings.
//!
//! Nothing here is fatal. Sensor, storage and network faults are logged,
//! collected in the returned `CycleReport`, and the pass carries on.
//!
//! ## No usable temperature
//!
//! When no channel is `Ok` the mean is the `0.0` sentinel. It is never fed
//! to the hysteresis comparison; the control layer only enforces emergency
//! and otherwise holds its state until real data returns.
//!
//! ## Example
//!
//! ```rust
//! use coolguard_core::config::MonitorConfig;
//! use coolguard_core::interrupts::PendingInterrupts;
//! use coolguard_core::scheduler::{Monitor, MonitorIo};
//! use coolguard_core::sim::{LoopbackConnector, MemoryStorage, SimulatedProbe};
//! use coolguard_core::synth::NoJitter;
//! use coolguard_core::time::FixedWallClock;
//!
//! # struct NoDelay;
//! # impl embedded_hal::delay::DelayNs for NoDelay { fn delay_ns(&mut self, _: u32) {} }
//! let io = MonitorIo {
//!     sensor: SimulatedProbe::new(32.0, 40.0),
//!     jitter: NoJitter,
//!     storage: MemoryStorage::new(),
//!     connector: LoopbackConnector::new(),
//!     clock: FixedWallClock::default(),
//!     delay: NoDelay,
//! };
//! let mut monitor = Monitor::new(MonitorConfig::default(), io).unwrap();
//! monitor.run_once(0, PendingInterrupts::default());
//! assert!(monitor.control().actuators_on());
//! ```

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::aggregate::Aggregate;
use crate::buffer::{ReadingBuffer, RecordOutcome};
use crate::commands::Command;
use crate::config::MonitorConfig;
use crate::constants::buffers::{MAX_COMMANDS_PER_PASS, MAX_EVENTS_PER_PASS, READING_BUFFER_CAPACITY};
use crate::constants::files::{CSV_FILE_EXT, CSV_HEADER, LOG_FILE_EXT};
use crate::constants::topics::{
    COMMAND_TOPICS, HUMIDITY_SUFFIX, STORAGE_STATUS, SYSTEM_LOG, TEMPERATURE_SUFFIX,
};
use crate::control::{ActuatorControl, HighTempAlarm};
use crate::errors::{MonitorError, MonitorResult};
use crate::events::{ControlEvent, Severity};
use crate::interrupts::PendingInterrupts;
use crate::report::{self, StatusReport};
use crate::retry::{ReconnectSchedule, RetryOutcome};
use crate::storage::DataLogger;
use crate::synth::{JitterSource, SensorReading, VirtualSensorArray};
use crate::time::{is_due, Timestamp, WallClock};
use crate::traits::{Connector, RawReading, SensorDriver, Storage};

/// External collaborators handed to the monitor
pub struct MonitorIo<D, J, S, C, W, Y> {
    /// Physical temperature/humidity probe
    pub sensor: D,
    /// Jitter for the derived channels
    pub jitter: J,
    /// Log/CSV medium
    pub storage: S,
    /// Publish/subscribe link
    pub connector: C,
    /// Calendar time for log and CSV stamps
    pub clock: W,
    /// Blocking delay between connection attempts
    pub delay: Y,
}

/// What one pass did
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub interrupts: PendingInterrupts,
    pub commands_applied: usize,
    /// A sample went into the reading buffer
    pub sampled: bool,
    /// Synthesis and control evaluation ran
    pub sensor_cycle: bool,
    pub events: Vec<ControlEvent, MAX_EVENTS_PER_PASS>,
    pub connected: bool,
    pub published: bool,
    pub csv_saved: bool,
    pub status: Option<StatusReport>,
    /// Non-fatal faults hit during the pass
    pub faults: Vec<MonitorError, MAX_EVENTS_PER_PASS>,
}

impl CycleReport {
    fn fault(&mut self, err: MonitorError) {
        let _ = self.faults.push(err);
    }
}

/// Interval bookkeeping
#[derive(Debug, Clone, Default)]
struct Timers {
    sensor_cycle: Option<Timestamp>,
    publish: Option<Timestamp>,
    csv: Option<Timestamp>,
    status: Option<Timestamp>,
}

pub struct Monitor<D, J, S, C, W, Y> {
    config: MonitorConfig,
    sensor: D,
    storage: S,
    connector: C,
    clock: W,
    delay: Y,

    buffer: ReadingBuffer<READING_BUFFER_CAPACITY>,
    /// Last probe reading, valid or not
    latest: Option<RawReading>,
    channels: VirtualSensorArray<J>,
    aggregate: Aggregate,
    control: ActuatorControl,
    alarm: HighTempAlarm,

    log: DataLogger,
    csv: DataLogger,

    reconnect: ReconnectSchedule,
    was_connected: bool,
    timers: Timers,
    started: bool,
}

impl<D, J, S, C, W, Y> Monitor<D, J, S, C, W, Y>
where
    D: SensorDriver,
    J: JitterSource,
    S: Storage,
    C: Connector,
    W: WallClock,
    Y: DelayNs,
{
    /// Validate `config` and assemble the monitor; no I/O happens yet
    pub fn new(config: MonitorConfig, io: MonitorIo<D, J, S, C, W, Y>) -> MonitorResult<Self> {
        config.validate()?;

        let MonitorIo { sensor, jitter, storage, connector, clock, delay } = io;
        let log = DataLogger::new(&config.log_file_prefix, LOG_FILE_EXT)?;
        let csv = DataLogger::new(&config.csv_file_prefix, CSV_FILE_EXT)?;

        Ok(Self {
            buffer: ReadingBuffer::new(config.physical_read_interval_ms),
            latest: None,
            channels: VirtualSensorArray::new(config.offsets, jitter),
            aggregate: Aggregate::default(),
            control: ActuatorControl::new(config.initial_control_state()),
            alarm: HighTempAlarm::new(config.high_temp_warning),
            reconnect: ReconnectSchedule::new(config.reconnect_interval_ms),
            log,
            csv,
            config,
            sensor,
            storage,
            connector,
            clock,
            delay,
            was_connected: false,
            timers: Timers::default(),
            started: false,
        })
    }

    /// Boot-time I/O: pick log files and write the CSV header
    ///
    /// Called automatically by the first `run_once`. Periodic CSV and
    /// status timers start counting from `now`.
    pub fn start(&mut self, now: Timestamp) {
        if self.started {
            return;
        }
        self.started = true;
        self.timers.csv = Some(now);
        self.timers.status = Some(now);

        if let Err(err) = self.prepare_files() {
            mon_warn!("Storage not ready: {}", err);
        }
        self.write_log(Severity::Info, &"System initialization complete");
        mon_info!("System initialization complete");
    }

    /// One pass of the main loop
    pub fn run_once(&mut self, now: Timestamp, interrupts: PendingInterrupts) -> CycleReport {
        self.start(now);

        let mut report = CycleReport { interrupts, ..CycleReport::default() };

        self.handle_interrupts(interrupts, &mut report);
        self.handle_commands(&mut report);
        self.sample(now, &mut report);

        if interrupts.timer_fired
            || is_due(now, self.timers.sensor_cycle, self.config.sensor_read_interval_ms)
        {
            self.timers.sensor_cycle = Some(now);
            self.sensor_cycle(now, &mut report);
        }

        self.maintain_connection(now, &mut report);
        report.connected = self.connector.is_connected();

        if report.connected && is_due(now, self.timers.publish, self.config.publish_interval_ms) {
            self.timers.publish = Some(now);
            report.published = self.publish_telemetry(&mut report);
        }

        if is_due(now, self.timers.csv, self.config.csv_save_interval_ms) {
            self.timers.csv = Some(now);
            report.csv_saved = self.save_csv(now, &mut report);
        }

        if is_due(now, self.timers.status, self.config.status_report_interval_ms) {
            self.timers.status = Some(now);
            let status = self.status(now);
            mon_info!("{}", status);
            report.status = Some(status);
        }

        report
    }

    fn handle_interrupts(&mut self, pending: PendingInterrupts, report: &mut CycleReport) {
        if pending.emergency_pressed {
            if let Some(event) = self.control.toggle_emergency() {
                self.dispatch(event, report);
            }
        }
        if pending.mode_pressed {
            let event = self.control.toggle_mode();
            self.dispatch(event, report);
        }
    }

    fn handle_commands(&mut self, report: &mut CycleReport) {
        if !self.connector.is_connected() {
            return;
        }

        for _ in 0..MAX_COMMANDS_PER_PASS {
            let Some(msg) = self.connector.poll_message() else { break };

            match Command::parse(&self.config.topic_base, &msg) {
                Some(command) => {
                    mon_debug!("Command {:?} on {}", command, msg.topic.as_str());
                    report.commands_applied += 1;
                    if let Some(event) = command.apply(&mut self.control) {
                        self.dispatch(event, report);
                    }
                }
                None => mon_debug!("Ignoring message on {}", msg.topic.as_str()),
            }
        }
    }

    /// Apply a command from a local source (console, tests)
    pub fn handle_command(&mut self, command: Command) -> Option<ControlEvent> {
        let event = command.apply(&mut self.control)?;
        let mut scratch = CycleReport::default();
        self.dispatch(event, &mut scratch);
        Some(event)
    }

    fn sample(&mut self, now: Timestamp, report: &mut CycleReport) {
        if !self.buffer.accepts_at(now) {
            return;
        }
        let raw = self.sensor.read_temperature_humidity();
        self.latest = Some(raw);
        report.sampled = self.buffer.record(raw, now) == RecordOutcome::Recorded;
    }

    fn sensor_cycle(&mut self, now: Timestamp, report: &mut CycleReport) {
        report.sensor_cycle = true;

        let raw = match self.latest {
            Some(raw) => raw,
            None => {
                let raw = self.sensor.read_temperature_humidity();
                self.latest = Some(raw);
                raw
            }
        };
        if let Err(err) = self.channels.synthesize(raw, now) {
            report.fault(err);
            self.write_log(Severity::Error, &"Failed to read from physical sensor!");
        }

        self.aggregate = Aggregate::compute(self.channels.channels(), &self.buffer);

        if !self.aggregate.has_data() {
            self.control.hold();
            return;
        }

        let mean = self.aggregate.mean_temperature;
        if let Some(event) = self.alarm.update(mean) {
            self.dispatch(event, report);
        }
        if let Some(event) = self.control.evaluate(mean) {
            self.dispatch(event, report);
        }
    }

    fn maintain_connection(&mut self, now: Timestamp, report: &mut CycleReport) {
        if self.connector.is_connected() {
            return;
        }

        if self.was_connected {
            self.was_connected = false;
            mon_warn!("Network connection lost");
            self.write_log(Severity::Warning, &"Network connection lost");
            self.reconnect.reset();
        }

        if !self.reconnect.poll(now) {
            return;
        }

        let policy = self.config.retry;
        let connector = &mut self.connector;
        let outcome = policy.execute(&mut self.delay, |_| connector.connect());

        match outcome {
            RetryOutcome::Succeeded { attempts, .. } => {
                mon_info!("Connected after {} attempt(s)", attempts);
                self.was_connected = true;
                self.reconnect.reset();
                if let Err(err) = self.on_connected() {
                    report.fault(err);
                }
                self.write_log(Severity::Info, &"Network connected");
            }
            RetryOutcome::Exhausted { attempts, .. } => {
                report.fault(MonitorError::RetriesExhausted { attempts });
            }
        }
    }

    /// Subscriptions and the start-up announcement after each connect
    fn on_connected(&mut self) -> MonitorResult<()> {
        for suffix in COMMAND_TOPICS {
            let topic = report::topic(&self.config.topic_base, suffix)?;
            self.connector.subscribe(&topic)?;
        }
        let topic = report::topic(&self.config.topic_base, SYSTEM_LOG)?;
        self.connector.publish(&topic, b"System started")
    }

    fn publish_telemetry(&mut self, report: &mut CycleReport) -> bool {
        match self.try_publish() {
            Ok(()) => {
                mon_debug!("Published MQTT data. Avg temp: {:.1}°C", self.aggregate.mean_temperature);
                true
            }
            Err(err) => {
                mon_warn!("Publish failed: {}", err);
                report.fault(err);
                false
            }
        }
    }

    fn try_publish(&mut self) -> MonitorResult<()> {
        let base = &self.config.topic_base;

        for ch in self.channels.channels() {
            let topic = report::channel_topic(base, ch.id, TEMPERATURE_SUFFIX)?;
            self.connector.publish(&topic, report::number_payload(ch.temperature)?.as_bytes())?;

            let topic = report::channel_topic(base, ch.id, HUMIDITY_SUFFIX)?;
            self.connector.publish(&topic, report::number_payload(ch.humidity)?.as_bytes())?;
        }

        #[cfg(feature = "serde")]
        {
            let topic = report::topic(base, crate::constants::topics::SENSOR_STATUS)?;
            let json = report::sensor_status_json(self.channels.channels())?;
            self.connector.publish(&topic, json.as_bytes())?;
        }

        for (topic, payload) in report::control_state_payloads(base, self.control.state())? {
            self.connector.publish(&topic, payload.as_bytes())?;
        }

        let topic = report::topic(base, STORAGE_STATUS)?;
        let payload = report::storage_payload(self.storage.is_available());
        self.connector.publish(&topic, payload.as_bytes())
    }

    fn save_csv(&mut self, now: Timestamp, report: &mut CycleReport) -> bool {
        if let Err(err) = self.prepare_files() {
            report.fault(err);
            return false;
        }

        let at = self.clock.now();
        for ch in self.channels.channels() {
            let written = report::csv_channel_row(&at, ch)
                .and_then(|row| self.csv.append(&mut self.storage, &row));
            if let Err(err) = written {
                mon_warn!("CSV write failed: {}", err);
                report.fault(err);
                return false;
            }
        }

        let status = self.status(now);
        self.write_log(Severity::Info, &status.summary());
        true
    }

    fn status(&self, now: Timestamp) -> StatusReport {
        StatusReport::new(
            self.clock.now(),
            now,
            self.control.state(),
            &self.aggregate,
            self.connector.is_connected(),
            self.storage.is_available(),
        )
    }

    /// Log, persist and record one control event
    fn dispatch(&mut self, event: ControlEvent, report: &mut CycleReport) {
        match event.severity() {
            Severity::Warning | Severity::Error => mon_warn!("{}", event),
            _ => mon_info!("{}", event),
        }

        self.write_log(event.severity(), &event);

        if let Some(on) = event.actuator_state() {
            if let Err(err) = self.write_actuator_rows(on) {
                report.fault(err);
            }
        }

        let _ = report.events.push(event);
    }

    fn write_actuator_rows(&mut self, on: bool) -> MonitorResult<()> {
        self.prepare_files()?;
        for row in report::csv_actuator_rows(&self.clock.now(), on)? {
            self.csv.append(&mut self.storage, &row)?;
        }
        Ok(())
    }

    /// Persist one log line; storage faults only cost this line
    fn write_log(&mut self, severity: Severity, message: &dyn core::fmt::Display) {
        if self.prepare_files().is_err() {
            return;
        }
        let at = self.clock.now();
        if let Err(err) = self.log.log(&mut self.storage, &at, severity, message) {
            mon_debug!("Log write skipped: {}", err);
        }
    }

    /// Select log/CSV files if the medium appeared since the last try
    fn prepare_files(&mut self) -> MonitorResult<()> {
        if !self.storage.is_available() {
            return Err(MonitorError::StorageUnavailable { reason: "medium not mounted" });
        }
        if !self.log.is_ready() {
            self.log.open_next(&mut self.storage)?;
        }
        if !self.csv.is_ready() {
            self.csv.open_next(&mut self.storage)?;
            self.csv.append(&mut self.storage, CSV_HEADER)?;
        }
        Ok(())
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn control(&self) -> &ActuatorControl {
        &self.control
    }

    pub fn channels(&self) -> &[SensorReading] {
        self.channels.channels()
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    pub fn buffer(&self) -> &ReadingBuffer<READING_BUFFER_CAPACITY> {
        &self.buffer
    }

    pub fn alarm(&self) -> &HighTempAlarm {
        &self.alarm
    }

    pub fn is_connected(&self) -> bool {
        self.connector.is_connected()
    }

    /// Names of the selected log and CSV files
    pub fn file_names(&self) -> (Option<&str>, Option<&str>) {
        (self.log.file_name(), self.csv.file_name())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::events::Trigger;
    use crate::sim::{LoopbackConnector, MemoryStorage, SimulatedProbe};
    use crate::synth::{NoJitter, SensorState};
    use crate::time::{DateTime, FixedWallClock};

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    type TestMonitor =
        Monitor<SimulatedProbe, NoJitter, MemoryStorage, LoopbackConnector, FixedWallClock, NoDelay>;

    struct Rig {
        probe: SimulatedProbe,
        storage: MemoryStorage,
        net: LoopbackConnector,
        monitor: TestMonitor,
    }

    fn rig(temperature: f32) -> Rig {
        let probe = SimulatedProbe::new(temperature, 45.0);
        let storage = MemoryStorage::new();
        let net = LoopbackConnector::new();
        let io = MonitorIo {
            sensor: probe.clone(),
            jitter: NoJitter,
            storage: storage.clone(),
            connector: net.clone(),
            clock: FixedWallClock(DateTime::new(2025, 7, 25, 12, 0, 0)),
            delay: NoDelay,
        };
        let monitor = Monitor::new(MonitorConfig::default(), io).unwrap();
        Rig { probe, storage, net, monitor }
    }

    const IDLE: PendingInterrupts = PendingInterrupts {
        emergency_pressed: false,
        mode_pressed: false,
        timer_fired: false,
    };

    #[test]
    fn first_pass_runs_a_sensor_cycle() {
        let mut rig = rig(22.0);
        let report = rig.monitor.run_once(0, IDLE);

        assert!(report.sensor_cycle);
        assert!(report.sampled);
        assert!(report.connected);
        assert!(rig.monitor.channels().iter().all(|c| c.state == SensorState::Ok));
        assert_eq!(rig.monitor.file_names(), (Some("system0.log"), Some("temperatura0.csv")));
        assert_eq!(rig.storage.lines("temperatura0.csv")[0], CSV_HEADER);
    }

    #[test]
    fn hot_room_switches_ventilators_on_once() {
        let mut rig = rig(35.0);
        let first = rig.monitor.run_once(0, IDLE);
        assert!(first.events.contains(&ControlEvent::ActuatorsOn(Trigger::Automatic)));

        let second = rig.monitor.run_once(5000, IDLE);
        assert!(second.sensor_cycle);
        assert!(second.events.is_empty());

        let csv = rig.storage.lines("temperatura0.csv");
        assert_eq!(csv.iter().filter(|l| l.ends_with(",vent1,ON")).count(), 1);
        assert_eq!(csv.iter().filter(|l| l.ends_with(",vent2,ON")).count(), 1);
    }

    #[test]
    fn sensor_fault_holds_actuators() {
        let mut rig = rig(35.0);
        rig.monitor.run_once(0, IDLE);
        assert!(rig.monitor.control().actuators_on());

        rig.probe.fail();
        let report = rig.monitor.run_once(5000, IDLE);
        assert!(report.faults.contains(&MonitorError::SensorFault));
        assert!(!rig.monitor.aggregate().has_data());
        assert!(rig.monitor.control().actuators_on());
        assert!(rig
            .storage
            .lines("system0.log")
            .iter()
            .any(|l| l.ends_with("[ERROR] Failed to read from physical sensor!")));
    }

    #[test]
    fn timer_tick_forces_a_cycle() {
        let mut rig = rig(22.0);
        rig.monitor.run_once(0, IDLE);
        assert!(!rig.monitor.run_once(1000, IDLE).sensor_cycle);

        let tick = PendingInterrupts { timer_fired: true, ..IDLE };
        assert!(rig.monitor.run_once(2000, tick).sensor_cycle);
    }

    #[test]
    fn cycle_uses_the_buffered_sample() {
        let mut rig = rig(22.0);
        rig.monitor.run_once(0, IDLE);

        // Inside the sampling window: the tick cycle reuses the 22 °C sample
        rig.probe.set(30.0, 45.0);
        let tick = PendingInterrupts { timer_fired: true, ..IDLE };
        let report = rig.monitor.run_once(50, tick);
        assert!(report.sensor_cycle && !report.sampled);
        assert_eq!(rig.monitor.channels()[0].temperature, 22.0);
        assert_eq!(rig.monitor.buffer().snapshot_count(), 1);

        let report = rig.monitor.run_once(100, tick);
        assert!(report.sensor_cycle && report.sampled);
        assert_eq!(rig.monitor.channels()[0].temperature, 30.0);
        assert_eq!(rig.monitor.buffer().snapshot_count(), 2);
    }

    #[test]
    fn emergency_button_before_control() {
        let mut rig = rig(35.0);
        rig.monitor.run_once(0, IDLE);

        let press = PendingInterrupts { emergency_pressed: true, ..IDLE };
        let report = rig.monitor.run_once(5000, press);
        assert_eq!(report.events.as_slice(), &[ControlEvent::EmergencyActivated]);
        assert!(!rig.monitor.control().actuators_on());
    }

    #[test]
    fn publishes_telemetry_and_status() {
        let mut rig = rig(22.0);
        rig.monitor.run_once(0, IDLE);

        assert_eq!(rig.net.published_to("sala_maquinas/sistema/log"), vec!["System started"]);
        assert_eq!(rig.net.published_to("sala_maquinas/sensor1/temperatura"), vec!["22.0"]);
        assert_eq!(rig.net.published_to("sala_maquinas/sensor2/humidade"), vec!["47.0"]);
        assert_eq!(rig.net.published_to("sala_maquinas/memoria/estado"), vec!["OK"]);
        assert_eq!(rig.net.published_to("sala_maquinas/estado/modo"), vec!["AUTO"]);
        assert_eq!(rig.net.published_to("sala_maquinas/estado/emergencia"), vec!["0"]);
        assert_eq!(rig.net.published_to("sala_maquinas/estado/atuadores"), vec!["OFF"]);
        assert_eq!(rig.net.subscriptions().len(), COMMAND_TOPICS.len());
    }

    #[test]
    fn commands_are_applied_when_connected() {
        let mut rig = rig(22.0);
        rig.monitor.run_once(0, IDLE);

        rig.net.inject("sala_maquinas/controlo/modo", b"MANUAL");
        rig.net.inject("sala_maquinas/controlo/atuadores", b"ON");
        rig.net.inject("sala_maquinas/controlo/atuadores", b"maybe");
        let report = rig.monitor.run_once(100, IDLE);

        assert_eq!(report.commands_applied, 2);
        assert!(rig.monitor.control().actuators_on());
    }

    #[test]
    fn missing_card_is_not_fatal() {
        let mut rig = rig(35.0);
        rig.storage.set_available(false);

        let report = rig.monitor.run_once(0, IDLE);
        assert!(rig.monitor.control().actuators_on());
        assert!(report.faults.iter().any(|f| f.is_storage_fault()));
        assert!(rig.storage.file_names().is_empty());

        // Card inserted later: files get picked up lazily
        rig.storage.set_available(true);
        rig.monitor.run_once(60_000, IDLE);
        assert_eq!(rig.monitor.file_names().0, Some("system0.log"));
    }

    #[test]
    fn reconnect_rounds_are_bounded() {
        let mut rig = rig(22.0);
        rig.net.set_link(false);

        let report = rig.monitor.run_once(0, IDLE);
        assert!(report.faults.contains(&MonitorError::RetriesExhausted { attempts: 3 }));
        assert_eq!(rig.net.connect_attempts(), 3);

        rig.monitor.run_once(10_000, IDLE);
        assert_eq!(rig.net.connect_attempts(), 3);

        rig.net.set_link(true);
        let report = rig.monitor.run_once(30_000, IDLE);
        assert!(report.connected);
        assert_eq!(rig.net.connect_attempts(), 4);
    }

    #[test]
    fn csv_snapshot_every_minute() {
        let mut rig = rig(22.0);
        rig.monitor.run_once(0, IDLE);
        assert!(!rig.monitor.run_once(59_999, IDLE).csv_saved);
        assert!(rig.monitor.run_once(60_000, IDLE).csv_saved);

        let csv = rig.storage.lines("temperatura0.csv");
        assert!(csv.contains(&"2025-07-25T12:00:00Z,sensor1,OK,22.0".to_string()));
        assert!(rig
            .storage
            .lines("system0.log")
            .iter()
            .any(|l| l.contains("System status - Mode: AUTO, Emergency: OFF, Actuators: OFF")));
    }

    #[test]
    fn status_report_every_ten_seconds() {
        let mut rig = rig(22.0);
        assert!(rig.monitor.run_once(0, IDLE).status.is_none());
        let status = rig.monitor.run_once(10_000, IDLE).status.unwrap();
        assert_eq!(status.uptime_s, 10);
        assert!(status.network_ok);
    }
}
