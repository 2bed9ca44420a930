//! Shared fixtures for integration tests
//!
//! `Rig` wires a `Monitor` to in-memory collaborators and keeps handles to
//! each of them so a test can change the room temperature, pull the SD
//! card, drop the network or inject commands between passes.

#![allow(dead_code)]

use coolguard_core::config::MonitorConfig;
use coolguard_core::interrupts::{InterruptFlags, PendingInterrupts};
use coolguard_core::scheduler::{CycleReport, Monitor, MonitorIo};
use coolguard_core::sim::{LoopbackConnector, MemoryStorage, SimulatedProbe};
use coolguard_core::synth::{JitterSource, NoJitter};
use coolguard_core::time::{DateTime, FixedTime, FixedWallClock, TimeSource};
use embedded_hal::delay::DelayNs;

pub const BOOT: DateTime = DateTime::new(2025, 7, 25, 8, 30, 0);

/// Delay that returns immediately and counts requested milliseconds
#[derive(Debug, Default)]
pub struct InstantDelay {
    pub total_ms: u64,
}

impl DelayNs for InstantDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ms += u64::from(ns) / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}

pub type SimMonitor<J> =
    Monitor<SimulatedProbe, J, MemoryStorage, LoopbackConnector, FixedWallClock, InstantDelay>;

pub struct Rig<J: JitterSource = NoJitter> {
    pub probe: SimulatedProbe,
    pub storage: MemoryStorage,
    pub net: LoopbackConnector,
    pub flags: InterruptFlags,
    pub time: FixedTime,
    pub monitor: SimMonitor<J>,
}

impl Rig<NoJitter> {
    pub fn new(temperature: f32) -> Self {
        Self::with(MonitorConfig::default(), temperature, NoJitter)
    }
}

impl<J: JitterSource> Rig<J> {
    pub fn with(config: MonitorConfig, temperature: f32, jitter: J) -> Self {
        let probe = SimulatedProbe::new(temperature, 45.0);
        let storage = MemoryStorage::new();
        let net = LoopbackConnector::new();
        let flags = InterruptFlags::new(config.debounce_ms);

        let io = MonitorIo {
            sensor: probe.clone(),
            jitter,
            storage: storage.clone(),
            connector: net.clone(),
            clock: FixedWallClock(BOOT),
            delay: InstantDelay::default(),
        };
        let monitor = Monitor::new(config, io).expect("valid config");

        Self { probe, storage, net, flags, time: FixedTime::new(0), monitor }
    }

    /// Drain the flags and run one pass at the current time
    pub fn step(&mut self) -> CycleReport {
        let pending = self.flags.drain();
        self.monitor.run_once(self.time.now(), pending)
    }

    /// Advance the clock, then run one pass
    pub fn step_after(&mut self, ms: u64) -> CycleReport {
        self.time.advance(ms);
        self.step()
    }

    /// Run passes every `period_ms` until `duration_ms` has elapsed
    pub fn run_for(&mut self, duration_ms: u64, period_ms: u64) -> Vec<CycleReport> {
        let end = self.time.now() + duration_ms;
        let mut reports = Vec::new();
        while self.time.now() < end {
            reports.push(self.step_after(period_ms));
        }
        reports
    }

    /// Button press as seen by the interrupt handler, in wrapping ms
    pub fn press_emergency(&self) -> bool {
        self.flags.on_emergency_edge(self.time.now() as u32)
    }

    pub fn press_mode(&self) -> bool {
        self.flags.on_mode_edge(self.time.now() as u32)
    }

    pub fn tick(&self) {
        self.flags.on_timer_tick();
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.storage.lines("system0.log")
    }

    pub fn csv_lines(&self) -> Vec<String> {
        self.storage.lines("temperatura0.csv")
    }

    pub fn log_count(&self, needle: &str) -> usize {
        self.log_lines().iter().filter(|l| l.contains(needle)).count()
    }
}

/// Pending set with only the timer flag raised
pub fn timer_only() -> PendingInterrupts {
    PendingInterrupts { timer_fired: true, ..PendingInterrupts::default() }
}
