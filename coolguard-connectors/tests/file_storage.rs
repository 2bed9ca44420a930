//! FileStorage against a real directory

use coolguard_connectors::FileStorage;
use coolguard_core::interrupts::PendingInterrupts;
use coolguard_core::sim::{LoopbackConnector, SimulatedProbe};
use coolguard_core::synth::NoJitter;
use coolguard_core::time::{DateTime, FixedWallClock};
use coolguard_core::traits::{LogFile, OpenMode, Storage};
use coolguard_core::{MonitorConfig, Monitor, MonitorIo};
use embedded_hal::delay::DelayNs;
use tempfile::TempDir;

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn monitor_on(
    storage: FileStorage,
    temperature: f32,
) -> Monitor<SimulatedProbe, NoJitter, FileStorage, LoopbackConnector, FixedWallClock, NoDelay> {
    let io = MonitorIo {
        sensor: SimulatedProbe::new(temperature, 45.0),
        jitter: NoJitter,
        storage,
        connector: LoopbackConnector::new(),
        clock: FixedWallClock(DateTime::new(2025, 7, 25, 9, 15, 0)),
        delay: NoDelay,
    };
    Monitor::new(MonitorConfig::default(), io).unwrap()
}

#[test]
fn append_and_truncate() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(dir.path());

    let mut file = storage.open("a.log", OpenMode::Append).unwrap();
    file.write_line("one").unwrap();
    drop(file);
    storage.open("a.log", OpenMode::Append).unwrap().write_line("two").unwrap();
    assert_eq!(storage.read_lines("a.log").unwrap(), vec!["one", "two"]);

    storage.open("a.log", OpenMode::Truncate).unwrap().write_line("three").unwrap();
    assert_eq!(storage.read_lines("a.log").unwrap(), vec!["three"]);
    assert!(storage.exists("a.log"));
    assert!(!storage.exists("b.log"));
}

#[test]
fn monitor_writes_log_and_csv() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    let mut monitor = monitor_on(storage.clone(), 35.0);

    monitor.run_once(0, PendingInterrupts::default());
    monitor.run_once(60_000, PendingInterrupts::default());

    let log = storage.read_lines("system0.log").unwrap();
    assert_eq!(log[0], "[2025-07-25T09:15:00Z] [INFO] System initialization complete");
    assert!(log.iter().any(|l| l.ends_with("[WARNING] Temperature HIGH! Activating ventilators")));

    let csv = storage.read_lines("temperatura0.csv").unwrap();
    assert_eq!(csv[0], "timestamp,device,status,temperature");
    assert!(csv.contains(&"2025-07-25T09:15:00Z,vent1,ON".to_string()));
    assert!(csv.contains(&"2025-07-25T09:15:00Z,sensor2,OK,35.5".to_string()));
}

#[test]
fn restart_picks_next_index() {
    let dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(dir.path());

    monitor_on(storage.clone(), 22.0).run_once(0, PendingInterrupts::default());
    let mut second = monitor_on(storage.clone(), 22.0);
    second.run_once(0, PendingInterrupts::default());

    assert_eq!(second.file_names(), (Some("system1.log"), Some("temperatura1.csv")));
    assert!(storage.read_lines("system0.log").unwrap()[0].ends_with("System initialization complete"));
    assert!(storage.exists("system1.log"));
}

#[test]
fn removed_directory_degrades_gracefully() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("card");
    let storage = FileStorage::new(&root);
    let mut monitor = monitor_on(storage.clone(), 35.0);

    let report = monitor.run_once(0, PendingInterrupts::default());
    assert!(report.faults.iter().any(|f| f.is_storage_fault()));
    assert!(monitor.control().actuators_on());
    assert!(!root.exists());

    std::fs::create_dir(&root).unwrap();
    monitor.run_once(60_000, PendingInterrupts::default());
    assert!(storage.read_lines("temperatura0.csv").unwrap().len() > 1);
}
