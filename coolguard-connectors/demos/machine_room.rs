//! Machine-room monitor on a host
//!
//! Runs the full monitor against a simulated room: the room warms up while
//! the ventilators are off and cools down while they run. Logs and CSV go to
//! a local directory, telemetry to an MQTT broker.
//!
//! ```text
//! cargo run -p coolguard-connectors --example machine_room -- [config.toml]
//! ```
//!
//! Console input, one per line:
//!
//! ```text
//! e / m           emergency / mode button
//! on / off        manual actuator command
//! auto / manual   set the mode
//! min <°C>        lower setpoint
//! max <°C>        upper setpoint
//! q               quit
//! ```
//!
//! Set `RUST_LOG=debug` for per-pass detail.

use std::fs;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use coolguard_connectors::mqtt::{MqttConfig, MqttConnector};
use coolguard_connectors::payload::status_json;
use coolguard_connectors::{FileStorage, StdDelay, SystemWallClock};
use coolguard_core::commands::Command;
use coolguard_core::constants::time::{BUTTON_DEBOUNCE_MS, TIMER_PERIOD_MS};
use coolguard_core::control::Mode;
use coolguard_core::interrupts::InterruptFlags;
use coolguard_core::sim::SimulatedProbe;
use coolguard_core::synth::RandomJitter;
use coolguard_core::time::{MonotonicClock, TimeSource};
use coolguard_core::{MonitorConfig, Monitor, MonitorIo};
use log::{error, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Written by the ticker and console threads, drained by the main loop.
/// The debounce window is replaced with the configured one at start-up.
static FLAGS: InterruptFlags = InterruptFlags::new(BUTTON_DEBOUNCE_MS);
static QUIT: AtomicBool = AtomicBool::new(false);

const LOOP_PERIOD: Duration = Duration::from_millis(20);

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    /// Directory standing in for the SD card
    data_dir: PathBuf,
    /// Stop after this many seconds; run until `q` when absent
    run_seconds: Option<u64>,
    /// Room temperature at start, °C
    start_temperature: f32,
    monitor: MonitorConfig,
    mqtt: MqttConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("coolguard-data"),
            run_seconds: None,
            start_temperature: 27.0,
            monitor: MonitorConfig::default(),
            mqtt: MqttConfig::default(),
        }
    }
}

/// Crude thermal model of the room
struct Room {
    probe: SimulatedProbe,
    temperature: f32,
    humidity: f32,
    rng: SmallRng,
}

impl Room {
    fn step(&mut self, ventilators_on: bool, dt: Duration) {
        let rate = if ventilators_on { -0.30 } else { 0.15 };
        let noise = self.rng.gen_range(-0.02..=0.02);
        self.temperature += rate * dt.as_secs_f32() + noise;
        self.humidity = (self.humidity + self.rng.gen_range(-0.05..=0.05)).clamp(30.0, 60.0);
        self.probe.set(self.temperature, self.humidity);
    }
}

fn load_config() -> Result<DemoConfig, Box<dyn std::error::Error>> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(DemoConfig::default());
    };
    let config: DemoConfig = toml::from_str(&fs::read_to_string(&path)?)?;
    config.monitor.validate()?;
    Ok(config)
}

fn spawn_ticker() {
    thread::spawn(|| loop {
        thread::sleep(Duration::from_millis(TIMER_PERIOD_MS));
        FLAGS.on_timer_tick();
    });
}

/// Console spelling of the remote commands
fn parse_console_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let command = match (words.next()?, words.next()) {
        ("on", None) => Command::SetActuators(true),
        ("off", None) => Command::SetActuators(false),
        ("auto", None) => Command::SetMode(Mode::Automatic),
        ("manual", None) => Command::SetMode(Mode::Manual),
        ("min", Some(t)) => Command::SetTempMin(t.parse().ok()?),
        ("max", Some(t)) => Command::SetTempMax(t.parse().ok()?),
        _ => return None,
    };
    words.next().is_none().then_some(command)
}

fn spawn_console(clock: MonotonicClock, commands: Sender<Command>) {
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let now = clock.now() as u32;
            match line.trim() {
                "e" => {
                    FLAGS.on_emergency_edge(now);
                }
                "m" => {
                    FLAGS.on_mode_edge(now);
                }
                "q" => {
                    QUIT.store(true, Ordering::Release);
                    break;
                }
                other => match parse_console_command(other) {
                    Some(command) => {
                        if commands.send(command).is_err() {
                            break;
                        }
                    }
                    None => info!("Unknown input {:?}", other),
                },
            }
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = load_config()?;
    FLAGS.set_debounce_ms(config.monitor.debounce_ms);
    fs::create_dir_all(&config.data_dir)?;
    info!("Writing logs to {}", config.data_dir.display());

    let seed = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64;
    let probe = SimulatedProbe::new(config.start_temperature, 45.0);
    let mut room = Room {
        probe: probe.clone(),
        temperature: config.start_temperature,
        humidity: 45.0,
        rng: SmallRng::seed_from_u64(seed),
    };

    let io = MonitorIo {
        sensor: probe,
        jitter: RandomJitter::new(SmallRng::seed_from_u64(seed.rotate_left(17))),
        storage: FileStorage::new(&config.data_dir),
        connector: MqttConnector::new(config.mqtt.clone()),
        clock: SystemWallClock,
        delay: StdDelay,
    };
    let mut monitor = Monitor::new(config.monitor.clone(), io)?;

    let clock = MonotonicClock::new();
    spawn_ticker();
    let (command_tx, command_rx) = mpsc::channel();
    spawn_console(clock.clone(), command_tx);

    let deadline = config.run_seconds.map(|s| s * 1000);
    while !QUIT.load(Ordering::Acquire) {
        let now = clock.now();
        if deadline.is_some_and(|d| now >= d) {
            break;
        }

        for command in command_rx.try_iter() {
            if monitor.handle_command(command).is_none() {
                info!("{:?} changed nothing", command);
            }
        }
        room.step(monitor.control().actuators_on(), LOOP_PERIOD);
        let report = monitor.run_once(now, FLAGS.drain());

        if let Some(status) = report.status {
            match status_json(&status) {
                Ok(json) => println!("{json}"),
                Err(e) => error!("Status encoding failed: {}", e),
            }
        }

        thread::sleep(LOOP_PERIOD);
    }

    info!("Stopped after {} s", clock.now() / 1000);
    Ok(())
}
