//! Control Events
//!
//! ## Overview
//!
//! Every state change in the control layer is reported as a `ControlEvent`
//! value instead of being logged in place. The scheduler decides what to do
//! with each one: write a log line, append CSV rows, forward it to the
//! `log` facade. This keeps `control` free of I/O and makes the
//! edge-triggered behaviour directly testable.
//!
//! ```text
//! ActuatorControl ──→ Option<ControlEvent> ──→ Monitor
//!                                               ├─→ DataLogger (log file)
//!                                               ├─→ CSV (vent1/vent2 rows)
//!                                               └─→ log::warn!/info!
//! ```
//!
//! ## Severity
//!
//! Severity maps one-to-one onto the `[LEVEL]` tag of persisted log lines.
//! Emergencies and high temperature are `Warning`; routine changes are
//! `Info`.

use core::fmt;

use crate::control::Mode;

/// Level tag of a persisted log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

/// Which part of the control layer produced an actuator change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Hysteresis evaluation in automatic mode
    Automatic,
    /// Explicit command in manual mode
    Manual,
}

/// Something the control layer did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    ModeChanged(Mode),
    EmergencyActivated,
    EmergencyCleared,
    /// Ventilators switched on
    ActuatorsOn(Trigger),
    /// Ventilators switched off
    ActuatorsOff(Trigger),
    /// New lower setpoint after clamping
    TempMinSet(f32),
    /// New upper setpoint after clamping
    TempMaxSet(f32),
    /// Mean temperature reached the warning threshold
    HighTemperature { threshold: f32 },
    /// Mean temperature fell back under the warning threshold
    TemperatureNormal { threshold: f32 },
}

impl ControlEvent {
    pub const fn severity(&self) -> Severity {
        match self {
            ControlEvent::EmergencyActivated
            | ControlEvent::HighTemperature { .. }
            | ControlEvent::ActuatorsOn(Trigger::Automatic) => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// New actuator state, when this event changed it
    pub const fn actuator_state(&self) -> Option<bool> {
        match self {
            ControlEvent::ActuatorsOn(_) => Some(true),
            ControlEvent::ActuatorsOff(_) => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlEvent::ModeChanged(mode) => write!(f, "Mode changed to {}", mode.name()),
            ControlEvent::EmergencyActivated => f.write_str("EMERGENCY ACTIVATED!"),
            ControlEvent::EmergencyCleared => f.write_str("Emergency deactivated"),
            ControlEvent::ActuatorsOn(Trigger::Automatic) => {
                f.write_str("Temperature HIGH! Activating ventilators")
            }
            ControlEvent::ActuatorsOff(Trigger::Automatic) => {
                f.write_str("Temperature normal. Deactivating ventilators")
            }
            ControlEvent::ActuatorsOn(Trigger::Manual) => f.write_str("Actuators manually ON"),
            ControlEvent::ActuatorsOff(Trigger::Manual) => f.write_str("Actuators manually OFF"),
            ControlEvent::TempMinSet(t) => write!(f, "Temperature MIN set to: {:.1}°C", t),
            ControlEvent::TempMaxSet(t) => write!(f, "Temperature MAX set to: {:.1}°C", t),
            ControlEvent::HighTemperature { threshold } => {
                write!(f, "Temperature WARNING: reached {:.0}°C or above", threshold)
            }
            ControlEvent::TemperatureNormal { threshold } => {
                write!(f, "Temperature back to normal (<{:.0}°C)", threshold)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ControlEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ControlEvent::ModeChanged(mode) => defmt::write!(f, "ModeChanged({})", mode.name()),
            ControlEvent::EmergencyActivated => defmt::write!(f, "EmergencyActivated"),
            ControlEvent::EmergencyCleared => defmt::write!(f, "EmergencyCleared"),
            ControlEvent::ActuatorsOn(_) => defmt::write!(f, "ActuatorsOn"),
            ControlEvent::ActuatorsOff(_) => defmt::write!(f, "ActuatorsOff"),
            ControlEvent::TempMinSet(t) => defmt::write!(f, "TempMinSet({})", t),
            ControlEvent::TempMaxSet(t) => defmt::write!(f, "TempMaxSet({})", t),
            ControlEvent::HighTemperature { threshold } => {
                defmt::write!(f, "HighTemperature({})", threshold)
            }
            ControlEvent::TemperatureNormal { threshold } => {
                defmt::write!(f, "TemperatureNormal({})", threshold)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_of_alerts() {
        assert_eq!(ControlEvent::EmergencyActivated.severity(), Severity::Warning);
        assert_eq!(ControlEvent::ActuatorsOn(Trigger::Automatic).severity(), Severity::Warning);
        assert_eq!(ControlEvent::ActuatorsOn(Trigger::Manual).severity(), Severity::Info);
        assert_eq!(ControlEvent::EmergencyCleared.severity(), Severity::Info);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn actuator_state_only_for_actuator_events() {
        assert_eq!(ControlEvent::ActuatorsOn(Trigger::Manual).actuator_state(), Some(true));
        assert_eq!(ControlEvent::ActuatorsOff(Trigger::Automatic).actuator_state(), Some(false));
        assert_eq!(ControlEvent::EmergencyActivated.actuator_state(), None);
    }

    #[cfg(feature = "std")]
    #[test]
    fn messages() {
        assert_eq!(ControlEvent::EmergencyActivated.to_string(), "EMERGENCY ACTIVATED!");
        assert_eq!(ControlEvent::TempMinSet(10.0).to_string(), "Temperature MIN set to: 10.0°C");
        assert_eq!(
            ControlEvent::ModeChanged(Mode::Automatic).to_string(),
            "Mode changed to AUTOMATIC"
        );
        assert_eq!(
            ControlEvent::HighTemperature { threshold: 30.0 }.to_string(),
            "Temperature WARNING: reached 30°C or above"
        );
    }
}
