//! Actuator Control State Machine
//!
//! ## States
//!
//! ```text
//!            {Manual, Automatic} × {emergency} × {actuators_on}
//!
//!   emergency ──────────────→ actuators OFF (nothing else evaluated)
//!       │ no
//!       ▼
//!   Automatic ──→ t >= max ──→ ON
//!       │        t <= min ──→ OFF
//!       │        otherwise ──→ unchanged (dead band)
//!       ▼
//!   Manual ─────→ only set_actuators() changes the state
//! ```
//!
//! ## Invariants
//!
//! - Emergency dominates: after any operation with `emergency == true`,
//!   `actuators_on == false`.
//! - Edge-triggered: an event is returned only when the state actually
//!   changes. Re-evaluating at the same temperature returns `None`.
//! - Setpoints are clamped, never rejected: `temp_min ∈ [10, 30]`,
//!   `temp_max ∈ [30, 60]`, so `temp_min <= temp_max` always holds.
//!
//! Leaving emergency does not touch the actuators. The next automatic
//! evaluation decides from the temperature alone.
//!
//! ## Usage
//!
//! ```rust
//! use coolguard_core::control::{ActuatorControl, ControlState};
//! use coolguard_core::events::{ControlEvent, Trigger};
//!
//! let mut control = ActuatorControl::new(ControlState::default());
//! assert_eq!(control.evaluate(31.0), Some(ControlEvent::ActuatorsOn(Trigger::Automatic)));
//! // Still hot, no new event
//! assert_eq!(control.evaluate(31.0), None);
//! ```

use crate::constants::control::{
    DEFAULT_TEMP_MAX_C, DEFAULT_TEMP_MIN_C, HIGH_TEMP_WARNING_C, TEMP_MAX_LOWER_C,
    TEMP_MAX_UPPER_C, TEMP_MIN_LOWER_C, TEMP_MIN_UPPER_C,
};
use crate::events::{ControlEvent, Trigger};

/// Who decides the actuator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    Manual,
    Automatic,
}

impl Mode {
    /// Wire spelling used by commands and status payloads
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mode::Manual => "MANUAL",
            Mode::Automatic => "AUTO",
        }
    }

    /// Spelling used in log lines
    pub const fn name(&self) -> &'static str {
        match self {
            Mode::Manual => "MANUAL",
            Mode::Automatic => "AUTOMATIC",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Mode::Manual => Mode::Automatic,
            Mode::Automatic => Mode::Manual,
        }
    }
}

/// Everything the control layer remembers
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ControlState {
    pub mode: Mode,
    pub emergency: bool,
    /// Lower hysteresis bound, °C
    pub temp_min: f32,
    /// Upper hysteresis bound, °C
    pub temp_max: f32,
    pub actuators_on: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            mode: Mode::Automatic,
            emergency: false,
            temp_min: DEFAULT_TEMP_MIN_C,
            temp_max: DEFAULT_TEMP_MAX_C,
            actuators_on: false,
        }
    }
}

/// The actuator state machine
#[derive(Debug, Clone)]
pub struct ActuatorControl {
    state: ControlState,
}

impl ActuatorControl {
    /// Start from `initial`, clamping its setpoints into range
    pub fn new(initial: ControlState) -> Self {
        let mut state = initial;
        state.temp_min = clamp_min(state.temp_min).unwrap_or(DEFAULT_TEMP_MIN_C);
        state.temp_max = clamp_max(state.temp_max).unwrap_or(DEFAULT_TEMP_MAX_C);
        if state.emergency {
            state.actuators_on = false;
        }
        Self { state }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn is_emergency(&self) -> bool {
        self.state.emergency
    }

    pub fn actuators_on(&self) -> bool {
        self.state.actuators_on
    }

    /// One control cycle with the mean temperature as input
    pub fn evaluate(&mut self, temperature: f32) -> Option<ControlEvent> {
        if self.state.emergency {
            self.state.actuators_on = false;
            return None;
        }

        if self.state.mode != Mode::Automatic {
            return None;
        }

        let was_on = self.state.actuators_on;
        if temperature >= self.state.temp_max {
            self.state.actuators_on = true;
        } else if temperature <= self.state.temp_min {
            self.state.actuators_on = false;
        }

        match (was_on, self.state.actuators_on) {
            (false, true) => Some(ControlEvent::ActuatorsOn(Trigger::Automatic)),
            (true, false) => Some(ControlEvent::ActuatorsOff(Trigger::Automatic)),
            _ => None,
        }
    }

    /// Control cycle without a usable temperature
    ///
    /// Emergency is still enforced; the actuators otherwise keep their state.
    pub fn hold(&mut self) {
        if self.state.emergency {
            self.state.actuators_on = false;
        }
    }

    pub fn set_mode(&mut self, mode: Mode) -> ControlEvent {
        self.state.mode = mode;
        ControlEvent::ModeChanged(mode)
    }

    pub fn toggle_mode(&mut self) -> ControlEvent {
        self.set_mode(self.state.mode.toggled())
    }

    /// Enter or leave emergency
    ///
    /// Entering forces the actuators off. Repeating the current state is a
    /// no-op and returns `None`.
    pub fn set_emergency(&mut self, active: bool) -> Option<ControlEvent> {
        if active == self.state.emergency {
            if active {
                self.state.actuators_on = false;
            }
            return None;
        }

        self.state.emergency = active;
        if active {
            self.state.actuators_on = false;
            Some(ControlEvent::EmergencyActivated)
        } else {
            Some(ControlEvent::EmergencyCleared)
        }
    }

    pub fn toggle_emergency(&mut self) -> Option<ControlEvent> {
        self.set_emergency(!self.state.emergency)
    }

    /// Manual actuator command
    ///
    /// Ignored in automatic mode and during an emergency; setting the
    /// current state again returns `None`.
    pub fn set_actuators(&mut self, on: bool) -> Option<ControlEvent> {
        if self.state.mode != Mode::Manual || self.state.emergency {
            return None;
        }
        if self.state.actuators_on == on {
            return None;
        }

        self.state.actuators_on = on;
        Some(if on {
            ControlEvent::ActuatorsOn(Trigger::Manual)
        } else {
            ControlEvent::ActuatorsOff(Trigger::Manual)
        })
    }

    /// Lower setpoint, clamped to [10, 30] °C. NaN is ignored.
    pub fn set_temp_min(&mut self, temperature: f32) -> Option<ControlEvent> {
        let t = clamp_min(temperature)?;
        self.state.temp_min = t;
        Some(ControlEvent::TempMinSet(t))
    }

    /// Upper setpoint, clamped to [30, 60] °C. NaN is ignored.
    pub fn set_temp_max(&mut self, temperature: f32) -> Option<ControlEvent> {
        let t = clamp_max(temperature)?;
        self.state.temp_max = t;
        Some(ControlEvent::TempMaxSet(t))
    }
}

fn clamp_min(t: f32) -> Option<f32> {
    if t.is_nan() {
        return None;
    }
    Some(t.clamp(TEMP_MIN_LOWER_C, TEMP_MIN_UPPER_C))
}

fn clamp_max(t: f32) -> Option<f32> {
    if t.is_nan() {
        return None;
    }
    Some(t.clamp(TEMP_MAX_LOWER_C, TEMP_MAX_UPPER_C))
}

/// Edge-triggered warning on the mean temperature
///
/// Independent of the hysteresis setpoints; it drives the red/green status
/// LEDs on the board and a warning line in the log.
#[derive(Debug, Clone)]
pub struct HighTempAlarm {
    threshold: f32,
    raised: bool,
}

impl HighTempAlarm {
    pub const fn new(threshold: f32) -> Self {
        Self { threshold, raised: false }
    }

    pub fn is_raised(&self) -> bool {
        self.raised
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Feed one mean temperature; returns an event on each crossing
    pub fn update(&mut self, temperature: f32) -> Option<ControlEvent> {
        let above = temperature >= self.threshold;
        if above == self.raised {
            return None;
        }

        self.raised = above;
        Some(if above {
            ControlEvent::HighTemperature { threshold: self.threshold }
        } else {
            ControlEvent::TemperatureNormal { threshold: self.threshold }
        })
    }
}

impl Default for HighTempAlarm {
    fn default() -> Self {
        Self::new(HIGH_TEMP_WARNING_C)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn automatic() -> ActuatorControl {
        ActuatorControl::new(ControlState::default())
    }

    fn manual() -> ActuatorControl {
        ActuatorControl::new(ControlState { mode: Mode::Manual, ..ControlState::default() })
    }

    #[test]
    fn defaults() {
        let control = automatic();
        assert_eq!(control.mode(), Mode::Automatic);
        assert!(!control.is_emergency());
        assert!(!control.actuators_on());
        assert_eq!(control.state().temp_min, 25.0);
        assert_eq!(control.state().temp_max, 30.0);
    }

    #[test]
    fn hysteresis_with_dead_band() {
        let mut control = automatic();

        assert_eq!(control.evaluate(27.0), None);
        assert!(!control.actuators_on());

        assert_eq!(control.evaluate(30.0), Some(ControlEvent::ActuatorsOn(Trigger::Automatic)));
        // Dead band keeps the state
        assert_eq!(control.evaluate(27.0), None);
        assert!(control.actuators_on());

        assert_eq!(control.evaluate(25.0), Some(ControlEvent::ActuatorsOff(Trigger::Automatic)));
        assert!(!control.actuators_on());
    }

    #[test]
    fn activation_fires_once() {
        let mut control = automatic();
        let events = (0..5).filter_map(|_| control.evaluate(35.0)).count();
        assert_eq!(events, 1);
    }

    #[test]
    fn manual_mode_ignores_temperature() {
        let mut control = manual();
        assert_eq!(control.evaluate(45.0), None);
        assert!(!control.actuators_on());

        assert_eq!(control.set_actuators(true), Some(ControlEvent::ActuatorsOn(Trigger::Manual)));
        assert_eq!(control.evaluate(10.0), None);
        assert!(control.actuators_on());
        assert_eq!(control.set_actuators(true), None);
    }

    #[test]
    fn actuator_command_ignored_in_automatic() {
        let mut control = automatic();
        assert_eq!(control.set_actuators(true), None);
        assert!(!control.actuators_on());
    }

    #[test]
    fn emergency_forces_off_and_blocks_commands() {
        let mut control = manual();
        control.set_actuators(true);

        assert_eq!(control.toggle_emergency(), Some(ControlEvent::EmergencyActivated));
        assert!(!control.actuators_on());
        assert_eq!(control.set_actuators(true), None);
        assert!(!control.actuators_on());

        // Entering again does not re-alert
        assert_eq!(control.set_emergency(true), None);
    }

    #[test]
    fn leaving_emergency_rearms_automatic() {
        let mut control = automatic();
        control.evaluate(40.0);
        assert!(control.actuators_on());

        control.set_emergency(true);
        assert_eq!(control.evaluate(40.0), None);
        assert!(!control.actuators_on());

        assert_eq!(control.set_emergency(false), Some(ControlEvent::EmergencyCleared));
        assert!(!control.actuators_on());
        assert_eq!(control.evaluate(40.0), Some(ControlEvent::ActuatorsOn(Trigger::Automatic)));
    }

    #[test]
    fn hold_enforces_emergency_only() {
        let mut control = automatic();
        control.evaluate(35.0);
        control.hold();
        assert!(control.actuators_on());
    }

    #[test]
    fn setpoints_are_clamped() {
        let mut control = automatic();
        assert_eq!(control.set_temp_min(5.0), Some(ControlEvent::TempMinSet(10.0)));
        assert_eq!(control.set_temp_max(100.0), Some(ControlEvent::TempMaxSet(60.0)));
        assert_eq!(control.set_temp_min(45.0), Some(ControlEvent::TempMinSet(30.0)));
        assert_eq!(control.set_temp_max(0.0), Some(ControlEvent::TempMaxSet(30.0)));
        assert_eq!(control.set_temp_min(f32::NAN), None);
        assert_eq!(control.state().temp_min, 30.0);
    }

    #[test]
    fn toggle_mode_flips() {
        let mut control = automatic();
        assert_eq!(control.toggle_mode(), ControlEvent::ModeChanged(Mode::Manual));
        assert_eq!(control.toggle_mode(), ControlEvent::ModeChanged(Mode::Automatic));
    }

    #[test]
    fn initial_state_is_sanitized() {
        let control = ActuatorControl::new(ControlState {
            emergency: true,
            actuators_on: true,
            temp_min: 0.0,
            temp_max: f32::NAN,
            ..ControlState::default()
        });
        assert!(!control.actuators_on());
        assert_eq!(control.state().temp_min, 10.0);
        assert_eq!(control.state().temp_max, 30.0);
    }

    #[test]
    fn alarm_is_edge_triggered() {
        let mut alarm = HighTempAlarm::default();
        assert_eq!(alarm.update(25.0), None);
        assert_eq!(alarm.update(30.0), Some(ControlEvent::HighTemperature { threshold: 30.0 }));
        assert_eq!(alarm.update(31.0), None);
        assert_eq!(alarm.update(29.9), Some(ControlEvent::TemperatureNormal { threshold: 30.0 }));
        assert!(!alarm.is_raised());
    }
}
