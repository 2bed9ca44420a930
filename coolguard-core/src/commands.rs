//! Inbound command parsing
//!
//! Commands arrive as `<base>controlo/<name>` messages. Parsing is strict:
//! only exact payloads are understood and everything else is dropped
//! without touching the control state.
//!
//! | Topic suffix          | Payload                       |
//! |-----------------------|-------------------------------|
//! | `controlo/temp_min`   | decimal °C, clamped later     |
//! | `controlo/temp_max`   | decimal °C, clamped later     |
//! | `controlo/modo`       | `AUTO` or `MANUAL`            |
//! | `controlo/emergencia` | first byte `1` (on) / `0` (off) |
//! | `controlo/atuadores`  | `ON` or `OFF`                 |

use crate::constants::topics::{ACTUATOR_CMD, EMERGENCY, MODE, SETPOINT_MAX, SETPOINT_MIN};
use crate::control::{ActuatorControl, Mode};
use crate::events::ControlEvent;
use crate::traits::InboundMessage;

/// A recognised remote command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetTempMin(f32),
    SetTempMax(f32),
    SetMode(Mode),
    SetEmergency(bool),
    SetActuators(bool),
}

impl Command {
    /// Parse a message received under `topic_base`
    pub fn parse(topic_base: &str, msg: &InboundMessage) -> Option<Self> {
        let suffix = msg.topic.as_str().strip_prefix(topic_base)?;
        let payload = msg.payload.as_slice();

        match suffix {
            SETPOINT_MIN => parse_celsius(payload).map(Command::SetTempMin),
            SETPOINT_MAX => parse_celsius(payload).map(Command::SetTempMax),
            MODE => match payload {
                b"AUTO" => Some(Command::SetMode(Mode::Automatic)),
                b"MANUAL" => Some(Command::SetMode(Mode::Manual)),
                _ => None,
            },
            EMERGENCY => match payload.first() {
                Some(b'1') => Some(Command::SetEmergency(true)),
                Some(b'0') => Some(Command::SetEmergency(false)),
                _ => None,
            },
            ACTUATOR_CMD => match payload {
                b"ON" => Some(Command::SetActuators(true)),
                b"OFF" => Some(Command::SetActuators(false)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Apply to the state machine, returning the resulting event if any
    pub fn apply(self, control: &mut ActuatorControl) -> Option<ControlEvent> {
        match self {
            Command::SetTempMin(t) => control.set_temp_min(t),
            Command::SetTempMax(t) => control.set_temp_max(t),
            Command::SetMode(mode) => Some(control.set_mode(mode)),
            Command::SetEmergency(active) => control.set_emergency(active),
            Command::SetActuators(on) => control.set_actuators(on),
        }
    }
}

fn parse_celsius(payload: &[u8]) -> Option<f32> {
    let text = core::str::from_utf8(payload).ok()?;
    let value: f32 = text.trim().parse().ok()?;
    value.is_finite().then_some(value)
}
