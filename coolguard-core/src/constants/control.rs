//! Actuator Control Limits
//!
//! Setpoints arriving over the network are clamped, never rejected.

/// Lowest accepted value for the switch-off setpoint (°C).
pub const TEMP_MIN_LOWER_C: f32 = 10.0;

/// Highest accepted value for the switch-off setpoint (°C).
pub const TEMP_MIN_UPPER_C: f32 = 30.0;

/// Lowest accepted value for the switch-on setpoint (°C).
pub const TEMP_MAX_LOWER_C: f32 = 30.0;

/// Highest accepted value for the switch-on setpoint (°C).
pub const TEMP_MAX_UPPER_C: f32 = 60.0;

/// Switch-off setpoint at boot (°C).
pub const DEFAULT_TEMP_MIN_C: f32 = 25.0;

/// Switch-on setpoint at boot (°C).
pub const DEFAULT_TEMP_MAX_C: f32 = 30.0;

/// Mean temperature that raises the high-temperature warning (°C).
pub const HIGH_TEMP_WARNING_C: f32 = 30.0;
