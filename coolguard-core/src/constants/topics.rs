//! MQTT Topic Suffixes
//!
//! Appended to `MonitorConfig::topic_base` (default `sala_maquinas/`).

/// Default topic prefix.
pub const DEFAULT_TOPIC_BASE: &str = "sala_maquinas/";

// ===== PUBLISHED =====

/// Per-channel topics are `<base>sensor<id><suffix>`.
pub const SENSOR_PREFIX: &str = "sensor";
pub const TEMPERATURE_SUFFIX: &str = "/temperatura";
pub const HUMIDITY_SUFFIX: &str = "/humidade";

/// JSON array of channel states.
pub const SENSOR_STATUS: &str = "sensores/estado";

/// `OK` / `NOK` for the storage medium.
pub const STORAGE_STATUS: &str = "memoria/estado";

/// Free-form system messages.
pub const SYSTEM_LOG: &str = "sistema/log";

/// Control state, kept apart from the `controlo/` topics we subscribe to.
pub const MODE_STATE: &str = "estado/modo";
pub const EMERGENCY_STATE: &str = "estado/emergencia";
pub const ACTUATOR_STATE: &str = "estado/atuadores";

// ===== SUBSCRIBED =====

pub const SETPOINT_MIN: &str = "controlo/temp_min";
pub const SETPOINT_MAX: &str = "controlo/temp_max";
pub const MODE: &str = "controlo/modo";
pub const EMERGENCY: &str = "controlo/emergencia";
pub const ACTUATOR_CMD: &str = "controlo/atuadores";

/// Every command topic, in subscription order.
pub const COMMAND_TOPICS: [&str; 5] = [SETPOINT_MIN, SETPOINT_MAX, MODE, EMERGENCY, ACTUATOR_CMD];
