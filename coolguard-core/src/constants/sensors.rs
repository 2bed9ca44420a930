//! Virtual Sensor Layout
//!
//! One physical DHT-class sensor is expanded into a four-probe array.
//! Channel 0 is the physical reading; the others add a fixed offset and
//! bounded jitter.

/// Number of synthesized channels, including the physical one.
pub const NUM_VIRTUAL_CHANNELS: usize = 4;

/// Fixed temperature offset per channel (°C).
///
/// Channel 0 must stay at 0.0: it mirrors the physical probe verbatim.
pub const CHANNEL_TEMP_OFFSETS_C: [f32; NUM_VIRTUAL_CHANNELS] = [0.0, 0.5, -0.3, 0.2];

/// Fixed humidity offset per channel (%RH).
pub const CHANNEL_HUMIDITY_OFFSETS_PCT: [f32; NUM_VIRTUAL_CHANNELS] = [0.0, 2.0, -1.5, 1.0];

/// Temperature jitter bound in tenths of a degree (±0.5 °C).
pub const TEMP_JITTER_TENTHS: i32 = 5;

/// Humidity jitter bound in tenths of a percent (±1.0 %RH).
pub const HUMIDITY_JITTER_TENTHS: i32 = 10;

/// Lowest temperature a derived channel may report (°C).
///
/// DHT11 operating range, also the coldest a machine room plausibly gets.
pub const CHANNEL_TEMP_MIN_C: f32 = -10.0;

/// Highest temperature a derived channel may report (°C).
pub const CHANNEL_TEMP_MAX_C: f32 = 50.0;

/// Lowest relative humidity a derived channel may report (%).
pub const CHANNEL_HUMIDITY_MIN_PCT: f32 = 0.0;

/// Highest relative humidity a derived channel may report (%).
pub const CHANNEL_HUMIDITY_MAX_PCT: f32 = 100.0;
