//! Virtual Sensor Synthesizer
//!
//! Derives a four-probe array from one physical reading:
//!
//! ```text
//!                 ┌──────────── channel 1: t + 0.5 ± jitter, h + 2.0 ± jitter
//! physical (t,h) ─┼──────────── channel 2: t - 0.3 ± jitter, h - 1.5 ± jitter
//!        │        └──────────── channel 3: t + 0.2 ± jitter, h + 1.0 ± jitter
//!        └───────────────────── channel 0: t, h (verbatim)
//! ```
//!
//! Derived channels are clamped to [-10, 50] °C and [0, 100] %RH.
//!
//! ## Faults
//!
//! A NaN from the probe marks every channel `Nok` (or leaves it
//! `Disconnected` if no good read ever happened) and keeps the last numeric
//! values. Values are only zero before the first good read.
//!
//! ## Jitter
//!
//! The jitter source is injected. `RandomJitter` wraps any `rand` RNG and
//! `NoJitter` yields plain offsets, which tests rely on for exact values.

use rand::{Rng, RngCore};

use crate::constants::sensors::{
    CHANNEL_HUMIDITY_MAX_PCT, CHANNEL_HUMIDITY_MIN_PCT, CHANNEL_HUMIDITY_OFFSETS_PCT,
    CHANNEL_TEMP_MAX_C, CHANNEL_TEMP_MIN_C, CHANNEL_TEMP_OFFSETS_C, HUMIDITY_JITTER_TENTHS,
    NUM_VIRTUAL_CHANNELS, TEMP_JITTER_TENTHS,
};
use crate::errors::{MonitorError, MonitorResult};
use crate::time::Timestamp;
use crate::traits::RawReading;

/// Health of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum SensorState {
    Ok,
    Nok,
    Disconnected,
}

impl SensorState {
    /// Wire/CSV spelling
    pub const fn as_str(&self) -> &'static str {
        match self {
            SensorState::Ok => "OK",
            SensorState::Nok => "NOK",
            SensorState::Disconnected => "DISCONNECTED",
        }
    }
}

/// One synthesized channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SensorReading {
    /// 1-based channel id
    pub id: u8,
    /// °C
    pub temperature: f32,
    /// %RH
    pub humidity: f32,
    pub state: SensorState,
    /// Monotonic time of the last successful synthesis
    #[cfg_attr(feature = "serde", serde(skip))]
    pub last_update: Timestamp,
}

impl SensorReading {
    const fn disconnected(id: u8) -> Self {
        Self {
            id,
            temperature: 0.0,
            humidity: 0.0,
            state: SensorState::Disconnected,
            last_update: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.state == SensorState::Ok
    }
}

/// Source of bounded integer jitter
pub trait JitterSource {
    /// Uniform integer in `[-bound, bound]`, in tenths of a unit
    fn jitter_tenths(&mut self, bound: i32) -> i32;
}

/// Offsets only, no randomness
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn jitter_tenths(&mut self, _bound: i32) -> i32 {
        0
    }
}

/// Jitter drawn from any `rand` generator
///
/// ```rust
/// use coolguard_core::synth::RandomJitter;
/// use rand::{rngs::SmallRng, SeedableRng};
///
/// let jitter = RandomJitter::new(SmallRng::seed_from_u64(7));
/// ```
#[derive(Debug, Clone)]
pub struct RandomJitter<R> {
    rng: R,
}

impl<R: RngCore> RandomJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> JitterSource for RandomJitter<R> {
    fn jitter_tenths(&mut self, bound: i32) -> i32 {
        let bound = bound.abs();
        self.rng.gen_range(-bound..=bound)
    }
}

/// Per-channel fixed offsets
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelOffsets {
    /// °C added to the physical temperature, index 0 is ignored
    pub temperature: [f32; NUM_VIRTUAL_CHANNELS],
    /// %RH added to the physical humidity, index 0 is ignored
    pub humidity: [f32; NUM_VIRTUAL_CHANNELS],
}

impl Default for ChannelOffsets {
    fn default() -> Self {
        Self {
            temperature: CHANNEL_TEMP_OFFSETS_C,
            humidity: CHANNEL_HUMIDITY_OFFSETS_PCT,
        }
    }
}

/// The synthesized probe array
pub struct VirtualSensorArray<J> {
    channels: [SensorReading; NUM_VIRTUAL_CHANNELS],
    offsets: ChannelOffsets,
    jitter: J,
    ever_valid: bool,
}

impl<J: JitterSource> VirtualSensorArray<J> {
    /// All channels start `Disconnected` at zero
    pub fn new(offsets: ChannelOffsets, jitter: J) -> Self {
        let mut channels = [SensorReading::disconnected(0); NUM_VIRTUAL_CHANNELS];
        for (i, ch) in channels.iter_mut().enumerate() {
            ch.id = i as u8 + 1;
        }

        Self {
            channels,
            offsets,
            jitter,
            ever_valid: false,
        }
    }

    /// Re-derive every channel from one physical reading
    ///
    /// Returns `SensorFault` when the reading is NaN; channel states are
    /// updated before returning so callers may ignore the error.
    pub fn synthesize(&mut self, raw: RawReading, now: Timestamp) -> MonitorResult<()> {
        if !raw.is_valid() {
            self.mark_faulted();
            mon_error!("Failed to read from physical sensor (t={}, h={})", raw.temperature, raw.humidity);
            return Err(MonitorError::SensorFault);
        }

        let base = &mut self.channels[0];
        base.temperature = raw.temperature;
        base.humidity = raw.humidity;
        base.state = SensorState::Ok;
        base.last_update = now;

        for i in 1..NUM_VIRTUAL_CHANNELS {
            let t_jitter = self.jitter.jitter_tenths(TEMP_JITTER_TENTHS) as f32 / 10.0;
            let h_jitter = self.jitter.jitter_tenths(HUMIDITY_JITTER_TENTHS) as f32 / 10.0;

            let temperature = raw.temperature + self.offsets.temperature[i] + t_jitter;
            let humidity = raw.humidity + self.offsets.humidity[i] + h_jitter;

            let ch = &mut self.channels[i];
            ch.temperature = temperature.clamp(CHANNEL_TEMP_MIN_C, CHANNEL_TEMP_MAX_C);
            ch.humidity = humidity.clamp(CHANNEL_HUMIDITY_MIN_PCT, CHANNEL_HUMIDITY_MAX_PCT);
            ch.state = SensorState::Ok;
            ch.last_update = now;
        }

        self.ever_valid = true;
        mon_debug!(
            "Sensors: T1={:.1} T2={:.1} T3={:.1} T4={:.1}",
            self.channels[0].temperature,
            self.channels[1].temperature,
            self.channels[2].temperature,
            self.channels[3].temperature
        );
        Ok(())
    }

    fn mark_faulted(&mut self) {
        let state = if self.ever_valid {
            SensorState::Nok
        } else {
            SensorState::Disconnected
        };
        for ch in self.channels.iter_mut() {
            ch.state = state;
        }
    }

    /// All channels, id order
    pub fn channels(&self) -> &[SensorReading] {
        &self.channels
    }

    /// Channel by 1-based id
    pub fn channel(&self, id: u8) -> Option<&SensorReading> {
        if id == 0 {
            return None;
        }
        self.channels.get(id as usize - 1)
    }

    /// Channels currently `Ok`
    pub fn ok_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_ok()).count()
    }

    /// Back to the boot state
    pub fn reset(&mut self) {
        for ch in self.channels.iter_mut() {
            *ch = SensorReading::disconnected(ch.id);
        }
        self.ever_valid = false;
    }
}
