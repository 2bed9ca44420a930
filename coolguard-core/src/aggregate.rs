//! Aggregation over channels and buffered samples
//!
//! Two independent views of "the current temperature":
//!
//! - **Mean** over the synthesized channels whose state is `Ok`. This is
//!   the value control decisions are made on.
//! - **Median** over the raw samples in the reading buffer. It filters out
//!   single glitched reads and is reported alongside the mean.
//!
//! Both return `0.0` when there is nothing to aggregate. That value is a
//! "no data" sentinel, never a measurement; the `try_*` variants and
//! [`Aggregate::has_data`] exist so callers can tell the difference.

use crate::buffer::ReadingBuffer;
use crate::constants::buffers::{MIN_MEDIAN_SAMPLES, READING_BUFFER_CAPACITY};
use crate::errors::{MonitorError, MonitorResult};
use crate::synth::SensorReading;
use crate::traits::RawReading;

/// Returned when nothing can be aggregated
pub const NO_DATA: f32 = 0.0;

/// Mean temperature over `Ok` channels, or [`NO_DATA`]
pub fn average_temperature(channels: &[SensorReading]) -> f32 {
    mean_of(channels, |c| c.temperature)
}

/// Mean humidity over `Ok` channels, or [`NO_DATA`]
pub fn average_humidity(channels: &[SensorReading]) -> f32 {
    mean_of(channels, |c| c.humidity)
}

fn mean_of(channels: &[SensorReading], field: impl Fn(&SensorReading) -> f32) -> f32 {
    let (sum, count) = channels
        .iter()
        .filter(|c| c.is_ok())
        .fold((0.0f32, 0u32), |(sum, n), c| (sum + field(c), n + 1));

    if count == 0 {
        NO_DATA
    } else {
        sum / count as f32
    }
}

/// Median of buffered temperatures, or [`NO_DATA`] below three samples
pub fn median_temperature<const N: usize>(buffer: &ReadingBuffer<N>) -> f32 {
    try_median_temperature(buffer).unwrap_or(NO_DATA)
}

/// Median of buffered humidities, or [`NO_DATA`] below three samples
pub fn median_humidity<const N: usize>(buffer: &ReadingBuffer<N>) -> f32 {
    try_median_humidity(buffer).unwrap_or(NO_DATA)
}

pub fn try_median_temperature<const N: usize>(buffer: &ReadingBuffer<N>) -> MonitorResult<f32> {
    median_of(buffer.samples(), |r| r.temperature)
}

pub fn try_median_humidity<const N: usize>(buffer: &ReadingBuffer<N>) -> MonitorResult<f32> {
    median_of(buffer.samples(), |r| r.humidity)
}

fn median_of(samples: &[RawReading], field: impl Fn(&RawReading) -> f32) -> MonitorResult<f32> {
    let count = samples.len();
    if count < MIN_MEDIAN_SAMPLES {
        return Err(MonitorError::InsufficientData {
            required: MIN_MEDIAN_SAMPLES,
            available: count,
        });
    }

    // Buffers larger than the monitor's are aggregated over their newest-slot window
    let mut sorted: heapless::Vec<f32, READING_BUFFER_CAPACITY> = heapless::Vec::new();
    for sample in samples.iter().take(READING_BUFFER_CAPACITY) {
        let _ = sorted.push(field(sample));
    }
    sort_in_place(&mut sorted);

    let count = sorted.len();
    let mid = count / 2;
    if count % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Exchange sort; at most ten elements so O(n²) is fine
fn sort_in_place(values: &mut [f32]) {
    let n = values.len();
    for i in 0..n.saturating_sub(1) {
        for j in (i + 1)..n {
            if values[i] > values[j] {
                values.swap(i, j);
            }
        }
    }
}

/// Everything the scheduler computes in one aggregation step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Aggregate {
    pub mean_temperature: f32,
    pub mean_humidity: f32,
    pub median_temperature: f32,
    pub median_humidity: f32,
    /// Channels that contributed to the means
    pub ok_channels: usize,
}

impl Aggregate {
    pub fn compute<const N: usize>(channels: &[SensorReading], buffer: &ReadingBuffer<N>) -> Self {
        Self {
            mean_temperature: average_temperature(channels),
            mean_humidity: average_humidity(channels),
            median_temperature: median_temperature(buffer),
            median_humidity: median_humidity(buffer),
            ok_channels: channels.iter().filter(|c| c.is_ok()).count(),
        }
    }

    /// The means are real measurements rather than the sentinel
    pub fn has_data(&self) -> bool {
        self.ok_channels > 0
    }
}
