//! Fixed-Size Circular Buffer of Raw Probe Samples
//!
//! ## Overview
//!
//! The physical probe is sampled far more often (every 100 ms) than the
//! control loop runs (every few seconds). The last ten samples are kept
//! here so the aggregator can report a median that shrugs off single
//! glitched reads.
//!
//! ## Storage
//!
//! - Insertion overwrites the oldest slot once the ring is full
//! - Capacity is a const generic, ten slots on the target
//! - No heap allocation
//!
//! ## Rate Limiting
//!
//! `record()` is called on every pass of the main loop. The buffer itself
//! refuses samples that arrive sooner than `min_interval_ms` after the
//! previous attempt, so callers don't need their own timer.
//!
//! ## Memory Layout
//!
//! ```text
//! ReadingBuffer<10>:
//! ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! │  0  │  1  │  2  │  3  │  4  │  5  │  6  │  7  │  8  │  9  │
//! └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!                ↑
//!                cursor = 2 (next write), full = true after first wrap
//! ```
//!
//! ## Invariants
//!
//! - `cursor < N`
//! - `full` becomes true on the first wrap and only `reset()` clears it
//! - NaN samples never enter a slot; the slot keeps its previous value
//!
//! ## Usage Example
//!
//! ```rust
//! use coolguard_core::buffer::{ReadingBuffer, RecordOutcome};
//! use coolguard_core::traits::RawReading;
//!
//! let mut buf: ReadingBuffer<10> = ReadingBuffer::new(100);
//! assert_eq!(buf.record(RawReading::new(21.0, 40.0), 0), RecordOutcome::Recorded);
//! // Too soon, dropped
//! assert_eq!(buf.record(RawReading::new(21.5, 40.0), 50), RecordOutcome::RateLimited);
//! assert_eq!(buf.snapshot_count(), 1);
//! ```

use crate::time::{is_due, Timestamp};
use crate::traits::RawReading;

/// What `record()` did with a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Stored in the slot under the cursor
    Recorded,
    /// Arrived before the minimum interval elapsed
    RateLimited,
    /// NaN temperature or humidity, not stored
    Rejected,
}

/// Fixed-size circular buffer of raw probe samples
///
/// ## Type Parameter
///
/// - `N`: number of slots. The monitor uses
///   [`READING_BUFFER_CAPACITY`](crate::constants::READING_BUFFER_CAPACITY).
///
/// ## Thread Safety
///
/// Owned by the main loop only. Interrupt handlers never touch it.
#[derive(Debug, Clone)]
pub struct ReadingBuffer<const N: usize> {
    /// Slots, zeroed at construction
    data: [RawReading; N],

    /// Index where the next write will occur
    cursor: usize,

    /// Set on the first wrap-around, sticky afterwards
    full: bool,

    /// Minimum spacing between accepted attempts
    min_interval_ms: u64,

    /// Time of the last attempt that passed the rate limit
    last_attempt: Option<Timestamp>,
}

impl<const N: usize> ReadingBuffer<N> {
    /// Creates an empty buffer
    ///
    /// Const so it can live in a `static` on targets without an allocator.
    pub const fn new(min_interval_ms: u64) -> Self {
        Self {
            data: [RawReading::new(0.0, 0.0); N],
            cursor: 0,
            full: false,
            min_interval_ms,
            last_attempt: None,
        }
    }

    /// Offer a sample to the buffer
    ///
    /// The rate limit is charged before the NaN check, so a faulty read
    /// still consumes its time slot just like a good one.
    pub fn record(&mut self, reading: RawReading, now: Timestamp) -> RecordOutcome {
        if !self.accepts_at(now) {
            return RecordOutcome::RateLimited;
        }
        self.last_attempt = Some(now);

        if !reading.is_valid() {
            return RecordOutcome::Rejected;
        }

        self.data[self.cursor] = reading;
        self.cursor += 1;
        if self.cursor >= N {
            self.cursor = 0;
            self.full = true;
        }

        RecordOutcome::Recorded
    }

    /// Whether a sample offered at `now` would pass the rate limit
    ///
    /// Lets callers skip the (slow) probe read when it would be dropped.
    pub fn accepts_at(&self, now: Timestamp) -> bool {
        is_due(now, self.last_attempt, self.min_interval_ms)
    }

    /// Number of meaningful samples: `N` once wrapped, else the cursor
    pub fn snapshot_count(&self) -> usize {
        if self.full { N } else { self.cursor }
    }

    /// Next write position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Has wrapped at least once
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// No sample recorded since construction or reset
    pub fn is_empty(&self) -> bool {
        self.snapshot_count() == 0
    }

    /// Buffered samples in slot order (not chronological once wrapped)
    pub fn samples(&self) -> &[RawReading] {
        &self.data[..self.snapshot_count()]
    }

    /// Most recently recorded sample
    pub fn last(&self) -> Option<&RawReading> {
        if self.is_empty() {
            return None;
        }
        let idx = if self.cursor == 0 { N - 1 } else { self.cursor - 1 };
        Some(&self.data[idx])
    }

    /// Reinitialize: zero the slots and clear the `full` flag
    pub fn reset(&mut self) {
        self.data = [RawReading::new(0.0, 0.0); N];
        self.cursor = 0;
        self.full = false;
        self.last_attempt = None;
    }
}
