//! Bounded retry for network (re)connection
//!
//! A `RetryPolicy` runs an operation at most `max_attempts` times and
//! sleeps between failures through an `embedded_hal` delay. It never loops
//! forever; the caller gets a `RetryOutcome` and decides what to do next.
//!
//! `ReconnectSchedule` spaces whole retry rounds apart so a dead broker
//! costs one bounded stall per `interval_ms` instead of stalling every pass
//! of the main loop.
//!
//! ```text
//! attempt 1 ─ fail ─ delay ─ attempt 2 ─ fail ─ delay ─ attempt 3 ─ fail ─→ Exhausted
//!                                          └─ ok ──────────────────────────→ Succeeded
//! ```

use embedded_hal::delay::DelayNs;

use crate::constants::time::{CONNECT_MAX_ATTEMPTS, CONNECT_RETRY_DELAY_MS, RECONNECT_INTERVAL_MS};
use crate::errors::{MonitorError, MonitorResult};
use crate::time::{is_due, Timestamp};

/// Delay growth between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Backoff {
    /// Same delay every time
    Fixed,
    /// Doubles after each failure, capped at `max_delay_ms`
    Exponential { max_delay_ms: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryPolicy {
    /// Attempts per round, at least one is always made
    pub max_attempts: u8,
    /// Delay after the first failure
    pub delay_ms: u32,
    pub backoff: Backoff,
}

/// Result of one retry round
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryOutcome<T> {
    Succeeded { value: T, attempts: u8 },
    Exhausted { attempts: u8, last_error: MonitorError },
}

impl<T> RetryOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Succeeded { .. })
    }

    pub fn attempts(&self) -> u8 {
        match self {
            RetryOutcome::Succeeded { attempts, .. } | RetryOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Collapse into a `Result`, reporting exhaustion as `RetriesExhausted`
    pub fn into_result(self) -> MonitorResult<T> {
        match self {
            RetryOutcome::Succeeded { value, .. } => Ok(value),
            RetryOutcome::Exhausted { attempts, .. } => Err(MonitorError::RetriesExhausted { attempts }),
        }
    }
}

impl RetryPolicy {
    pub const fn fixed(max_attempts: u8, delay_ms: u32) -> Self {
        Self { max_attempts, delay_ms, backoff: Backoff::Fixed }
    }

    pub const fn exponential(max_attempts: u8, delay_ms: u32, max_delay_ms: u32) -> Self {
        Self {
            max_attempts,
            delay_ms,
            backoff: Backoff::Exponential { max_delay_ms },
        }
    }

    /// Delay after the `failures`-th failed attempt (1-based)
    pub fn delay_after(&self, failures: u8) -> u32 {
        match self.backoff {
            Backoff::Fixed => self.delay_ms,
            Backoff::Exponential { max_delay_ms } => {
                let shift = u32::from(failures.saturating_sub(1)).min(31);
                self.delay_ms
                    .checked_shl(shift)
                    .filter(|d| d >> shift == self.delay_ms)
                    .unwrap_or(u32::MAX)
                    .min(max_delay_ms)
            }
        }
    }

    /// Run `op` until it succeeds or the attempts run out
    ///
    /// `op` receives the 1-based attempt number. No delay follows the last
    /// failure.
    pub fn execute<T, D, F>(&self, delay: &mut D, mut op: F) -> RetryOutcome<T>
    where
        D: DelayNs,
        F: FnMut(u8) -> MonitorResult<T>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1u8;

        loop {
            match op(attempt) {
                Ok(value) => return RetryOutcome::Succeeded { value, attempts: attempt },
                Err(err) => {
                    if attempt >= max_attempts {
                        mon_warn!("Giving up after {} attempts: {}", attempt, err);
                        return RetryOutcome::Exhausted { attempts: attempt, last_error: err };
                    }
                    let wait = self.delay_after(attempt);
                    mon_info!("Attempt {} failed ({}), retrying in {} ms", attempt, err, wait);
                    delay.delay_ms(wait);
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(CONNECT_MAX_ATTEMPTS, CONNECT_RETRY_DELAY_MS)
    }
}

/// Spaces retry rounds at least `interval_ms` apart
#[derive(Debug, Clone)]
pub struct ReconnectSchedule {
    interval_ms: u64,
    last_round: Option<Timestamp>,
}

impl ReconnectSchedule {
    pub const fn new(interval_ms: u64) -> Self {
        Self { interval_ms, last_round: None }
    }

    /// True (and the round is recorded) when a new round may start
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if !is_due(now, self.last_round, self.interval_ms) {
            return false;
        }
        self.last_round = Some(now);
        true
    }

    /// Allow the next `poll` to start a round immediately
    pub fn reset(&mut self) {
        self.last_round = None;
    }
}

impl Default for ReconnectSchedule {
    fn default() -> Self {
        Self::new(RECONNECT_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records requested delays instead of sleeping
    #[derive(Default)]
    struct RecordingDelay {
        waits_ms: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.waits_ms.push(ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.waits_ms.push(ms);
        }
    }

    #[test]
    fn succeeds_on_third_attempt() {
        let policy = RetryPolicy::default();
        let mut delay = RecordingDelay::default();

        let outcome = policy.execute(&mut delay, |attempt| {
            if attempt < 3 { Err(MonitorError::NotConnected) } else { Ok(attempt) }
        });

        assert_eq!(outcome, RetryOutcome::Succeeded { value: 3, attempts: 3 });
        assert_eq!(delay.waits_ms, vec![2000, 2000]);
    }

    #[test]
    fn exhausts_without_trailing_delay() {
        let policy = RetryPolicy::fixed(3, 2000);
        let mut delay = RecordingDelay::default();
        let mut calls = 0;

        let outcome: RetryOutcome<()> = policy.execute(&mut delay, |_| {
            calls += 1;
            Err(MonitorError::NotConnected)
        });

        assert_eq!(calls, 3);
        assert_eq!(delay.waits_ms.len(), 2);
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(outcome.into_result(), Err(MonitorError::RetriesExhausted { attempts: 3 }));
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy::fixed(0, 10);
        let mut delay = RecordingDelay::default();
        let outcome = policy.execute(&mut delay, |_| Ok::<_, MonitorError>(()));
        assert!(outcome.is_success());
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let policy = RetryPolicy::exponential(6, 1000, 5000);
        let delays: Vec<u32> = (1..=5).map(|n| policy.delay_after(n)).collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 5000, 5000]);

        let huge = RetryPolicy::exponential(255, u32::MAX / 2, u32::MAX);
        assert_eq!(huge.delay_after(200), u32::MAX);
    }

    #[test]
    fn reconnect_rounds_are_spaced() {
        let mut schedule = ReconnectSchedule::new(30_000);
        assert!(schedule.poll(0));
        assert!(!schedule.poll(29_999));
        assert!(schedule.poll(30_000));

        schedule.reset();
        assert!(schedule.poll(30_001));
    }
}
