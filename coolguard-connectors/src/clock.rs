//! Host clocks and delay
//!
//! `SystemWallClock` stands in for the RTC chip; `StdDelay` for the
//! busy-wait delay the firmware uses between connection attempts.

use std::thread;
use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, Timelike, Utc};
use coolguard_core::time::{DateTime, WallClock};
use embedded_hal::delay::DelayNs;

/// UTC calendar time from the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallClock;

impl WallClock for SystemWallClock {
    fn now(&self) -> DateTime {
        to_datetime(&Utc::now().naive_utc())
    }
}

/// Convert a chrono timestamp to the core's RTC representation
pub fn to_datetime(t: &NaiveDateTime) -> DateTime {
    DateTime::new(
        t.year().clamp(0, i32::from(u16::MAX)) as u16,
        t.month() as u8,
        t.day() as u8,
        t.hour() as u8,
        t.minute() as u8,
        t.second() as u8,
    )
}

/// Blocking delay on the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn converts_chrono_time() {
        let t = NaiveDate::from_ymd_opt(2025, 7, 25)
            .and_then(|d| d.and_hms_opt(14, 3, 9))
            .unwrap();
        let dt = to_datetime(&t);
        assert_eq!(dt, DateTime::new(2025, 7, 25, 14, 3, 9));
        assert_eq!(dt.to_string(), "2025-07-25T14:03:09Z");
    }

    #[test]
    fn system_clock_is_plausible() {
        assert!(SystemWallClock.now().year >= 2024);
    }

    #[test]
    fn delay_sleeps_at_least_requested() {
        let start = std::time::Instant::now();
        StdDelay.delay_ms(5);
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
