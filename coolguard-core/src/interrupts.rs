//! Interrupt flags and button debouncing
//!
//! ## Overview
//!
//! Two push buttons (emergency, mode) and a 1 Hz hardware timer raise
//! interrupts. Handlers must be short, so they only debounce the edge and
//! set a flag. The main loop drains all flags once per pass.
//!
//! ```text
//! ISR context                         Main loop
//!   emergency edge ─→ Debouncer ─→ ┐
//!   mode edge      ─→ Debouncer ─→ ├─→ AtomicBool ──drain()──→ PendingInterrupts
//!   timer tick     ───────────────→ ┘       (swap false)
//! ```
//!
//! ## Memory Ordering
//!
//! - Handlers set flags with **Release**; `drain()` swaps them with
//!   **AcqRel**, so each edge is observed as new exactly once.
//! - Debounce timestamps are written only by their own handler and use
//!   **Relaxed**; the `armed` flag publishes them with Release/Acquire.
//! - The debounce window is **Relaxed**. It is set once at start-up from
//!   the loaded configuration, before any edge can arrive.
//! - Statistics are **Relaxed**; they never affect control flow.
//!
//! ## Usage
//!
//! ```rust
//! use coolguard_core::interrupts::InterruptFlags;
//!
//! static FLAGS: InterruptFlags = InterruptFlags::new(50);
//!
//! // In the button handler
//! FLAGS.on_emergency_edge(1_000);
//! // Contact bounce 10 ms later is swallowed
//! FLAGS.on_emergency_edge(1_010);
//!
//! // In the main loop
//! let pending = FLAGS.drain();
//! assert!(pending.emergency_pressed);
//! assert!(!FLAGS.drain().emergency_pressed);
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::constants::time::BUTTON_DEBOUNCE_MS;

/// Edge filter for one input
///
/// An edge is accepted when more than `window_ms` elapsed since the last
/// accepted edge on the same input. The very first edge is always accepted.
/// Time is a wrapping `u32` millisecond counter, as on the target.
pub struct Debouncer {
    window_ms: AtomicU32,
    last_accepted_ms: AtomicU32,
    armed: AtomicBool,
}

impl Debouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms: AtomicU32::new(window_ms),
            last_accepted_ms: AtomicU32::new(0),
            armed: AtomicBool::new(false),
        }
    }

    /// Returns true when this edge counts as a new press
    pub fn accept(&self, now_ms: u32) -> bool {
        if self.armed.load(Ordering::Acquire) {
            let last = self.last_accepted_ms.load(Ordering::Relaxed);
            if now_ms.wrapping_sub(last) <= self.window_ms() {
                return false;
            }
        }

        self.last_accepted_ms.store(now_ms, Ordering::Relaxed);
        self.armed.store(true, Ordering::Release);
        true
    }

    pub fn window_ms(&self) -> u32 {
        self.window_ms.load(Ordering::Relaxed)
    }

    pub fn set_window_ms(&self, window_ms: u32) {
        self.window_ms.store(window_ms, Ordering::Relaxed);
    }
}

/// What the handlers raised since the previous drain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingInterrupts {
    pub emergency_pressed: bool,
    pub mode_pressed: bool,
    pub timer_fired: bool,
}

impl PendingInterrupts {
    pub fn is_empty(&self) -> bool {
        !(self.emergency_pressed || self.mode_pressed || self.timer_fired)
    }
}

/// Flag set shared between interrupt handlers and the main loop
///
/// Single producer per flag (its handler), single consumer (the loop).
/// All methods take `&self` so the set can live in a `static`.
pub struct InterruptFlags {
    emergency: AtomicBool,
    mode: AtomicBool,
    timer: AtomicBool,
    emergency_debounce: Debouncer,
    mode_debounce: Debouncer,
    /// Edges swallowed by either debouncer
    bounces: AtomicU32,
}

impl InterruptFlags {
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            emergency: AtomicBool::new(false),
            mode: AtomicBool::new(false),
            timer: AtomicBool::new(false),
            emergency_debounce: Debouncer::new(debounce_ms),
            mode_debounce: Debouncer::new(debounce_ms),
            bounces: AtomicU32::new(0),
        }
    }

    /// Replace the debounce window of both buttons
    ///
    /// The flag set is usually a `static` built before the configuration is
    /// loaded; call this once the real `debounce_ms` is known.
    pub fn set_debounce_ms(&self, debounce_ms: u32) {
        self.emergency_debounce.set_window_ms(debounce_ms);
        self.mode_debounce.set_window_ms(debounce_ms);
    }

    /// Emergency button handler body
    pub fn on_emergency_edge(&self, now_ms: u32) -> bool {
        self.raise(&self.emergency, &self.emergency_debounce, now_ms)
    }

    /// Mode button handler body
    pub fn on_mode_edge(&self, now_ms: u32) -> bool {
        self.raise(&self.mode, &self.mode_debounce, now_ms)
    }

    /// Timer handler body; periodic, so no debouncing
    pub fn on_timer_tick(&self) {
        self.timer.store(true, Ordering::Release);
    }

    fn raise(&self, flag: &AtomicBool, debounce: &Debouncer, now_ms: u32) -> bool {
        if !debounce.accept(now_ms) {
            self.bounces.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        flag.store(true, Ordering::Release);
        true
    }

    /// Read and clear every flag
    pub fn drain(&self) -> PendingInterrupts {
        PendingInterrupts {
            emergency_pressed: self.emergency.swap(false, Ordering::AcqRel),
            mode_pressed: self.mode.swap(false, Ordering::AcqRel),
            timer_fired: self.timer.swap(false, Ordering::AcqRel),
        }
    }

    /// Edges rejected as contact bounce since start-up
    pub fn bounces_rejected(&self) -> u32 {
        self.bounces.load(Ordering::Relaxed)
    }
}

impl Default for InterruptFlags {
    fn default() -> Self {
        Self::new(BUTTON_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_10ms_apart_are_one_press() {
        let flags = InterruptFlags::new(50);
        assert!(flags.on_mode_edge(1000));
        assert!(!flags.on_mode_edge(1010));
        assert_eq!(flags.bounces_rejected(), 1);
        assert!(flags.drain().mode_pressed);
        assert!(!flags.drain().mode_pressed);
    }

    #[test]
    fn edges_60ms_apart_are_two_presses() {
        let flags = InterruptFlags::new(50);
        assert!(flags.on_emergency_edge(1000));
        assert!(flags.drain().emergency_pressed);
        assert!(flags.on_emergency_edge(1060));
        assert!(flags.drain().emergency_pressed);
    }

    #[test]
    fn configured_window_replaces_the_default() {
        static FLAGS: InterruptFlags = InterruptFlags::new(BUTTON_DEBOUNCE_MS);
        FLAGS.set_debounce_ms(200);

        assert!(FLAGS.on_mode_edge(1000));
        assert!(!FLAGS.on_mode_edge(1150));
        assert!(FLAGS.on_mode_edge(1201));
        assert!(FLAGS.on_emergency_edge(5000));
        assert!(!FLAGS.on_emergency_edge(5100));
        assert_eq!(FLAGS.bounces_rejected(), 2);
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let d = Debouncer::new(50);
        assert!(d.accept(100));
        assert!(!d.accept(150));
        assert!(d.accept(201));
    }

    #[test]
    fn first_edge_at_time_zero_is_accepted() {
        let d = Debouncer::new(50);
        assert!(d.accept(0));
        assert!(!d.accept(20));
    }

    #[test]
    fn inputs_debounce_independently() {
        let flags = InterruptFlags::new(50);
        assert!(flags.on_emergency_edge(500));
        assert!(flags.on_mode_edge(505));

        let pending = flags.drain();
        assert!(pending.emergency_pressed && pending.mode_pressed);
        assert!(!pending.timer_fired);
    }

    #[test]
    fn counter_wraparound() {
        let d = Debouncer::new(50);
        assert!(d.accept(u32::MAX - 10));
        assert!(!d.accept(20));
        assert!(d.accept(60));
    }

    #[test]
    fn timer_flag_drains_once() {
        let flags = InterruptFlags::default();
        flags.on_timer_tick();
        flags.on_timer_tick();
        assert!(flags.drain().timer_fired);
        assert!(flags.drain().is_empty());
    }
}
