//! Monotonic Tick Clock
//!
//! Every timing window in the controller (debounce, burst sustain, lockout,
//! ringer hold, overlay) is a deadline compared against one monotonically
//! increasing millisecond counter. All of that arithmetic lives here.
//!
//! The counter is a `u32` and is allowed to wrap (~49.7 days at 1 kHz).
//! Comparisons use wrapping subtraction so a deadline straddling the wrap
//! still resolves correctly. That only holds while `now` is within
//! `i32::MAX` ticks of the deadline: a deadline left untouched for longer
//! reads as future again. Owners latch expiry on the tick they first see it
//! reached and stop comparing against it afterwards.

use serde::{Deserialize, Serialize};

/// One controller tick. The loop runs at 1 kHz, so one tick is one millisecond.
pub type Tick = u32;

/// Ticks elapsed from `since` to `now`, tolerant of counter wrap.
#[inline]
pub fn elapsed(since: Tick, now: Tick) -> u32 {
    now.wrapping_sub(since)
}

/// Has `now` reached or passed `deadline`?
#[inline]
pub fn reached(now: Tick, deadline: Tick) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// A point in time that a timing window expires at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline(pub Tick);

impl Deadline {
    /// Deadline `window` ticks after `now`.
    #[inline]
    pub fn after(now: Tick, window: u32) -> Self {
        Self(now.wrapping_add(window))
    }

    /// Has this deadline been reached at `now`?
    #[inline]
    pub fn reached(self, now: Tick) -> bool {
        reached(now, self.0)
    }

    /// Raw expiry tick.
    #[inline]
    pub fn tick(self) -> Tick {
        self.0
    }
}

/// Scheduler clock driving the control loop.
///
/// Owned by whoever runs the loop; the core only ever receives `now`.
#[derive(Clone, Debug, Default)]
pub struct Clock {
    now: Tick,
}

impl Clock {
    /// Clock starting at `start`.
    pub const fn starting_at(start: Tick) -> Self {
        Self { now: start }
    }

    /// Current tick.
    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Advance by `ticks` and return the new time.
    pub fn advance(&mut self, ticks: u32) -> Tick {
        self.now = self.now.wrapping_add(ticks);
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_across_wrap() {
        assert_eq!(elapsed(10, 25), 15);
        assert_eq!(elapsed(u32::MAX - 4, 5), 10);
    }

    #[test]
    fn test_reached() {
        assert!(reached(100, 100));
        assert!(reached(101, 100));
        assert!(!reached(99, 100));
        // Deadline past the wrap point
        assert!(!reached(u32::MAX, 3));
        assert!(reached(4, u32::MAX - 1));
    }

    #[test]
    fn test_deadline_after() {
        let d = Deadline::after(1_000, 250);
        assert_eq!(d.tick(), 1_250);
        assert!(!d.reached(1_249));
        assert!(d.reached(1_250));
        assert!(Deadline::after(u32::MAX - 10, 20).reached(9));
        // Stale by half the range: reads as future again
        assert!(!d.reached(1_250u32.wrapping_add(1 << 31)));
    }

    #[test]
    fn test_clock_advance() {
        let mut clock = Clock::starting_at(u32::MAX);
        assert_eq!(clock.advance(2), 1);
        assert_eq!(clock.now(), 1);
    }
}
