//! Signal Debouncer
//!
//! Turns the raw sensor line into a stable logical level. A new reading must
//! persist, unchanged, for the debounce window of the level it is heading to
//! before it becomes stable. Contact chatter shows up as a string of timer
//! restarts, never as a transition.

use serde::{Deserialize, Serialize};

use crate::core::clock::{elapsed, Tick};
use crate::core::config::TimingConfig;

/// Logical switch level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Contact open.
    #[default]
    Released,
    /// Contact closed.
    Pressed,
}

impl Level {
    /// Map an electrical reading onto a logical level.
    #[inline]
    pub fn from_pin(pin_high: bool, active_low: bool) -> Self {
        if pin_high != active_low {
            Level::Pressed
        } else {
            Level::Released
        }
    }

    /// Electrical reading that produces this level.
    #[inline]
    pub fn pin_for(self, active_low: bool) -> bool {
        self.is_pressed() != active_low
    }

    /// Is this the pressed level?
    #[inline]
    pub fn is_pressed(self) -> bool {
        matches!(self, Level::Pressed)
    }
}

/// Debounce state for the single sensor line.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Debouncer {
    /// Last raw reading.
    raw: Level,
    /// Committed level.
    stable: Level,
    /// Level the line is currently settling towards.
    pending: Level,
    /// Tick of the last raw change.
    last_change: Tick,
}

impl Debouncer {
    /// Create a debouncer already settled at `level`.
    pub fn new(level: Level, now: Tick) -> Self {
        Self {
            raw: level,
            stable: level,
            pending: level,
            last_change: now,
        }
    }

    /// Feed one raw reading. Returns the new stable level on a committed transition.
    pub fn update(&mut self, now: Tick, raw: Level, timing: &TimingConfig) -> Option<Level> {
        if raw != self.raw {
            self.raw = raw;
            self.pending = raw;
            self.last_change = now;
            return None;
        }

        if self.pending == self.stable {
            return None;
        }

        let window = match self.pending {
            Level::Pressed => timing.press_debounce_ms,
            Level::Released => timing.release_debounce_ms,
        };

        if elapsed(self.last_change, now) >= window {
            self.stable = self.pending;
            return Some(self.stable);
        }

        None
    }

    /// Accept `raw` as stable immediately, dropping any pending transition.
    pub fn rebaseline(&mut self, raw: Level, now: Tick) {
        *self = Self::new(raw, now);
    }

    /// Committed level.
    #[inline]
    pub fn stable(&self) -> Level {
        self.stable
    }

    /// Last raw reading.
    #[inline]
    pub fn raw(&self) -> Level {
        self.raw
    }
}
