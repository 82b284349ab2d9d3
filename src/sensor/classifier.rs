//! Swing/Ringer Classifier
//!
//! Burst state machine over debounced edges. A physical swing is:
//! debounced press, then a quiet period, then either a quick release (miss)
//! or a sustained hold (ringer). A hard lockout after every burst keeps
//! mechanical rattle from being counted twice.
//!
//! ```text
//!   Quiescent ──press (eligible, mid-turn)──► Active ──quiet + released──► Lockout
//!       ▲                                      │                             │
//!       │                                      └─quiet + pressed─► linger    │
//!       │                                            held long enough: Ringer┘
//!       └──────────────────── lockout expired ◄──────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::clock::{elapsed, Deadline, Tick};
use crate::core::config::TimingConfig;
use crate::sensor::debounce::Level;

/// Burst phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstPhase {
    /// No burst in progress.
    #[default]
    Quiescent,
    /// A press and its bounce aftermath are in progress.
    Active,
    /// Cooling down after a burst.
    Lockout,
}

/// Event emitted to the game engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorEvent {
    /// One counted attempt (emitted on press).
    Swing,
    /// A press held continuously for the ringer window.
    Ringer,
    /// The burst went quiet without a ringer (turn-edge evaluation point).
    Settled,
}

/// Burst classifier state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Classifier {
    phase: BurstPhase,
    /// Last stable edge seen during the current burst.
    last_edge: Tick,
    lockout: Deadline,
    counted_this_burst: bool,
    release_seen: bool,
    first_press_grace: bool,
    linger_active: bool,
    linger_start: Tick,
}

impl Classifier {
    /// Fresh classifier: quiescent, ready to count a first press.
    pub fn new(now: Tick) -> Self {
        Self {
            phase: BurstPhase::Quiescent,
            last_edge: now,
            lockout: Deadline(now),
            counted_this_burst: false,
            release_seen: true,
            first_press_grace: false,
            linger_active: false,
            linger_start: now,
        }
    }

    /// Clear every burst, lockout and linger guard.
    pub fn reset(&mut self, now: Tick) {
        *self = Self::new(now);
    }

    /// Let the next press count regardless of lockout or release history.
    pub fn arm_grace(&mut self) {
        self.first_press_grace = true;
    }

    /// Handle a committed stable edge.
    ///
    /// `mid_turn` is whether the engine currently has a player up.
    pub fn on_edge(
        &mut self,
        now: Tick,
        level: Level,
        mid_turn: bool,
        timing: &TimingConfig,
    ) -> Option<SensorEvent> {
        match level {
            Level::Pressed => self.on_press(now, mid_turn),
            Level::Released => self.on_release(now, timing),
        }
    }

    fn on_press(&mut self, now: Tick, mid_turn: bool) -> Option<SensorEvent> {
        match self.phase {
            BurstPhase::Quiescent | BurstPhase::Lockout => {
                if !mid_turn || !self.may_count(now) {
                    return None;
                }
                self.first_press_grace = false;
                self.release_seen = false;
                self.counted_this_burst = true;
                self.linger_active = false;
                self.last_edge = now;
                self.set_phase(BurstPhase::Active);
                Some(SensorEvent::Swing)
            }
            BurstPhase::Active => {
                // Bounce inside the burst
                self.last_edge = now;
                None
            }
        }
    }

    fn on_release(&mut self, now: Tick, timing: &TimingConfig) -> Option<SensorEvent> {
        self.release_seen = true;
        self.linger_active = false;

        if self.phase != BurstPhase::Active {
            return None;
        }

        if elapsed(self.last_edge, now) > timing.burst_sustain_ms {
            self.enter_lockout(now, timing);
            Some(SensorEvent::Settled)
        } else {
            self.last_edge = now;
            None
        }
    }

    /// Per-tick timer evaluation: burst settling, ringer hold, lockout expiry.
    pub fn poll(&mut self, now: Tick, stable: Level, timing: &TimingConfig) -> Option<SensorEvent> {
        match self.phase {
            BurstPhase::Quiescent => None,
            BurstPhase::Lockout => {
                if self.lockout.reached(now) {
                    self.set_phase(BurstPhase::Quiescent);
                }
                None
            }
            BurstPhase::Active if self.linger_active => {
                if !stable.is_pressed() {
                    self.linger_active = false;
                    return None;
                }
                if elapsed(self.linger_start, now) < timing.ringer_hold_ms {
                    return None;
                }
                self.linger_active = false;
                self.enter_lockout(now, timing);
                // A ringer must be followed by an explicit release
                self.release_seen = false;
                Some(SensorEvent::Ringer)
            }
            BurstPhase::Active => {
                if elapsed(self.last_edge, now) < timing.burst_sustain_ms {
                    return None;
                }
                if stable.is_pressed() {
                    self.linger_active = true;
                    self.linger_start = now;
                    None
                } else {
                    self.enter_lockout(now, timing);
                    Some(SensorEvent::Settled)
                }
            }
        }
    }

    /// Once back in Quiescent the lockout deadline is stale and no longer
    /// compared, so an idle gap of any length cannot wrap it back into the future.
    fn may_count(&self, now: Tick) -> bool {
        let lockout_over = self.phase == BurstPhase::Quiescent || self.lockout.reached(now);
        !self.counted_this_burst
            && (self.first_press_grace || (lockout_over && self.release_seen))
    }

    fn enter_lockout(&mut self, now: Tick, timing: &TimingConfig) {
        self.lockout = Deadline::after(now, timing.lockout_ms);
        self.counted_this_burst = false;
        self.set_phase(BurstPhase::Lockout);
    }

    fn set_phase(&mut self, phase: BurstPhase) {
        #[cfg(feature = "debug-tracing")]
        trace!("burst phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Current burst phase.
    #[inline]
    pub fn phase(&self) -> BurstPhase {
        self.phase
    }

    /// Is the first-press grace armed?
    #[inline]
    pub fn grace_armed(&self) -> bool {
        self.first_press_grace
    }

    /// Is a candidate ringer hold being timed?
    #[inline]
    pub fn lingering(&self) -> bool {
        self.linger_active
    }

    /// Has a release been observed since the last counted press?
    #[inline]
    pub fn release_seen(&self) -> bool {
        self.release_seen
    }
}
