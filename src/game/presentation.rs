//! Presentation Signals
//!
//! Transient overlay plus one badge per seat. Written by the engine, only
//! ever read by the snapshot export.
//!
//! Overlay expiry is latched by the loop through [`Presentation::expire`].
//! Tick comparisons only hold within half the tick range, so an overlay
//! left untouched for longer would otherwise come back on screen.

use serde::{Deserialize, Serialize};

use crate::core::clock::{Deadline, Tick};

/// Full-screen overlay shown after a notable event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum OverlayKind {
    /// Starter rang on the first toss. Payload: new score.
    Ace,
    /// Round point by challenge. Payload: new score.
    RoundWin,
    /// Player knocked out. Payload: attempts used.
    Elimination,
    /// Ringer matched the bar. Payload: bar value.
    Tie,
    /// Match decided. Payload: winning score.
    MatchWin,
    /// Ringer that set or lowered the bar. Payload: attempts used.
    NumericRinger,
}

/// Per-seat status marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Badge {
    /// Nothing to show.
    #[default]
    None = 0,
    /// Out of the current round.
    Eliminated = 1,
    /// Tied the bar this round.
    Safe = 2,
    /// Holds the bar.
    BarSetter = 3,
    /// Aced the round.
    Ace = 4,
    /// Won the round.
    RoundWinner = 5,
    /// Won the match.
    Champion = 6,
}

/// An overlay with its expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    /// What happened.
    pub kind: OverlayKind,
    /// Seat it happened to.
    pub player: Option<usize>,
    /// Kind-specific number.
    pub payload: u32,
    /// When it stops being shown.
    pub expires: Deadline,
    /// Cleared once the loop has seen the deadline pass.
    pub active: bool,
}

impl Overlay {
    /// Still showing at `now`?
    #[inline]
    pub fn is_active(&self, now: Tick) -> bool {
        self.active && !self.expires.reached(now)
    }
}

/// Everything the presentation layer renders besides raw game state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    /// Most recent overlay (may have expired).
    pub overlay: Option<Overlay>,
    /// One badge per seat.
    pub badges: Vec<Badge>,
}

impl Presentation {
    /// Replace the overlay.
    pub fn show(
        &mut self,
        kind: OverlayKind,
        player: Option<usize>,
        payload: u32,
        now: Tick,
        duration: u32,
    ) {
        self.overlay = Some(Overlay {
            kind,
            player,
            payload,
            expires: Deadline::after(now, duration),
            active: true,
        });
    }

    /// Latch overlay expiry. Called once per tick.
    pub fn expire(&mut self, now: Tick) {
        if let Some(overlay) = self.overlay.as_mut() {
            if overlay.active && overlay.expires.reached(now) {
                overlay.active = false;
            }
        }
    }

    /// Overlay if it is still active.
    pub fn active_overlay(&self, now: Tick) -> Option<&Overlay> {
        self.overlay.as_ref().filter(|o| o.is_active(now))
    }

    /// Clear badges for `seats` players.
    pub fn reset_badges(&mut self, seats: usize) {
        self.badges.clear();
        self.badges.resize(seats, Badge::None);
    }

    /// Set one seat's badge.
    pub fn set_badge(&mut self, seat: usize, badge: Badge) {
        if let Some(slot) = self.badges.get_mut(seat) {
            *slot = badge;
        }
    }

    /// Badge for a seat.
    pub fn badge(&self, seat: usize) -> Badge {
        self.badges.get(seat).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_expiry() {
        let mut p = Presentation::default();
        p.show(OverlayKind::Tie, Some(1), 3, 1_000, 2_500);
        assert!(p.active_overlay(1_000).is_some());
        assert!(p.active_overlay(3_499).is_some());
        assert!(p.active_overlay(3_500).is_none());
        // Expired overlay is still remembered
        assert!(p.overlay.is_some());
    }

    #[test]
    fn test_expired_overlay_stays_off_after_long_idle() {
        let mut p = Presentation::default();
        p.show(OverlayKind::MatchWin, Some(0), 5, 0, 2_500);
        p.expire(2_499);
        assert!(p.overlay.unwrap().active);

        p.expire(3_000);
        assert!(!p.overlay.unwrap().active);

        // Far enough away that the raw deadline compares as future again
        let much_later = 2_500u32.wrapping_add(1 << 31);
        assert!(!p.overlay.unwrap().expires.reached(much_later));
        assert!(p.active_overlay(much_later).is_none());
    }

    #[test]
    fn test_badges_out_of_range_ignored() {
        let mut p = Presentation::default();
        p.reset_badges(2);
        p.set_badge(5, Badge::Ace);
        p.set_badge(1, Badge::Safe);
        assert_eq!(p.badges, vec![Badge::None, Badge::Safe]);
        assert_eq!(p.badge(5), Badge::None);
    }
}
