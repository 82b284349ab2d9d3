//! State Snapshot
//!
//! Read-only view of the engine for pollers. Built fresh from
//! [`MatchState`] on request; nothing here is ever written back.

use serde::{Deserialize, Serialize};

use crate::core::clock::Tick;
use crate::core::hash::revision_tag;
use crate::game::presentation::{Badge, OverlayKind};
use crate::game::state::{MatchPhase, MatchState, PhaseKind, PointReason};

/// One seat as shown to the poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Seat index.
    pub index: usize,
    /// Display name.
    pub name: String,
    /// Round points.
    pub score: u32,
    /// Still in the current round.
    pub alive: bool,
    /// Status badge.
    pub badge: Badge,
}

/// Bar state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarView {
    /// Has a bar been set this round?
    pub active: bool,
    /// Attempts to match or beat (0 when inactive).
    pub value: u32,
    /// Seat holding the bar.
    pub setter: Option<usize>,
}

/// Overlay descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayView {
    /// Should the overlay be on screen right now?
    pub active: bool,
    /// Last overlay kind, even if expired.
    pub kind: Option<OverlayKind>,
    /// Seat it refers to.
    pub player: Option<usize>,
    /// Kind-specific number.
    pub payload: u32,
    /// Tick the overlay expires.
    pub expires_at: Tick,
}

/// Match winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerView {
    /// Seat index.
    pub index: usize,
    /// Display name.
    pub name: String,
}

/// Full read-only snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick the snapshot was taken.
    pub tick: Tick,
    /// Engine phase name.
    pub phase: String,
    /// Points to win.
    pub target_score: u32,
    /// Seats.
    pub players: Vec<PlayerView>,
    /// Seat currently up (only while a round is active).
    pub current_player: Option<usize>,
    /// Seat that opened the round.
    pub round_starter: Option<usize>,
    /// Zero-based round counter.
    pub round_number: u32,
    /// Round sub-phase.
    pub round_phase: PhaseKind,
    /// Bar.
    pub bar: BarView,
    /// Swings counted this turn.
    pub attempts_used: u32,
    /// Turn cap.
    pub attempt_cap: u32,
    /// Who scored last.
    pub last_point_player: Option<usize>,
    /// How the last round ended.
    pub last_point_reason: PointReason,
    /// Summary of the last finished round.
    pub round_summary: String,
    /// Overlay.
    pub overlay: OverlayView,
    /// Winner once the match is over.
    pub winner: Option<WinnerView>,
    /// Short state fingerprint; unchanged state keeps the same revision.
    pub revision: String,
}

impl Snapshot {
    /// Capture the engine state at `now`.
    pub fn capture(state: &MatchState, now: Tick) -> Self {
        let in_match = state.phase != MatchPhase::Idle;

        let players = state
            .players
            .iter()
            .map(|p| PlayerView {
                index: p.index,
                name: p.name.clone(),
                score: p.score,
                alive: p.alive_in_round,
                badge: state.presentation.badge(p.index),
            })
            .collect();

        let bar = state.round.bar.map_or_else(BarView::default, |bar| BarView {
            active: true,
            value: bar.value,
            setter: Some(bar.setter),
        });

        let active = state.presentation.active_overlay(now).is_some();
        let overlay = state.presentation.overlay.map_or_else(OverlayView::default, |o| {
            OverlayView {
                active,
                kind: Some(o.kind),
                player: o.player,
                payload: o.payload,
                expires_at: o.expires.tick(),
            }
        });

        let winner = state.winner.map(|index| WinnerView {
            index,
            name: state.name_of(index).to_string(),
        });

        Self {
            tick: now,
            phase: state.phase.name().to_string(),
            target_score: state.target_score,
            players,
            current_player: state.is_mid_turn().then_some(state.turn.player),
            round_starter: in_match.then_some(state.round.starter),
            round_number: state.round.number,
            round_phase: state.round.phase,
            bar,
            attempts_used: state.turn.attempts_used,
            attempt_cap: state.turn.attempt_cap,
            last_point_player: state.last_point_player,
            last_point_reason: state.last_point_reason,
            round_summary: state.round_summary.clone(),
            overlay,
            winner,
            revision: revision_tag(&state.compute_hash()),
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Encode as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RigConfig;
    use crate::game::engine;

    #[test]
    fn test_idle_snapshot() {
        let state = MatchState::new(5);
        let snap = Snapshot::capture(&state, 0);
        assert_eq!(snap.phase, "idle");
        assert!(snap.players.is_empty());
        assert_eq!(snap.current_player, None);
        assert_eq!(snap.round_starter, None);
        assert!(!snap.bar.active);
        assert!(!snap.overlay.active);
        assert_eq!(snap.overlay.kind, None);
        assert_eq!(snap.winner, None);
        assert_eq!(snap.revision.len(), 16);
    }

    #[test]
    fn test_snapshot_tracks_bar_and_overlay() {
        let config = RigConfig::default();
        let mut state = MatchState::new(5);
        engine::start_match(&mut state, 3, &["Ann".to_string()], 100, &config);
        engine::on_swing(&mut state, 100);
        engine::on_swing(&mut state, 200);
        engine::on_ringer(&mut state, 300, &config);

        let snap = Snapshot::capture(&state, 400);
        assert_eq!(snap.phase, "round_active");
        assert_eq!(snap.players[0].name, "Ann");
        assert_eq!(snap.players[0].badge, Badge::BarSetter);
        assert_eq!(snap.current_player, Some(1));
        assert_eq!(snap.bar, BarView { active: true, value: 2, setter: Some(0) });
        assert_eq!(snap.attempt_cap, 2);
        assert!(snap.overlay.active);
        assert_eq!(snap.overlay.kind, Some(OverlayKind::NumericRinger));
        assert_eq!(snap.overlay.payload, 2);
        assert_eq!(snap.overlay.expires_at, 300 + config.timing.overlay_ms);

        // Nothing changed: same revision
        assert_eq!(Snapshot::capture(&state, 500).revision, snap.revision);

        // Overlay expires: it stays described but the revision moves
        let expiry = 300 + config.timing.overlay_ms;
        state.presentation.expire(expiry);
        let later = Snapshot::capture(&state, expiry);
        assert!(!later.overlay.active);
        assert_eq!(later.overlay.kind, Some(OverlayKind::NumericRinger));
        assert_ne!(later.revision, snap.revision);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let config = RigConfig::default();
        let mut state = MatchState::new(5);
        engine::start_match(&mut state, 2, &[], 0, &config);
        let json = Snapshot::capture(&state, 0).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "round_active");
        assert_eq!(value["players"][1]["name"], "Player 2");
        assert_eq!(value["round_phase"], "opening");
        assert_eq!(value["bar"]["active"], false);
    }
}
