//! Game Events
//!
//! Events generated by the engine for logging, replay checks and tests.

use serde::{Deserialize, Serialize};

use crate::core::clock::Tick;
use crate::game::state::PointReason;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A match started.
    MatchStarted {
        /// Seats at the table.
        players: usize,
        /// Points to win.
        target_score: u32,
    },

    /// A round started.
    RoundStarted {
        /// Round counter.
        round: u32,
        /// Opening seat.
        starter: usize,
    },

    /// A player is up.
    TurnStarted {
        /// Seat.
        player: usize,
        /// Attempt cap for this turn.
        cap: u32,
    },

    /// A swing was counted (or clamped at the cap).
    SwingCounted {
        /// Seat.
        player: usize,
        /// Attempts after this swing.
        attempts: u32,
    },

    /// A ringer was detected.
    Ringer {
        /// Seat.
        player: usize,
        /// Attempts it took.
        attempts: u32,
    },

    /// The opening produced a bar.
    BarSet {
        /// Setter seat.
        player: usize,
        /// Bar value.
        value: u32,
    },

    /// The bar was beaten.
    BarLowered {
        /// New setter seat.
        player: usize,
        /// Previous value.
        from: u32,
        /// New value.
        to: u32,
    },

    /// A ringer matched the bar.
    Tie {
        /// Seat.
        player: usize,
        /// Bar value.
        value: u32,
    },

    /// A player is out of the round.
    PlayerEliminated {
        /// Seat.
        player: usize,
        /// Attempts used in the failed turn.
        attempts: u32,
    },

    /// A round point was awarded.
    PointAwarded {
        /// Seat.
        player: usize,
        /// Why.
        reason: PointReason,
        /// Score after the point.
        score: u32,
    },

    /// Everyone failed the opening.
    RoundVoid {
        /// Round counter.
        round: u32,
    },

    /// The match has a winner.
    MatchWon {
        /// Seat.
        player: usize,
        /// Winning score.
        score: u32,
    },

    /// The match was reset to idle.
    MatchReset,

    /// The target score changed.
    TargetScoreChanged {
        /// New target.
        target: u32,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: Tick,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: Tick, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Seat the event is about, if any.
    pub fn player(&self) -> Option<usize> {
        match &self.data {
            GameEventData::TurnStarted { player, .. }
            | GameEventData::SwingCounted { player, .. }
            | GameEventData::Ringer { player, .. }
            | GameEventData::BarSet { player, .. }
            | GameEventData::BarLowered { player, .. }
            | GameEventData::Tie { player, .. }
            | GameEventData::PlayerEliminated { player, .. }
            | GameEventData::PointAwarded { player, .. }
            | GameEventData::MatchWon { player, .. } => Some(*player),
            GameEventData::RoundStarted { starter, .. } => Some(*starter),
            GameEventData::MatchStarted { .. }
            | GameEventData::RoundVoid { .. }
            | GameEventData::MatchReset
            | GameEventData::TargetScoreChanged { .. } => None,
        }
    }

    /// Does this event end a round or the match?
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.data,
            GameEventData::PointAwarded { .. }
                | GameEventData::RoundVoid { .. }
                | GameEventData::MatchWon { .. }
        )
    }
}
