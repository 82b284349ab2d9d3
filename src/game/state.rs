//! Game State Definitions
//!
//! Everything the elimination engine owns: players, the current round and
//! turn, the bar, and match-level bookkeeping. `MatchState` is the single
//! owner of all of it.

use serde::{Deserialize, Serialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::game::events::GameEvent;
use crate::game::presentation::Presentation;
use crate::MAX_PLAYERS;

// =============================================================================
// ALIVE MASK
// =============================================================================

/// Per-round set of seats still eligible to take a turn (one bit per seat).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliveMask(u8);

impl AliveMask {
    /// Seats `0..count` alive.
    pub fn all(count: usize) -> Self {
        let count = count.min(MAX_PLAYERS);
        if count >= 8 {
            Self(u8::MAX)
        } else {
            Self((1u8 << count) - 1)
        }
    }

    /// Raw bits.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Is `seat` alive?
    #[inline]
    pub fn contains(self, seat: usize) -> bool {
        seat < 8 && self.0 & (1 << seat) != 0
    }

    /// Remove `seat`.
    #[inline]
    pub fn clear(&mut self, seat: usize) {
        if seat < 8 {
            self.0 &= !(1 << seat);
        }
    }

    /// Number of alive seats.
    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// No seats left?
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// First alive seat walking forward cyclically from `from` (exclusive).
    ///
    /// `from` itself is considered last, after wrapping all the way round.
    pub fn next_after(self, from: usize, seats: usize) -> Option<usize> {
        if seats == 0 {
            return None;
        }
        (1..=seats)
            .map(|step| (from + step) % seats)
            .find(|&seat| self.contains(seat))
    }

    /// The single remaining seat, if exactly one is alive.
    pub fn sole(self) -> Option<usize> {
        if self.count() == 1 {
            Some(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat index (identity).
    pub index: usize,
    /// Display name.
    pub name: String,
    /// Round points won this match.
    pub score: u32,
    /// Still in the current round?
    pub alive_in_round: bool,
}

impl Player {
    /// New player with zero score.
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            score: 0,
            alive_in_round: true,
        }
    }

    /// Default display name for a seat (`"Player 1"` for seat 0).
    pub fn default_name(index: usize) -> String {
        format!("Player {}", index + 1)
    }
}

// =============================================================================
// ROUND / TURN
// =============================================================================

/// Round sub-phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// No bar yet; failing to ring within the opening cap eliminates.
    #[default]
    Opening,
    /// A bar exists; attempts are capped at its value.
    BeatTheBar,
}

/// Target-to-beat set by a ringer during the opening.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    /// Attempt count to match or beat.
    pub value: u32,
    /// Seat that set (or last lowered) the bar.
    pub setter: usize,
}

/// The player currently up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Seat taking the turn.
    pub player: usize,
    /// Counted swings this turn.
    pub attempts_used: u32,
    /// Opening cap (informational) or bar value (authoritative).
    pub attempt_cap: u32,
}

/// State of the round in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Zero-based round counter within the match.
    pub number: u32,
    /// Seat that opened the round.
    pub starter: usize,
    /// Seats still in.
    pub alive: AliveMask,
    /// Bar, once the opening produced one.
    pub bar: Option<Bar>,
    /// Sub-phase.
    pub phase: PhaseKind,
}

// =============================================================================
// MATCH PHASE / POINT REASON
// =============================================================================

/// Top-level engine phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// No match running.
    #[default]
    Idle,
    /// A turn is being played.
    RoundActive,
    /// Round finished, resolution pending.
    RoundEnd,
    /// Winner decided.
    MatchEnd,
}

impl MatchPhase {
    /// Stable name for snapshot export.
    pub fn name(self) -> &'static str {
        match self {
            MatchPhase::Idle => "idle",
            MatchPhase::RoundActive => "round_active",
            MatchPhase::RoundEnd => "round_end",
            MatchPhase::MatchEnd => "match_end",
        }
    }
}

/// Why the last round ended the way it did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointReason {
    /// No round has finished yet.
    #[default]
    None,
    /// Starter rang on the first toss.
    Ace,
    /// Last player standing.
    Challenge,
    /// Everyone failed the opening; no point.
    Draw,
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// Complete state of the elimination game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchState {
    /// Engine phase.
    pub phase: MatchPhase,

    /// Points needed to win the match.
    pub target_score: u32,

    /// Seated players, indexed by seat.
    pub players: Vec<Player>,

    /// Current round.
    pub round: Round,

    /// Current turn.
    pub turn: Turn,

    /// Who scored the last round point.
    pub last_point_player: Option<usize>,

    /// How the last round ended.
    pub last_point_reason: PointReason,

    /// Match winner once in `MatchEnd`.
    pub winner: Option<usize>,

    /// Human-readable summary of the last finished round.
    pub round_summary: String,

    /// Overlay and badges for the presentation layer.
    pub presentation: Presentation,

    /// Events generated this tick (drained by `tick`)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,

    /// Set when a new turn wants the classifier's first-press grace.
    #[serde(skip)]
    grace_requested: bool,
}

impl MatchState {
    /// Create an idle state.
    pub fn new(target_score: u32) -> Self {
        Self {
            phase: MatchPhase::Idle,
            target_score,
            players: Vec::new(),
            round: Round::default(),
            turn: Turn::default(),
            last_point_player: None,
            last_point_reason: PointReason::None,
            winner: None,
            round_summary: String::new(),
            presentation: Presentation::default(),
            pending_events: Vec::new(),
            grace_requested: false,
        }
    }

    /// Number of seated players.
    #[inline]
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Is a turn in progress (swings count)?
    #[inline]
    pub fn is_mid_turn(&self) -> bool {
        self.phase == MatchPhase::RoundActive
    }

    /// Display name for a seat (empty if out of range).
    pub fn name_of(&self, seat: usize) -> &str {
        self.players.get(seat).map(|p| p.name.as_str()).unwrap_or("")
    }

    /// Seat the next round starts with when the last round had this reason.
    pub fn next_starter(&self) -> usize {
        let seats = self.num_players().max(1);
        match self.last_point_reason {
            PointReason::Ace | PointReason::Challenge => self.last_point_player.unwrap_or(0),
            PointReason::Draw => 0,
            PointReason::None => (self.round.starter + 1) % seats,
        }
    }

    /// Mark `seat` out of the current round.
    pub fn eliminate(&mut self, seat: usize) {
        self.round.alive.clear(seat);
        if let Some(player) = self.players.get_mut(seat) {
            player.alive_in_round = false;
        }
    }

    /// Ask the classifier to arm its first-press grace.
    pub(crate) fn request_grace(&mut self) {
        self.grace_requested = true;
    }

    /// Take a pending grace request.
    pub fn take_grace_request(&mut self) -> bool {
        std::mem::take(&mut self.grace_requested)
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Fingerprint of everything a snapshot shows apart from the tick.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_match_state();
        hasher.update_str(self.phase.name());
        hasher.update_u32(self.target_score);

        for player in &self.players {
            hasher.update_str(&player.name);
            hasher.update_u32(player.score);
            hasher.update_bool(player.alive_in_round);
        }
        for badge in &self.presentation.badges {
            hasher.update_u8(*badge as u8);
        }

        hasher.update_u32(self.round.number);
        hasher.update_seat(Some(self.round.starter));
        hasher.update_u8(self.round.alive.bits());
        hasher.update_bool(self.round.phase == PhaseKind::BeatTheBar);
        match self.round.bar {
            Some(bar) => {
                hasher.update_bool(true);
                hasher.update_u32(bar.value);
                hasher.update_seat(Some(bar.setter));
            }
            None => hasher.update_bool(false),
        }

        hasher.update_seat(Some(self.turn.player));
        hasher.update_u32(self.turn.attempts_used);
        hasher.update_u32(self.turn.attempt_cap);

        hasher.update_seat(self.last_point_player);
        hasher.update_u8(self.last_point_reason as u8);
        hasher.update_seat(self.winner);
        hasher.update_str(&self.round_summary);

        match self.presentation.overlay {
            Some(overlay) => {
                hasher.update_bool(true);
                hasher.update_bool(overlay.active);
                hasher.update_u8(overlay.kind as u8);
                hasher.update_seat(overlay.player);
                hasher.update_u32(overlay.payload);
                hasher.update_u32(overlay.expires.tick());
            }
            None => hasher.update_bool(false),
        }

        hasher.finalize()
    }
}

// =============================================================================
// TESTS
// =============================================================================
