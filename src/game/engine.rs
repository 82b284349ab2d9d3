//! Elimination Rules Engine
//!
//! Turns classified sensor events into round, turn and match transitions.
//!
//! ## Round flow
//!
//! 1. **Opening**: players take turns (cap = opening cap). Missing out on the
//!    cap eliminates; a ringer sets the bar to the attempts it took.
//! 2. **Beat the bar**: attempts are capped at the bar. A ringer under the bar
//!    lowers it, a ringer on the bar is a tie, running out eliminates.
//! 3. The round point goes to the starter on a first-toss ringer (ace), or to
//!    the last player standing (challenge). If everyone fails the opening the
//!    round is void.
//!
//! Invalid external input is clamped or ignored; nothing here returns an error.

use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::core::clock::Tick;
use crate::core::config::RigConfig;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::presentation::{Badge, OverlayKind};
use crate::game::state::{
    AliveMask, Bar, MatchPhase, MatchState, PhaseKind, Player, PointReason, Round, Turn,
};
use crate::{MAX_PLAYERS, MAX_TARGET_SCORE, MIN_PLAYERS, MIN_TARGET_SCORE};

// =============================================================================
// CONTROL OPERATIONS
// =============================================================================

/// Reset everything and begin a fresh match.
///
/// `player_count` is clamped to the supported seat range. Missing or blank
/// names fall back to `"Player {n}"`.
pub fn start_match(
    state: &mut MatchState,
    player_count: u32,
    names: &[String],
    now: Tick,
    config: &RigConfig,
) {
    let seats = (player_count as usize).clamp(MIN_PLAYERS, MAX_PLAYERS);
    if seats != player_count as usize {
        warn!("Player count {} clamped to {}", player_count, seats);
    }

    let events = state.take_events();
    *state = MatchState::new(state.target_score);
    state.pending_events = events;

    state.players = (0..seats)
        .map(|seat| {
            let name = display_name(names.get(seat), seat, config.rules.max_name_len);
            Player::new(seat, name)
        })
        .collect();
    state.presentation.reset_badges(seats);
    state.phase = MatchPhase::RoundActive;

    info!(
        "Match started: {} players, first to {}",
        seats, state.target_score
    );
    state.push_event(GameEvent::new(
        now,
        GameEventData::MatchStarted {
            players: seats,
            target_score: state.target_score,
        },
    ));

    start_round(state, 0, 0, now, config);
}

/// Force the engine back to idle from any phase.
///
/// Seat names survive so the table can be restarted; scores, round state and
/// presentation are cleared.
pub fn reset_match(state: &mut MatchState, now: Tick) {
    let roster: Vec<Player> = state
        .players
        .iter()
        .map(|p| Player::new(p.index, p.name.clone()))
        .collect();
    let events = state.take_events();

    *state = MatchState::new(state.target_score);
    state.players = roster;
    state.pending_events = events;

    info!("Match reset");
    state.push_event(GameEvent::new(now, GameEventData::MatchReset));
}

/// Change the points needed to win. Out-of-range values are ignored.
///
/// Returns whether the target was accepted.
pub fn set_target_score(state: &mut MatchState, target: u32, now: Tick) -> bool {
    if !(MIN_TARGET_SCORE..=MAX_TARGET_SCORE).contains(&target) {
        warn!(
            "Ignoring target score {} (allowed {}..={})",
            target, MIN_TARGET_SCORE, MAX_TARGET_SCORE
        );
        return false;
    }
    state.target_score = target;
    debug!("Target score set to {}", target);
    state.push_event(GameEvent::new(now, GameEventData::TargetScoreChanged { target }));
    true
}

fn display_name(raw: Option<&String>, seat: usize, max_len: usize) -> String {
    match raw.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        Some(name) => name.chars().take(max_len).collect(),
        None => Player::default_name(seat),
    }
}

// =============================================================================
// ROUND / TURN LIFECYCLE
// =============================================================================

fn start_round(state: &mut MatchState, starter: usize, number: u32, now: Tick, config: &RigConfig) {
    let seats = state.num_players();
    state.round = Round {
        number,
        starter,
        alive: AliveMask::all(seats),
        bar: None,
        phase: PhaseKind::Opening,
    };
    for player in &mut state.players {
        player.alive_in_round = true;
    }
    state.presentation.reset_badges(seats);
    state.phase = MatchPhase::RoundActive;

    info!("Round {} started, {} opens", number + 1, state.name_of(starter));
    state.push_event(GameEvent::new(
        now,
        GameEventData::RoundStarted { round: number, starter },
    ));

    start_turn(state, starter, now, config);
}

fn start_turn(state: &mut MatchState, seat: usize, now: Tick, config: &RigConfig) {
    let cap = match state.round.phase {
        PhaseKind::Opening => config.rules.opening_attempt_cap,
        PhaseKind::BeatTheBar => state.round.bar.map_or(0, |bar| bar.value),
    };
    state.turn = Turn {
        player: seat,
        attempts_used: 0,
        attempt_cap: cap,
    };
    state.request_grace();

    debug!("{} is up (cap {})", state.name_of(seat), cap);
    state.push_event(GameEvent::new(now, GameEventData::TurnStarted { player: seat, cap }));
}

fn advance_turn(state: &mut MatchState, now: Tick, config: &RigConfig) {
    match state
        .round
        .alive
        .next_after(state.turn.player, state.num_players())
    {
        Some(seat) => start_turn(state, seat, now, config),
        None => void_round(state, now),
    }
}

// =============================================================================
// SENSOR EVENTS
// =============================================================================

/// A counted swing by the current player.
pub fn on_swing(state: &mut MatchState, now: Tick) {
    if !state.is_mid_turn() {
        return;
    }

    let turn = &mut state.turn;
    match state.round.phase {
        PhaseKind::Opening => turn.attempts_used = turn.attempts_used.saturating_add(1),
        PhaseKind::BeatTheBar => {
            if turn.attempts_used < turn.attempt_cap {
                turn.attempts_used += 1;
            }
        }
    }

    let (player, attempts) = (turn.player, turn.attempts_used);
    state.push_event(GameEvent::new(
        now,
        GameEventData::SwingCounted { player, attempts },
    ));
}

/// The burst went quiet without a ringer.
///
/// Eliminates the current player once their cap is used up.
pub fn on_settled(state: &mut MatchState, now: Tick, config: &RigConfig) {
    if !state.is_mid_turn() {
        return;
    }
    if state.turn.attempts_used < state.turn.attempt_cap {
        return;
    }
    eliminate_current(state, now, config);
}

/// A sustained ringer by the current player.
pub fn on_ringer(state: &mut MatchState, now: Tick, config: &RigConfig) {
    if !state.is_mid_turn() {
        return;
    }

    // A ringer always took at least one toss
    let attempts = state.turn.attempts_used.max(1);
    state.turn.attempts_used = attempts;
    let seat = state.turn.player;

    debug!("{} rang on attempt {}", state.name_of(seat), attempts);
    state.push_event(GameEvent::new(
        now,
        GameEventData::Ringer { player: seat, attempts },
    ));

    match (state.round.phase, state.round.bar) {
        (PhaseKind::Opening, _) | (PhaseKind::BeatTheBar, None) => {
            if state.round.phase == PhaseKind::Opening
                && seat == state.round.starter
                && attempts == 1
            {
                award_point(state, seat, PointReason::Ace, now, config);
            } else if state.round.alive.sole() == Some(seat) {
                award_point(state, seat, PointReason::Challenge, now, config);
            } else {
                set_bar(state, seat, attempts, now, config);
            }
        }
        (PhaseKind::BeatTheBar, Some(bar)) => match attempts.cmp(&bar.value) {
            Ordering::Less => lower_bar(state, seat, bar, attempts, now, config),
            Ordering::Equal => tie_bar(state, seat, bar, now, config),
            // Capped at counting time; a ringer over the bar still fails it
            Ordering::Greater => eliminate_current(state, now, config),
        },
    }
}

fn set_bar(state: &mut MatchState, seat: usize, attempts: u32, now: Tick, config: &RigConfig) {
    state.round.bar = Some(Bar {
        value: attempts,
        setter: seat,
    });
    state.round.phase = PhaseKind::BeatTheBar;
    state.presentation.set_badge(seat, Badge::BarSetter);
    state.presentation.show(
        OverlayKind::NumericRinger,
        Some(seat),
        attempts,
        now,
        config.timing.overlay_ms,
    );

    info!("{} sets the bar at {}", state.name_of(seat), attempts);
    state.push_event(GameEvent::new(
        now,
        GameEventData::BarSet { player: seat, value: attempts },
    ));

    advance_turn(state, now, config);
}

fn lower_bar(
    state: &mut MatchState,
    seat: usize,
    old: Bar,
    attempts: u32,
    now: Tick,
    config: &RigConfig,
) {
    if state.presentation.badge(old.setter) == Badge::BarSetter {
        state.presentation.set_badge(old.setter, Badge::None);
    }
    state.round.bar = Some(Bar {
        value: attempts,
        setter: seat,
    });
    state.presentation.set_badge(seat, Badge::BarSetter);
    state.presentation.show(
        OverlayKind::NumericRinger,
        Some(seat),
        attempts,
        now,
        config.timing.overlay_ms,
    );

    info!(
        "{} beats the bar: {} -> {}",
        state.name_of(seat),
        old.value,
        attempts
    );
    state.push_event(GameEvent::new(
        now,
        GameEventData::BarLowered {
            player: seat,
            from: old.value,
            to: attempts,
        },
    ));

    advance_turn(state, now, config);
}

fn tie_bar(state: &mut MatchState, seat: usize, bar: Bar, now: Tick, config: &RigConfig) {
    state.presentation.set_badge(seat, Badge::Safe);
    state.presentation.show(
        OverlayKind::Tie,
        Some(seat),
        bar.value,
        now,
        config.timing.overlay_ms,
    );

    debug!("{} ties the bar at {}", state.name_of(seat), bar.value);
    state.push_event(GameEvent::new(
        now,
        GameEventData::Tie { player: seat, value: bar.value },
    ));

    advance_turn(state, now, config);
}

fn eliminate_current(state: &mut MatchState, now: Tick, config: &RigConfig) {
    let seat = state.turn.player;
    let attempts = state.turn.attempts_used;

    state.eliminate(seat);
    state.presentation.set_badge(seat, Badge::Eliminated);
    state.presentation.show(
        OverlayKind::Elimination,
        Some(seat),
        attempts,
        now,
        config.timing.overlay_ms,
    );

    debug!(
        "{} eliminated after {} attempts",
        state.name_of(seat),
        attempts
    );
    state.push_event(GameEvent::new(
        now,
        GameEventData::PlayerEliminated { player: seat, attempts },
    ));

    let alive = state.round.alive;
    match state.round.phase {
        PhaseKind::Opening if alive.is_empty() => void_round(state, now),
        PhaseKind::Opening => advance_turn(state, now, config),
        PhaseKind::BeatTheBar => match alive.sole() {
            Some(survivor) => award_point(state, survivor, PointReason::Challenge, now, config),
            None if alive.is_empty() => void_round(state, now),
            None => advance_turn(state, now, config),
        },
    }
}

// =============================================================================
// ROUND END
// =============================================================================

fn award_point(
    state: &mut MatchState,
    seat: usize,
    reason: PointReason,
    now: Tick,
    config: &RigConfig,
) {
    let score = match state.players.get_mut(seat) {
        Some(player) => {
            player.score = player.score.saturating_add(1);
            player.score
        }
        None => return,
    };
    state.last_point_player = Some(seat);
    state.last_point_reason = reason;

    let name = state.name_of(seat).to_string();
    let (badge, overlay, summary) = match reason {
        PointReason::Ace => (
            Badge::Ace,
            OverlayKind::Ace,
            format!("{} aced it with a ringer on the first toss.", name),
        ),
        _ => {
            let summary = match state.round.bar {
                Some(bar) if state.round.phase == PhaseKind::BeatTheBar => {
                    format!("{} survives the bar of {} and takes the round.", name, bar.value)
                }
                _ => format!(
                    "{} rang in {} when nobody else could and takes the round.",
                    name, state.turn.attempts_used
                ),
            };
            (Badge::RoundWinner, OverlayKind::RoundWin, summary)
        }
    };

    state.presentation.set_badge(seat, badge);
    state
        .presentation
        .show(overlay, Some(seat), score, now, config.timing.overlay_ms);
    state.round_summary = summary;
    state.phase = MatchPhase::RoundEnd;

    info!("{} scores ({:?}), now {}", name, reason, score);
    state.push_event(GameEvent::new(
        now,
        GameEventData::PointAwarded {
            player: seat,
            reason,
            score,
        },
    ));
}

fn void_round(state: &mut MatchState, now: Tick) {
    state.last_point_player = None;
    state.last_point_reason = PointReason::Draw;
    state.round_summary = format!(
        "Nobody rang. Round void, {} opens next.",
        state.name_of(0)
    );
    state.phase = MatchPhase::RoundEnd;

    info!("Round {} void", state.round.number + 1);
    state.push_event(GameEvent::new(
        now,
        GameEventData::RoundVoid {
            round: state.round.number,
        },
    ));
}

/// Settle a finished round: crown a winner or start the next round.
///
/// Does nothing unless the engine is in `RoundEnd`.
pub fn resolve_round_end(state: &mut MatchState, now: Tick, config: &RigConfig) {
    if state.phase != MatchPhase::RoundEnd {
        return;
    }

    // Lowest seat wins simultaneous arrivals
    let target = state.target_score;
    if let Some(winner) = state.players.iter().position(|p| p.score >= target) {
        let score = state.players[winner].score;
        let name = state.name_of(winner).to_string();

        state.phase = MatchPhase::MatchEnd;
        state.winner = Some(winner);
        state.presentation.set_badge(winner, Badge::Champion);
        state.presentation.show(
            OverlayKind::MatchWin,
            Some(winner),
            score,
            now,
            config.timing.overlay_ms,
        );
        state.round_summary = format!("{} {} wins the match.", state.round_summary, name);

        info!("{} wins the match with {} points", name, score);
        state.push_event(GameEvent::new(
            now,
            GameEventData::MatchWon { player: winner, score },
        ));
        return;
    }

    let starter = state.next_starter();
    let number = state.round.number + 1;
    start_round(state, starter, number, now, config);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RigConfig {
        RigConfig::default()
    }

    fn new_match(players: u32) -> MatchState {
        let mut state = MatchState::new(5);
        start_match(&mut state, players, &[], 0, &config());
        state.take_events();
        state
    }

    /// Current player swings `n` times, missing each one.
    fn miss(state: &mut MatchState, n: u32) {
        for _ in 0..n {
            on_swing(state, 0);
            on_settled(state, 0, &config());
        }
    }

    /// Current player misses `n - 1` times then rings on swing `n`.
    fn ring_on(state: &mut MatchState, n: u32) {
        miss(state, n - 1);
        on_swing(state, 0);
        on_ringer(state, 0, &config());
    }

    #[test]
    fn test_start_match_clamps_and_names() {
        let mut state = MatchState::new(5);
        let names = vec!["  Ada ".to_string(), "".to_string()];
        start_match(&mut state, 1, &names, 0, &config());
        assert_eq!(state.num_players(), 2);
        assert_eq!(state.players[0].name, "Ada");
        assert_eq!(state.players[1].name, "Player 2");

        start_match(&mut state, 12, &[], 0, &config());
        assert_eq!(state.num_players(), 8);
        assert_eq!(state.players[7].name, "Player 8");
        assert_eq!(state.round.alive, AliveMask::all(8));
    }

    #[test]
    fn test_long_names_truncated() {
        let mut state = MatchState::new(5);
        let names = vec!["Bartholomew-the-Magnificent".to_string()];
        start_match(&mut state, 2, &names, 0, &config());
        assert_eq!(state.players[0].name.chars().count(), 16);
    }

    #[test]
    fn test_round_start_state() {
        let mut state = MatchState::new(5);
        start_match(&mut state, 3, &[], 0, &config());
        assert_eq!(state.phase, MatchPhase::RoundActive);
        assert_eq!(state.round.starter, 0);
        assert_eq!(state.round.phase, PhaseKind::Opening);
        assert_eq!(state.round.bar, None);
        assert_eq!(state.turn.player, 0);
        assert_eq!(state.turn.attempt_cap, 10);
        assert!(state.take_grace_request());
        assert_eq!(state.presentation.badges, vec![Badge::None; 3]);
    }

    #[test]
    fn test_swing_ignored_when_idle() {
        let mut state = MatchState::new(5);
        on_swing(&mut state, 0);
        on_ringer(&mut state, 0, &config());
        assert_eq!(state.turn.attempts_used, 0);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_settled_below_cap_keeps_turn() {
        let mut state = new_match(2);
        miss(&mut state, 9);
        assert_eq!(state.turn.player, 0);
        assert_eq!(state.turn.attempts_used, 9);
        assert!(state.round.alive.contains(0));
    }

    #[test]
    fn test_opening_cap_eliminates() {
        let mut state = new_match(3);
        miss(&mut state, 10);
        assert!(!state.round.alive.contains(0));
        assert!(!state.players[0].alive_in_round);
        assert_eq!(state.presentation.badge(0), Badge::Eliminated);
        assert_eq!(state.turn.player, 1);
        assert_eq!(state.turn.attempts_used, 0);
        assert_eq!(state.round.phase, PhaseKind::Opening);
    }

    #[test]
    fn test_ace_scores_and_starter_repeats() {
        let mut state = new_match(2);
        state.turn.player = 0;
        ring_on(&mut state, 1);

        assert_eq!(state.phase, MatchPhase::RoundEnd);
        assert_eq!(state.players[0].score, 1);
        assert_eq!(state.last_point_reason, PointReason::Ace);
        assert_eq!(state.presentation.overlay.map(|o| o.kind), Some(OverlayKind::Ace));

        resolve_round_end(&mut state, 0, &config());
        assert_eq!(state.phase, MatchPhase::RoundActive);
        assert_eq!(state.round.starter, 0);
        assert_eq!(state.round.number, 1);
    }

    #[test]
    fn test_zero_attempt_ringer_counts_as_one() {
        let mut state = new_match(2);
        on_ringer(&mut state, 0, &config());
        assert_eq!(state.last_point_reason, PointReason::Ace);
        assert_eq!(state.players[0].score, 1);
    }

    #[test]
    fn test_non_starter_first_toss_sets_bar() {
        let mut state = new_match(3);
        miss(&mut state, 10); // seat 0 out
        ring_on(&mut state, 1); // seat 1 rings first toss, not the starter
        assert_eq!(state.last_point_reason, PointReason::None);
        assert_eq!(state.round.bar, Some(Bar { value: 1, setter: 1 }));
        assert_eq!(state.round.phase, PhaseKind::BeatTheBar);
        assert_eq!(state.turn.player, 2);
        assert_eq!(state.turn.attempt_cap, 1);
    }

    #[test]
    fn test_three_player_bar_scenario() {
        let mut state = new_match(3);

        // Seat 0 opens with a ringer on attempt 4
        ring_on(&mut state, 4);
        assert_eq!(state.round.bar, Some(Bar { value: 4, setter: 0 }));
        assert_eq!(state.round.phase, PhaseKind::BeatTheBar);
        assert_eq!(state.turn.player, 1);
        assert_eq!(state.turn.attempt_cap, 4);

        // Seat 1 fails at 4
        miss(&mut state, 4);
        assert!(!state.round.alive.contains(1));
        assert_eq!(state.turn.player, 2);

        // Seat 2 rings at 2
        ring_on(&mut state, 2);
        assert_eq!(state.round.bar, Some(Bar { value: 2, setter: 2 }));
        assert_eq!(state.presentation.badge(2), Badge::BarSetter);
        assert_eq!(state.presentation.badge(0), Badge::None);
        assert_eq!(state.turn.player, 0);
        assert_eq!(state.turn.attempt_cap, 2);

        // Seat 0 fails to beat 2
        miss(&mut state, 2);
        assert_eq!(state.phase, MatchPhase::RoundEnd);
        assert_eq!(state.players[2].score, 1);
        assert_eq!(state.last_point_player, Some(2));
        assert_eq!(state.last_point_reason, PointReason::Challenge);

        resolve_round_end(&mut state, 0, &config());
        assert_eq!(state.round.starter, 2);
        assert_eq!(state.turn.player, 2);
    }

    #[test]
    fn test_tie_keeps_bar_and_player() {
        let mut state = new_match(3);
        ring_on(&mut state, 3);
        ring_on(&mut state, 3); // seat 1 ties

        assert_eq!(state.round.bar, Some(Bar { value: 3, setter: 0 }));
        assert!(state.round.alive.contains(1));
        assert_eq!(state.presentation.badge(1), Badge::Safe);
        assert_eq!(state.presentation.overlay.map(|o| o.kind), Some(OverlayKind::Tie));
        assert_eq!(state.turn.player, 2);
    }

    #[test]
    fn test_cap_clamps_swings_in_beat_the_bar() {
        let mut state = new_match(2);
        ring_on(&mut state, 2); // seat 0 sets bar 2
        for _ in 0..5 {
            on_swing(&mut state, 0);
        }
        assert_eq!(state.turn.attempts_used, 2);
    }

    #[test]
    fn test_sole_survivor_scores_in_beat_the_bar() {
        let mut state = new_match(2);
        ring_on(&mut state, 5);
        miss(&mut state, 5);
        assert_eq!(state.phase, MatchPhase::RoundEnd);
        assert_eq!(state.players[0].score, 1);
        assert_eq!(state.last_point_reason, PointReason::Challenge);
        assert_eq!(state.presentation.badge(0), Badge::RoundWinner);
    }

    #[test]
    fn test_last_alive_ringer_in_opening_takes_round() {
        let mut state = new_match(3);
        miss(&mut state, 10);
        miss(&mut state, 10);
        assert_eq!(state.round.alive.sole(), Some(2));
        ring_on(&mut state, 7);
        assert_eq!(state.phase, MatchPhase::RoundEnd);
        assert_eq!(state.players[2].score, 1);
        assert_eq!(state.last_point_reason, PointReason::Challenge);
        assert_eq!(state.round.bar, None);
    }

    #[test]
    fn test_all_fail_opening_is_void_and_seat_zero_starts() {
        let mut state = new_match(3);

        // Round 1: seat 1 wins by challenge so it starts round 2
        miss(&mut state, 10);
        ring_on(&mut state, 3);
        miss(&mut state, 3);
        assert_eq!(state.last_point_player, Some(1));
        resolve_round_end(&mut state, 0, &config());
        assert_eq!(state.round.starter, 1);

        // Round 2: nobody rings
        miss(&mut state, 10);
        miss(&mut state, 10);
        miss(&mut state, 10);
        assert_eq!(state.phase, MatchPhase::RoundEnd);
        assert_eq!(state.last_point_reason, PointReason::Draw);
        assert_eq!(state.round.bar, None);

        resolve_round_end(&mut state, 0, &config());
        assert_eq!(state.round.starter, 0);
        assert_eq!(state.turn.player, 0);
        assert_eq!(state.players.iter().map(|p| p.score).sum::<u32>(), 1);
    }

    #[test]
    fn test_match_ends_on_target() {
        let mut state = new_match(2);
        for round in 0..5 {
            assert_eq!(state.round.starter, 0);
            ring_on(&mut state, 1);
            resolve_round_end(&mut state, 0, &config());
            if round < 4 {
                assert_eq!(state.phase, MatchPhase::RoundActive);
            }
        }
        assert_eq!(state.phase, MatchPhase::MatchEnd);
        assert_eq!(state.winner, Some(0));
        assert_eq!(state.presentation.badge(0), Badge::Champion);
        assert_eq!(
            state.presentation.overlay.map(|o| o.kind),
            Some(OverlayKind::MatchWin)
        );

        // Terminal: sensor events change nothing
        on_swing(&mut state, 0);
        resolve_round_end(&mut state, 0, &config());
        assert_eq!(state.phase, MatchPhase::MatchEnd);
    }

    #[test]
    fn test_target_score_range() {
        let mut state = MatchState::new(5);
        assert!(!set_target_score(&mut state, 0, 0));
        assert!(!set_target_score(&mut state, 51, 0));
        assert_eq!(state.target_score, 5);
        assert!(set_target_score(&mut state, 50, 0));
        assert_eq!(state.target_score, 50);
    }

    #[test]
    fn test_lowered_target_applies_at_next_round_end() {
        let mut state = new_match(2);
        ring_on(&mut state, 1);
        resolve_round_end(&mut state, 0, &config());
        ring_on(&mut state, 1);
        set_target_score(&mut state, 2, 0);
        resolve_round_end(&mut state, 0, &config());
        assert_eq!(state.phase, MatchPhase::MatchEnd);
    }

    #[test]
    fn test_reset_from_match_end() {
        let mut state = new_match(2);
        state.target_score = 1;
        ring_on(&mut state, 1);
        resolve_round_end(&mut state, 0, &config());
        assert_eq!(state.phase, MatchPhase::MatchEnd);

        reset_match(&mut state, 10);
        assert_eq!(state.phase, MatchPhase::Idle);
        assert!(state.players.iter().all(|p| p.score == 0));
        assert_eq!(state.presentation.overlay, None);
        assert_eq!(state.winner, None);
        assert_eq!(state.target_score, 1);
        assert_eq!(state.players[0].name, "Player 1");
    }
}
