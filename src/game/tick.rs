//! Controller Loop Step
//!
//! One iteration of the cooperative loop: sensor read, edge
//! classification, timer checks, round-end resolution. Everything here is
//! deterministic given the tick and pin sequence, which is what makes
//! traces replayable.

use crate::control::command::ControlCommand;
use crate::core::clock::Tick;
use crate::core::config::RigConfig;
use crate::game::engine;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::state::MatchState;
use crate::sensor::classifier::{Classifier, SensorEvent};
use crate::sensor::debounce::{Debouncer, Level};
use crate::sensor::trace::SensorTrace;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Classifier output this tick
    pub sensor_events: Vec<SensorEvent>,
    /// Stable level committed this tick, if any
    pub edge: Option<Level>,
    /// Whether match ended this tick
    pub match_ended: bool,
    /// Winner (if match ended)
    pub winner: Option<usize>,
}

/// Everything the loop owns: the sensor pipeline and the engine.
#[derive(Clone, Debug)]
pub struct Console {
    /// Sensor line debouncer.
    pub debouncer: Debouncer,
    /// Burst classifier.
    pub classifier: Classifier,
    /// Engine state.
    pub game: MatchState,
}

impl Console {
    /// Idle console with the line settled at `pin_high`.
    pub fn new(config: &RigConfig, now: Tick, pin_high: bool) -> Self {
        let level = Level::from_pin(pin_high, config.sensor.active_low);
        Self {
            debouncer: Debouncer::new(level, now),
            classifier: Classifier::new(now),
            game: MatchState::new(config.rules.default_target_score),
        }
    }

    /// Service one control command to completion.
    ///
    /// Returns the events it produced.
    pub fn apply(&mut self, command: &ControlCommand, now: Tick, config: &RigConfig) -> Vec<GameEvent> {
        match command {
            ControlCommand::StartMatch {
                player_count,
                names,
            } => {
                self.rearm_sensor(now);
                engine::start_match(&mut self.game, *player_count, names, now, config);
            }
            ControlCommand::ResetMatch => {
                engine::reset_match(&mut self.game, now);
                self.rearm_sensor(now);
            }
            ControlCommand::SetTargetScore { target } => {
                engine::set_target_score(&mut self.game, *target, now);
            }
        }
        self.hand_off_grace();
        self.game.take_events()
    }

    /// Accept the current raw read as stable and clear every burst guard.
    fn rearm_sensor(&mut self, now: Tick) {
        let raw = self.debouncer.raw();
        self.debouncer.rebaseline(raw, now);
        self.classifier.reset(now);
    }

    fn hand_off_grace(&mut self) {
        if self.game.take_grace_request() {
            self.classifier.arm_grace();
        }
    }

    fn dispatch(&mut self, event: SensorEvent, now: Tick, config: &RigConfig) {
        match event {
            SensorEvent::Swing => engine::on_swing(&mut self.game, now),
            SensorEvent::Ringer => engine::on_ringer(&mut self.game, now, config),
            SensorEvent::Settled => engine::on_settled(&mut self.game, now, config),
        }
        self.hand_off_grace();
    }
}

/// Run one loop iteration.
///
/// # Arguments
///
/// * `console` - Sensor pipeline and engine (will be mutated)
/// * `now` - Current tick (milliseconds, may wrap)
/// * `pin_high` - Raw electrical level of the sensor line
/// * `config` - Rig configuration
///
/// # Order
///
/// 1. Debounce the raw read
/// 2. Classify a committed edge
/// 3. Burst, linger and lockout timers
/// 4. Round-end resolution
/// 5. Overlay expiry
///
/// Control commands are serviced by the caller afterwards via
/// [`Console::apply`], at most one per iteration.
pub fn tick(console: &mut Console, now: Tick, pin_high: bool, config: &RigConfig) -> TickResult {
    let mut result = TickResult::default();
    let raw = Level::from_pin(pin_high, config.sensor.active_low);

    // 1. Debounce
    result.edge = console.debouncer.update(now, raw, &config.timing);

    // 2. Edge classification
    if let Some(level) = result.edge {
        let mid_turn = console.game.is_mid_turn();
        if let Some(event) = console.classifier.on_edge(now, level, mid_turn, &config.timing) {
            result.sensor_events.push(event);
            console.dispatch(event, now, config);
        }
    }

    // 3. Timers
    let stable = console.debouncer.stable();
    if let Some(event) = console.classifier.poll(now, stable, &config.timing) {
        result.sensor_events.push(event);
        console.dispatch(event, now, config);
    }

    // 4. Round end
    engine::resolve_round_end(&mut console.game, now, config);
    console.hand_off_grace();

    // 5. Overlay expiry
    console.game.presentation.expire(now);

    result.events = console.game.take_events();
    result.match_ended = result
        .events
        .iter()
        .any(|e| matches!(e.data, GameEventData::MatchWon { .. }));
    if result.match_ended {
        result.winner = console.game.winner;
    }

    result
}

/// Replay a recorded session.
///
/// Returns the final console and every event, in emission order.
pub fn replay_trace(trace: &SensorTrace, config: &RigConfig) -> (Console, Vec<GameEvent>) {
    let mut console = Console::new(config, trace.start_tick, trace.idle_high);
    let mut all_events = Vec::new();

    for step in trace.replay_iter() {
        let result = tick(&mut console, step.tick, step.high, config);
        all_events.extend(result.events);

        for record in step.commands {
            all_events.extend(console.apply(&record.command, step.tick, config));
        }
    }

    (console, all_events)
}
