//! # Ring Toss Controller
//!
//! Single-sensor ring toss elimination game: a debounced swing/ringer
//! classifier feeding a deterministic rules engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RING TOSS CONTROLLER                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── clock.rs      - Wrapping-safe tick math                 │
//! │  ├── config.rs     - Timing, rules and sensor settings       │
//! │  └── hash.rs       - State fingerprints                      │
//! │                                                              │
//! │  sensor/           - Signal pipeline                         │
//! │  ├── debounce.rs   - Raw read to stable level                │
//! │  ├── classifier.rs - Swing / ringer burst state machine      │
//! │  └── trace.rs      - Pin recording and replay                │
//! │                                                              │
//! │  game/             - Rules (deterministic)                   │
//! │  ├── state.rs      - Players, round, turn, bar               │
//! │  ├── engine.rs     - Round and match transitions             │
//! │  ├── presentation.rs - Overlays and badges                   │
//! │  ├── events.rs     - Event log                               │
//! │  └── tick.rs       - One loop iteration                      │
//! │                                                              │
//! │  control/          - Operator surface                        │
//! │  ├── command.rs    - Start / reset / target commands         │
//! │  └── snapshot.rs   - Read-only state export                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! `sensor/` and `game/` never read the wall clock. Time is a wrapping
//! millisecond [`Tick`] passed in by the caller, so a recorded pin trace
//! replays to an identical state fingerprint.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod control;
pub mod core;
pub mod game;
pub mod sensor;

// Re-export commonly used types
pub use control::{parse_line, ControlCommand, Request, Snapshot};
pub use crate::core::clock::{Clock, Deadline, Tick};
pub use crate::core::config::RigConfig;
pub use game::state::{MatchPhase, MatchState};
pub use game::tick::{replay_trace, tick, Console, TickResult};
pub use sensor::{Level, SensorEvent, SensorTrace};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loop rate the timing windows assume (Hz, one tick per millisecond)
pub const TICK_RATE_HZ: u32 = 1000;

/// Fewest seats in a match
pub const MIN_PLAYERS: usize = 2;

/// Most seats in a match
pub const MAX_PLAYERS: usize = 8;

/// Lowest accepted target score
pub const MIN_TARGET_SCORE: u32 = 1;

/// Highest accepted target score
pub const MAX_TARGET_SCORE: u32 = 50;
