//! Game Logic Module
//!
//! Elimination rules and the loop step that feeds them. Deterministic:
//! same ticks and pin reads in, same state out.
//!
//! ## Module Structure
//!
//! - `state`: Players, round, turn, bar, match bookkeeping
//! - `engine`: Rules transitions driven by sensor events and commands
//! - `presentation`: Overlays and per-seat badges
//! - `tick`: One loop iteration and trace replay
//! - `events`: Game events for logs and replay checks

pub mod engine;
pub mod events;
pub mod presentation;
pub mod state;
pub mod tick;

// Re-export key types
pub use events::{GameEvent, GameEventData};
pub use presentation::{Badge, Overlay, OverlayKind, Presentation};
pub use state::{AliveMask, Bar, MatchPhase, MatchState, PhaseKind, Player, PointReason, Round, Turn};
pub use tick::{replay_trace, tick, Console, TickResult};
