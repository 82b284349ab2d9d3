//! Core deterministic primitives.
//!
//! Timing math and state fingerprinting shared by the sensor pipeline
//! and the game engine. Nothing here reads the wall clock.

pub mod clock;
pub mod config;
pub mod hash;

// Re-export core types
pub use clock::{elapsed, reached, Clock, Deadline, Tick};
pub use config::{ConfigError, RigConfig, RulesConfig, SensorConfig, TimingConfig};
pub use hash::{revision_tag, StateHash, StateHasher};
