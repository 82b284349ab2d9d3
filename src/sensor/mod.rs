//! Sensor pipeline.
//!
//! Raw pin reads become debounced levels, debounced edges become
//! swing/ringer events. Traces record the raw line for replay.

pub mod classifier;
pub mod debounce;
pub mod trace;

pub use classifier::{BurstPhase, Classifier, SensorEvent};
pub use debounce::{Debouncer, Level};
pub use trace::{CommandRecord, PinDelta, ReplayStep, SensorTrace, TraceError};
