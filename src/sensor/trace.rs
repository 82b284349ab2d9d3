//! Sensor Trace Recording
//!
//! Delta-compressed record of the raw sensor line plus the control commands
//! serviced alongside it. Enough to rerun a session tick for tick.
//!
//! Only pin *changes* are stored: a typical toss is two or three deltas
//! (more with contact chatter), so a whole match fits in a few kilobytes.
//!
//! Record ticks are ordered by their offset from `start_tick`, so a session
//! may run across the counter wrap. One trace spans at most `u32::MAX` ticks.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::control::command::ControlCommand;
use crate::core::clock::{elapsed, Tick};
use crate::core::hash::{StateHash, StateHasher};

/// Trace load/save failure.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// Reading or writing the file failed.
    #[error("Trace I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Binary encoding failed or the file is corrupt.
    #[error("Trace encoding failed: {0}")]
    Encode(#[from] bincode::Error),

    /// The trace would step backwards or not at all.
    #[error("Invalid trace: {0}")]
    Invalid(String),
}

// =============================================================================
// RECORDS
// =============================================================================

/// Raw pin level from `tick` onwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDelta {
    /// First tick at the new level.
    pub tick: Tick,
    /// Electrical level.
    pub high: bool,
}

/// Command serviced after the tick at `tick`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Iteration the command was serviced in.
    pub tick: Tick,
    /// The command.
    pub command: ControlCommand,
}

// =============================================================================
// TRACE
// =============================================================================

/// Recorded session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SensorTrace {
    /// Pin level before the first delta.
    pub idle_high: bool,

    /// First tick of the session.
    pub start_tick: Tick,

    /// Last tick of the session.
    pub end_tick: Tick,

    /// Ticks between loop iterations.
    pub period: u32,

    /// Pin changes, in tick order.
    deltas: Vec<PinDelta>,

    /// Serviced commands, in tick order.
    commands: Vec<CommandRecord>,

    /// Last recorded level (for delta comparison)
    #[serde(skip)]
    last_high: bool,
}

impl SensorTrace {
    /// Start an empty trace with the line idling at `idle_high`.
    pub fn new(idle_high: bool, start_tick: Tick, period: u32) -> Self {
        Self {
            idle_high,
            start_tick,
            end_tick: start_tick,
            period: period.max(1),
            deltas: Vec::with_capacity(256),
            commands: Vec::new(),
            last_high: idle_high,
        }
    }

    /// Record the pin read at `tick`. Stored only if it changed.
    pub fn record_pin(&mut self, tick: Tick, high: bool) {
        self.end_tick = tick;
        if high != self.last_high {
            self.deltas.push(PinDelta { tick, high });
            self.last_high = high;
        }
    }

    /// Record a command serviced at `tick`.
    pub fn record_command(&mut self, tick: Tick, command: ControlCommand) {
        if self.offset(tick) > self.offset(self.end_tick) {
            self.end_tick = tick;
        }
        self.commands.push(CommandRecord { tick, command });
    }

    /// Ticks from the start of the session to `tick`.
    #[inline]
    fn offset(&self, tick: Tick) -> u32 {
        elapsed(self.start_tick, tick)
    }

    /// Pin level at `tick`.
    ///
    /// Binary search over the deltas.
    pub fn pin_at(&self, tick: Tick) -> bool {
        let at = self.offset(tick);
        let idx = self.deltas.partition_point(|d| self.offset(d.tick) <= at);
        if idx == 0 {
            self.idle_high
        } else {
            self.deltas[idx - 1].high
        }
    }

    /// All pin deltas.
    pub fn deltas(&self) -> &[PinDelta] {
        &self.deltas
    }

    /// All command records.
    pub fn commands(&self) -> &[CommandRecord] {
        &self.commands
    }

    /// Iterate the session one loop iteration at a time.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            trace: self,
            offset: 0,
            span: self.offset(self.end_tick),
            command_idx: 0,
            done: false,
        }
    }

    /// Fingerprint of the recorded input.
    pub fn fingerprint(&self) -> StateHash {
        let mut hasher = StateHasher::for_sensor_trace();
        hasher.update_bool(self.idle_high);
        hasher.update_u32(self.start_tick);
        hasher.update_u32(self.end_tick);
        hasher.update_u32(self.period);
        hasher.update_u32(self.deltas.len() as u32);
        for delta in &self.deltas {
            hasher.update_u32(delta.tick);
            hasher.update_bool(delta.high);
        }
        hasher.update_u32(self.commands.len() as u32);
        for record in &self.commands {
            hasher.update_u32(record.tick);
            record.command.hash_into(&mut hasher);
        }
        hasher.finalize()
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TraceError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a bincode trace.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TraceError> {
        let mut trace: SensorTrace = bincode::deserialize(bytes)?;
        if trace.period == 0 {
            return Err(TraceError::Invalid("period must be non-zero".into()));
        }
        let span = trace.offset(trace.end_tick);
        if !ordered(trace.deltas.iter().map(|d| trace.offset(d.tick)), span)
            || !ordered(trace.commands.iter().map(|r| trace.offset(r.tick)), span)
        {
            return Err(TraceError::Invalid(
                "records out of order or past the end tick".into(),
            ));
        }
        trace.last_high = trace.deltas.last().map_or(trace.idle_high, |d| d.high);
        Ok(trace)
    }

    /// Write to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TraceError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Read from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}

/// Offsets never step backwards and stay within `span`.
fn ordered(mut offsets: impl Iterator<Item = u32>, span: u32) -> bool {
    let mut last = 0;
    offsets.all(|at| {
        let ok = at >= last && at <= span;
        last = at;
        ok
    })
}

/// One loop iteration of a recorded session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayStep<'a> {
    /// Iteration tick.
    pub tick: Tick,
    /// Pin read this iteration.
    pub high: bool,
    /// Commands serviced after the tick.
    pub commands: &'a [CommandRecord],
}

/// Iterator for replaying a trace iteration by iteration.
pub struct ReplayIterator<'a> {
    trace: &'a SensorTrace,
    /// Offset of the next iteration from `start_tick`.
    offset: u32,
    span: u32,
    command_idx: usize,
    done: bool,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = ReplayStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset > self.span {
            return None;
        }
        let tick = self.trace.start_tick.wrapping_add(self.offset);

        let first = self.command_idx;
        while let Some(record) = self.trace.commands.get(self.command_idx) {
            if self.trace.offset(record.tick) > self.offset {
                break;
            }
            self.command_idx += 1;
        }

        match self.offset.checked_add(self.trace.period) {
            Some(next) => self.offset = next,
            None => self.done = true,
        }

        Some(ReplayStep {
            tick,
            high: self.trace.pin_at(tick),
            commands: &self.trace.commands[first..self.command_idx],
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
