//! Control Commands
//!
//! Operator requests for the engine. Commands are JSON on the wire
//! (the same shape a poller would POST) and are also stored verbatim in
//! sensor traces so a replay services them at the same tick.

use serde::{Deserialize, Serialize};

use crate::core::hash::StateHasher;

// =============================================================================
// COMMANDS
// =============================================================================

/// State-changing request from the control surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlCommand {
    /// Reset and begin a new match.
    StartMatch {
        /// Requested seats (clamped by the engine).
        player_count: u32,
        /// Optional display names, by seat.
        #[serde(default)]
        names: Vec<String>,
    },

    /// Return to idle from any phase.
    ResetMatch,

    /// Points needed to win.
    SetTargetScore {
        /// New target (ignored outside the allowed range).
        target: u32,
    },
}

impl ControlCommand {
    /// Parse a JSON command.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ControlCommand::StartMatch { .. } => "start_match",
            ControlCommand::ResetMatch => "reset_match",
            ControlCommand::SetTargetScore { .. } => "set_target_score",
        }
    }

    /// Feed this command into a fingerprint.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        match self {
            ControlCommand::StartMatch { player_count, names } => {
                hasher.update_u8(0);
                hasher.update_u32(*player_count);
                hasher.update_u32(names.len() as u32);
                for name in names {
                    hasher.update_str(name);
                }
            }
            ControlCommand::ResetMatch => hasher.update_u8(1),
            ControlCommand::SetTargetScore { target } => {
                hasher.update_u8(2);
                hasher.update_u32(*target);
            }
        }
    }
}

// =============================================================================
// CONSOLE REQUESTS
// =============================================================================

/// One line of operator input, as understood by the host simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// A control command for the engine.
    Control(ControlCommand),
    /// Drive the simulated sensor.
    Pin {
        /// `true` for lever down.
        pressed: bool,
    },
    /// Stop reading requests for this many milliseconds.
    Wait {
        /// Pause length.
        ms: u32,
    },
    /// Print the current snapshot.
    Snapshot,
    /// Leave the loop.
    Quit,
}

/// Failure to understand an operator line.
#[derive(Debug, thiserror::Error)]
pub enum CommandParseError {
    /// Blank line.
    #[error("Empty command")]
    Empty,

    /// First word not recognised.
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// A required argument was missing.
    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),

    /// An argument did not parse.
    #[error("Bad argument for {command}: {value}")]
    BadArgument {
        /// Command word.
        command: &'static str,
        /// Offending text.
        value: String,
    },

    /// Malformed JSON command.
    #[error("Invalid JSON command: {0}")]
    Json(#[from] serde_json::Error),
}

fn number_arg<'a>(
    command: &'static str,
    mut words: impl Iterator<Item = &'a str>,
) -> Result<u32, CommandParseError> {
    let value = words
        .next()
        .ok_or(CommandParseError::MissingArgument(command))?;
    value.parse().map_err(|_| CommandParseError::BadArgument {
        command,
        value: value.to_string(),
    })
}

/// Parse one line of operator input.
///
/// Accepts the short word forms (`down`, `up`, `start 3 Ann Bob`, `reset`,
/// `target 7`, `wait 500`, `snapshot`, `quit`) or a JSON-encoded
/// [`ControlCommand`].
pub fn parse_line(line: &str) -> Result<Request, CommandParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandParseError::Empty);
    }
    if line.starts_with('{') || line.starts_with('"') {
        return Ok(Request::Control(ControlCommand::from_json(line)?));
    }

    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default().to_ascii_lowercase();

    let request = match head.as_str() {
        "down" | "press" => Request::Pin { pressed: true },
        "up" | "release" => Request::Pin { pressed: false },
        "start" => {
            let player_count = number_arg("start", &mut words)?;
            let names = words.map(str::to_string).collect();
            Request::Control(ControlCommand::StartMatch {
                player_count,
                names,
            })
        }
        "reset" => Request::Control(ControlCommand::ResetMatch),
        "target" => Request::Control(ControlCommand::SetTargetScore {
            target: number_arg("target", &mut words)?,
        }),
        "wait" => Request::Wait {
            ms: number_arg("wait", &mut words)?,
        },
        "snapshot" | "status" => Request::Snapshot,
        "quit" | "exit" => Request::Quit,
        _ => return Err(CommandParseError::Unknown(head)),
    };

    Ok(request)
}
