//! Control Interface
//!
//! Operator commands in, read-only snapshots out. The control surface only
//! touches engine state between loop iterations.

pub mod command;
pub mod snapshot;

pub use command::{parse_line, CommandParseError, ControlCommand, Request};
pub use snapshot::{BarView, OverlayView, PlayerView, Snapshot, WinnerView};
