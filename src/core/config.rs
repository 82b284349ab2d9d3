//! Rig Configuration
//!
//! Timing windows, rule constants and sensor polarity. Every field has a
//! default tuned for a lever microswitch on a 1 kHz loop; a JSON file can
//! override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{MAX_TARGET_SCORE, MIN_TARGET_SCORE};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema.
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Timing windows, all in ticks (milliseconds).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Quiet time before a pressed reading becomes stable.
    pub press_debounce_ms: u32,
    /// Quiet time before a released reading becomes stable.
    pub release_debounce_ms: u32,
    /// Quiet time after the last stable edge before a burst is settled.
    pub burst_sustain_ms: u32,
    /// Cooldown after a burst before a new press may count.
    pub lockout_ms: u32,
    /// Continuous hold after settling that qualifies as a ringer.
    pub ringer_hold_ms: u32,
    /// How long a presentation overlay stays active.
    pub overlay_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            press_debounce_ms: 10,
            release_debounce_ms: 30, // release chatters longer than make
            burst_sustain_ms: 80,
            lockout_ms: 200,
            ringer_hold_ms: 600,
            overlay_ms: 2_500,
        }
    }
}

/// Game rule constants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Attempts allowed per turn before any bar exists.
    pub opening_attempt_cap: u32,
    /// Target score a fresh controller starts with.
    pub default_target_score: u32,
    /// Display names are truncated to this many characters.
    pub max_name_len: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            opening_attempt_cap: 10,
            default_target_score: 5,
            max_name_len: 16,
        }
    }
}

/// Sensor line polarity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Pressed when the line reads low (pull-up wiring).
    pub active_low: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self { active_low: true }
    }
}

/// Complete controller configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Timing windows.
    pub timing: TimingConfig,
    /// Rule constants.
    pub rules: RulesConfig,
    /// Sensor polarity.
    pub sensor: SensorConfig,
}

impl RigConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: RigConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("timing.press_debounce_ms", self.timing.press_debounce_ms),
            ("timing.release_debounce_ms", self.timing.release_debounce_ms),
            ("timing.burst_sustain_ms", self.timing.burst_sustain_ms),
            ("timing.ringer_hold_ms", self.timing.ringer_hold_ms),
        ];
        for (field, value) in windows {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "window must be at least 1 tick".to_string(),
                });
            }
        }

        if self.rules.opening_attempt_cap == 0 {
            return Err(ConfigError::Invalid {
                field: "rules.opening_attempt_cap",
                reason: "cap must be at least 1".to_string(),
            });
        }

        let target = self.rules.default_target_score;
        if !(MIN_TARGET_SCORE..=MAX_TARGET_SCORE).contains(&target) {
            return Err(ConfigError::Invalid {
                field: "rules.default_target_score",
                reason: format!(
                    "{} outside {}..={}",
                    target, MIN_TARGET_SCORE, MAX_TARGET_SCORE
                ),
            });
        }

        if self.rules.max_name_len == 0 {
            return Err(ConfigError::Invalid {
                field: "rules.max_name_len",
                reason: "names need at least one character".to_string(),
            });
        }

        Ok(())
    }
}
