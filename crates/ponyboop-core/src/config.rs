//! Tuning parameters for the detector and the interaction state machine.
//!
//! Constructors treat configuration as a precondition. Use
//! [`PonyConfig::validate`] when values come from outside the program.

use std::fmt;

use crate::display::BoopTransitionTable;

/// Shake classification parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShakeConfig {
    /// Continuous movement must last longer than this before a shake starts.
    pub min_duration_ms: u64,
    /// Per-axis displacement between samples that counts as movement.
    pub sensitivity_px: u32,
    /// Period between window position samples.
    pub check_interval_ms: u64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: 500,
            sensitivity_px: 10,
            check_interval_ms: 400,
        }
    }
}

impl ShakeConfig {
    pub fn with_min_duration_ms(mut self, value: u64) -> Self {
        self.min_duration_ms = value;
        self
    }

    pub fn with_sensitivity_px(mut self, value: u32) -> Self {
        self.sensitivity_px = value;
        self
    }

    pub fn with_check_interval_ms(mut self, value: u64) -> Self {
        self.check_interval_ms = value;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "check_interval_ms",
            });
        }
        Ok(())
    }
}

/// Interaction state machine parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionConfig {
    /// Quiet time after the last boop before the pony goes back to resting.
    pub boop_timeout_ms: u64,
    /// Delay between the end of a shake and the return to resting.
    pub scared_recovery_ms: u64,
    /// Time without any interaction before the pony turns inactive.
    pub inactive_timeout_ms: u64,
    pub transitions: BoopTransitionTable,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            boop_timeout_ms: 1000,
            scared_recovery_ms: 1000,
            inactive_timeout_ms: 4000,
            transitions: BoopTransitionTable::default(),
        }
    }
}

impl InteractionConfig {
    pub fn with_boop_timeout_ms(mut self, value: u64) -> Self {
        self.boop_timeout_ms = value;
        self
    }

    pub fn with_scared_recovery_ms(mut self, value: u64) -> Self {
        self.scared_recovery_ms = value;
        self
    }

    pub fn with_inactive_timeout_ms(mut self, value: u64) -> Self {
        self.inactive_timeout_ms = value;
        self
    }

    pub fn with_transitions(mut self, transitions: BoopTransitionTable) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.transitions.validate()
    }
}

/// Full configuration of one pony.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PonyConfig {
    pub shake: ShakeConfig,
    pub interaction: InteractionConfig,
}

impl PonyConfig {
    pub fn with_shake(mut self, shake: ShakeConfig) -> Self {
        self.shake = shake;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shake.validate()?;
        self.interaction.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    ZeroInterval { field: &'static str },
    ZeroThreshold,
    NonIncreasingThreshold { previous: u32, next: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroInterval { field } => write!(f, "{field} must be greater than zero"),
            ConfigError::ZeroThreshold => f.write_str("boop thresholds start at 1"),
            ConfigError::NonIncreasingThreshold { previous, next } => {
                write!(f, "boop threshold {next} does not follow {previous}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
