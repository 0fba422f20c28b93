//! Optional TOML overrides for the pony configuration.
//!
//! ```toml
//! [shake]
//! sensitivity_px = 6
//!
//! [interaction]
//! boop_timeout_ms = 1500
//! transitions = [
//!     { count = 1, state = "booped-1" },
//!     { count = 10, state = "broken" },
//! ]
//! ```
//!
//! Every field is optional; missing fields keep their defaults.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ponyboop_core::{BoopTransitionTable, DisplayState, InteractionConfig, PonyConfig, ShakeConfig};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfigFile {
    pub shake: ShakeSection,
    pub interaction: InteractionSection,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShakeSection {
    pub min_duration_ms: Option<u64>,
    pub sensitivity_px: Option<u32>,
    pub check_interval_ms: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionSection {
    pub boop_timeout_ms: Option<u64>,
    pub scared_recovery_ms: Option<u64>,
    pub inactive_timeout_ms: Option<u64>,
    pub transitions: Option<Vec<TransitionEntry>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionEntry {
    pub count: u32,
    pub state: String,
}

impl SimConfigFile {
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid TOML pony configuration")
    }

    /// Overlays the file on the defaults and validates the result.
    pub fn into_config(self) -> Result<PonyConfig> {
        let mut shake = ShakeConfig::default();
        if let Some(value) = self.shake.min_duration_ms {
            shake = shake.with_min_duration_ms(value);
        }
        if let Some(value) = self.shake.sensitivity_px {
            shake = shake.with_sensitivity_px(value);
        }
        if let Some(value) = self.shake.check_interval_ms {
            shake = shake.with_check_interval_ms(value);
        }

        let mut interaction = InteractionConfig::default();
        if let Some(value) = self.interaction.boop_timeout_ms {
            interaction = interaction.with_boop_timeout_ms(value);
        }
        if let Some(value) = self.interaction.scared_recovery_ms {
            interaction = interaction.with_scared_recovery_ms(value);
        }
        if let Some(value) = self.interaction.inactive_timeout_ms {
            interaction = interaction.with_inactive_timeout_ms(value);
        }
        if let Some(entries) = self.interaction.transitions {
            let pairs = entries
                .into_iter()
                .map(|entry| {
                    DisplayState::from_name(&entry.state)
                        .map(|state| (entry.count, state))
                        .ok_or_else(|| anyhow!("unknown display state '{}'", entry.state))
                })
                .collect::<Result<Vec<_>>>()?;
            interaction = interaction.with_transitions(BoopTransitionTable::from_pairs(pairs));
        }

        let config = PonyConfig::default()
            .with_shake(shake)
            .with_interaction(interaction);
        config.validate().context("invalid pony configuration")?;
        Ok(config)
    }
}

/// Loads the configuration at `path`, or the defaults when there is none.
pub fn load(path: Option<&Path>) -> Result<PonyConfig> {
    let Some(path) = path else {
        return Ok(PonyConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    SimConfigFile::parse(&raw)
        .and_then(SimConfigFile::into_config)
        .with_context(|| format!("failed loading config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = SimConfigFile::parse("").and_then(SimConfigFile::into_config).unwrap();
        assert_eq!(config, PonyConfig::default());
    }

    #[test]
    fn fields_overlay_defaults() {
        let raw = r#"
            [shake]
            sensitivity_px = 6

            [interaction]
            boop_timeout_ms = 1500
            transitions = [
                { count = 1, state = "booped-1" },
                { count = 10, state = "broken" },
            ]
        "#;
        let config = SimConfigFile::parse(raw).and_then(SimConfigFile::into_config).unwrap();
        assert_eq!(config.shake.sensitivity_px, 6);
        assert_eq!(config.shake.check_interval_ms, 400);
        assert_eq!(config.interaction.boop_timeout_ms, 1500);
        assert_eq!(config.interaction.transitions.lookup(10), Some(DisplayState::Broken));
        assert_eq!(config.interaction.transitions.lookup(24), None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero = SimConfigFile::parse("[shake]\ncheck_interval_ms = 0")
            .and_then(SimConfigFile::into_config);
        assert!(zero.is_err());

        let unknown_state = SimConfigFile::parse(
            "[interaction]\ntransitions = [{ count = 1, state = \"sleepy\" }]",
        )
        .and_then(SimConfigFile::into_config);
        assert!(unknown_state.unwrap_err().to_string().contains("sleepy"));

        let descending = SimConfigFile::parse(
            "[interaction]\ntransitions = [{ count = 4, state = \"booped-2\" }, { count = 1, state = \"booped-1\" }]",
        )
        .and_then(SimConfigFile::into_config);
        assert!(descending.is_err());

        assert!(SimConfigFile::parse("[shake]\nspeed = 3").is_err());
    }
}
