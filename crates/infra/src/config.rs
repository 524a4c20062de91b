//! Configuration loading and representation.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What `init` does when counters already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReinitPolicy {
    /// Fail with `AlreadyInitialized` and leave the ledger untouched.
    #[default]
    Refuse,
    /// Reset every counter to zero. Existing records stay in the ledger but
    /// are no longer reachable through the counters.
    Reset,
}

impl FromStr for ReinitPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "refuse" => Ok(ReinitPolicy::Refuse),
            "reset" => Ok(ReinitPolicy::Reset),
            other => Err(ConfigError::Invalid {
                key: MarketConfig::REINIT_ENV,
                value: other.to_string(),
                expected: "refuse | reset",
            }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key} (expected {expected})")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Marketplace ledger settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub reinit: ReinitPolicy,
}

impl MarketConfig {
    pub const REINIT_ENV: &'static str = "MARKETLEDGER_REINIT";

    pub fn with_reinit(mut self, policy: ReinitPolicy) -> Self {
        self.reinit = policy;
        self
    }

    /// Load from process environment; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(Self::REINIT_ENV) {
            config.reinit = value.parse()?;
        }
        Ok(config)
    }
}
