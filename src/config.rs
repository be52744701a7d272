//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a default so a partial (or missing) file still
//! yields a runnable configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::types::ArielError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    /// Sleep between cycles.
    pub cycle_time_secs: u64,
    /// Sleep taken instead of the cycle body while paused.
    pub pause_interval_secs: u64,
    pub state_file: String,
    /// Start paused regardless of the persisted flag.
    pub start_paused: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "ARIEL-001".to_string(),
            cycle_time_secs: 1800,
            pause_interval_secs: 60,
            state_file: "ariel_state.json".to_string(),
            start_paused: false,
        }
    }
}

impl AgentConfig {
    pub fn cycle_time(&self) -> Duration {
        Duration::from_secs(self.cycle_time_secs)
    }

    pub fn pause_interval(&self) -> Duration {
        Duration::from_secs(self.pause_interval_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 3002,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults if the file is absent.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            warn!(path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.agent.cycle_time_secs == 0 {
            return Err(ArielError::Config("agent.cycle_time_secs must be > 0".into()).into());
        }
        if self.agent.pause_interval_secs == 0 {
            return Err(ArielError::Config("agent.pause_interval_secs must be > 0".into()).into());
        }
        if self.agent.state_file.trim().is_empty() {
            return Err(ArielError::Config("agent.state_file must not be empty".into()).into());
        }
        Ok(())
    }
}
