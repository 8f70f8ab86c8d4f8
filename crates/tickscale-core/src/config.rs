//! tickscale.toml configuration parser.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level contents of `tickscale.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickscaleConfig {
    pub scaler: ScalerConfig,
    /// Functions registered at startup.
    pub functions: Vec<String>,
}

/// Tunables of the per-function control loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerConfig {
    /// Length of one tick in milliseconds.
    pub tick_interval_ms: u64,
    /// Idle time after which a container is evicted.
    pub max_idle_ms: u64,
    /// Number of execution-time samples kept for the moving average.
    pub execution_time_window_size: usize,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            max_idle_ms: 15_000,
            execution_time_window_size: 10,
        }
    }
}

impl ScalerConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn max_idle(&self) -> Duration {
        Duration::from_millis(self.max_idle_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.execution_time_window_size == 0 {
            return Err(ConfigError::Invalid(
                "execution_time_window_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl TickscaleConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: TickscaleConfig = toml::from_str(content)?;
        config.scaler.validate()?;
        Ok(config)
    }
}
