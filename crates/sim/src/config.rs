use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::grid::CELLS_PER_WORD;

/// Errors from loading or validating a [`SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Simulation parameters. Every field has a default, so a config file only
/// needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid width in cells. Must be a multiple of 32.
    pub width: u32,
    /// Grid height in cells. Must be a multiple of 32.
    pub height: u32,
    /// Multiplier applied to the gravity vector before it reaches velocities.
    pub grav_scale: f32,
    /// Fraction of velocity kept (and reversed) on a bounce.
    pub bounce_scale: f32,
    /// Rows of particles placed along the bottom on start and reset.
    pub initial_rows: u32,
    /// Seed for the jitter stream.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            grav_scale: 1.0,
            bounce_scale: 0.5,
            initial_rows: 2,
            seed: 42,
        }
    }
}

impl SimConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&data)?;
        tracing::info!("loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value % CELLS_PER_WORD != 0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-zero multiple of {CELLS_PER_WORD}, got {value}"
                )));
            }
        }
        if self.initial_rows > self.height {
            return Err(ConfigError::Invalid(format!(
                "initial_rows ({}) exceeds height ({})",
                self.initial_rows, self.height
            )));
        }
        if !self.grav_scale.is_finite() {
            return Err(ConfigError::Invalid("grav_scale must be finite".into()));
        }
        if !self.bounce_scale.is_finite() || self.bounce_scale < 0.0 {
            return Err(ConfigError::Invalid(
                "bounce_scale must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}
