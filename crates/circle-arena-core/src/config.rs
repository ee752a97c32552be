//! Arena configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for a new arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Initial canvas width.
    pub canvas_width: f64,
    /// Initial canvas height.
    pub canvas_height: f64,
    /// Diameter of every circle.
    pub circle_size: f64,
    /// Maximum number of history events kept (None = unbounded).
    pub history_limit: Option<usize>,
    /// Seed for shape placement and colors (None = seeded from the OS).
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            canvas_width: 772.0,
            canvas_height: 374.0,
            circle_size: 50.0,
            history_limit: None,
            seed: None,
        }
    }
}

impl ArenaConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Self::from_json(&json)
    }

    /// Serialize the config to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(self.circle_size.is_finite() && self.circle_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "circle_size must be positive, got {}",
                self.circle_size
            )));
        }
        for (name, value) in [("canvas_width", self.canvas_width), ("canvas_height", self.canvas_height)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be non-negative, got {value}")));
            }
        }
        Ok(())
    }
}
