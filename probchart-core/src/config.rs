//! Chart configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::TimeUnit;
use crate::ingest::{IngestOptions, DEFAULT_FALLBACK_PROBABILITY};
use crate::range::RangeWindow;
use crate::ranking::DEFAULT_TOP_LIMIT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Every field is optional in the file; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Lines shown on a multi-market chart.
    pub top_limit: usize,
    /// Replaces unparsable probabilities during ingest.
    pub fallback_probability: f64,
    pub time_unit: TimeUnit,
    pub default_range: RangeWindow,
    /// Percentage points added above and below the data on the value axis.
    pub value_padding: f64,
    /// Minimum vertical distance between tooltip labels, in rows.
    pub label_gap: f64,
    /// Draw every series instead of the top `top_limit`.
    pub show_all_series: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            top_limit: DEFAULT_TOP_LIMIT,
            fallback_probability: DEFAULT_FALLBACK_PROBABILITY,
            time_unit: TimeUnit::Seconds,
            default_range: RangeWindow::All,
            value_padding: 5.0,
            label_gap: 1.0,
            show_all_series: false,
        }
    }
}

impl ChartConfig {
    /// `$CONFIG_DIR/probchart/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("probchart").join("config.toml"))
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: ChartConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded chart config");
        Self::from_toml(&text)
    }

    /// Load `path` if given, else the default location if it exists, else
    /// built-in defaults. An explicit path that cannot be read is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.exists() => Self::load(&default),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_limit == 0 {
            return Err(ConfigError::Invalid("top_limit must be at least 1".into()));
        }
        if !(0.0..=100.0).contains(&self.fallback_probability) {
            return Err(ConfigError::Invalid(format!(
                "fallback_probability must be within [0, 100], got {}",
                self.fallback_probability
            )));
        }
        if self.value_padding < 0.0 || self.label_gap < 0.0 {
            return Err(ConfigError::Invalid(
                "value_padding and label_gap must not be negative".into(),
            ));
        }
        Ok(())
    }
}

impl From<&ChartConfig> for IngestOptions {
    fn from(config: &ChartConfig) -> Self {
        IngestOptions {
            fallback_probability: config.fallback_probability,
            time_unit: config.time_unit,
        }
    }
}
