//! Serializable run configuration.

use std::collections::HashMap;
use std::path::Path;

use marketpulse_core::{AnalysisConfig, Locale};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a full briefing run.
///
/// Captures the symbol universe, narrative locale, analysis parameter
/// overrides, and delivery targets. All fields have sensible defaults so a
/// minimal config only needs a ticker list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Symbols to analyze, in report order.
    pub tickers: Vec<String>,

    /// Narrative language.
    pub locale: Locale,

    /// Default Discord webhook URL. Empty disables delivery.
    pub webhook_url: String,

    /// Per-sector webhook overrides, keyed by Yahoo sector name.
    /// A symbol whose sector appears here is delivered to that webhook
    /// instead of the default.
    pub sector_webhooks: HashMap<String, String>,

    /// Indicator, scoring, and classification parameters.
    pub analysis: AnalysisConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            locale: Locale::default(),
            webhook_url: String::new(),
            sector_webhooks: HashMap::new(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load a config from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::Invalid("tickers list is empty".into()));
        }
        if self.tickers.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("blank ticker in list".into()));
        }
        Ok(())
    }

    /// Webhook for a given sector, falling back to the default.
    /// Returns `None` when delivery is disabled entirely.
    pub fn webhook_for(&self, sector: &str) -> Option<&str> {
        if let Some(url) = self.sector_webhooks.get(sector) {
            return Some(url.as_str());
        }
        if self.webhook_url.is_empty() {
            None
        } else {
            Some(self.webhook_url.as_str())
        }
    }
}
