/// Generator configuration: every recognized option with its default.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::language::Language;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub enable_cache: bool,
    pub max_cache_size: usize,
    pub enable_analytics: bool,
    pub enable_history: bool,
    pub max_history_size: usize,
    pub enable_quality_scoring: bool,
    pub default_language: Language,
    /// A batch of `n` makes at most `n * batch_attempt_multiplier` attempts.
    pub batch_attempt_multiplier: usize,
    pub cache_staleness_ms: u64,
    /// Number of recent quality scores kept for the running average.
    pub quality_window: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enable_cache: true,
            max_cache_size: 500,
            enable_analytics: true,
            enable_history: true,
            max_history_size: 1000,
            enable_quality_scoring: true,
            default_language: Language::En,
            batch_attempt_multiplier: 3,
            cache_staleness_ms: 3_600_000,
            quality_window: 1000,
        }
    }
}

impl GeneratorConfig {
    /// Parse a config from a RON string. Missing fields take their defaults.
    pub fn parse_ron(input: &str) -> Result<GeneratorConfig, ConfigError> {
        let config: GeneratorConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_ron(path: &Path) -> Result<GeneratorConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_cache_size", self.max_cache_size),
            ("max_history_size", self.max_history_size),
            ("batch_attempt_multiplier", self.batch_attempt_multiplier),
            ("quality_window", self.quality_window),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be at least 1", field)));
            }
        }
        if i64::try_from(self.cache_staleness_ms).is_err() {
            return Err(ConfigError::Invalid(
                "cache_staleness_ms is out of range".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_staleness(&self) -> Duration {
        Duration::milliseconds(i64::try_from(self.cache_staleness_ms).unwrap_or(i64::MAX))
    }
}
