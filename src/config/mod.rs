use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    analysis::WeekNumbering,
    currency::LocaleConfig,
    utils::paths::{config_file_in, ensure_dir, write_atomic},
};

pub const MONTHS_BACK_CHOICES: [u32; 7] = [1, 2, 3, 4, 5, 6, 12];
pub const DEFAULT_MONTHS_BACK: u32 = 3;
pub const MAX_MONTHS_BACK: u32 = 12;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration could not be parsed: {0}")]
    Serde(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}

/// User preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size of the lookback window used by the revenue targets.
    pub months_back: u32,
    pub week_numbering: WeekNumbering,
    pub currency: String,
    pub locale: LocaleConfig,
    /// Key the record snapshot is stored under.
    pub records_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            months_back: DEFAULT_MONTHS_BACK,
            week_numbering: WeekNumbering::default(),
            currency: "BRL".into(),
            locale: LocaleConfig::default(),
            records_key: "expenses".into(),
        }
    }
}

impl Config {
    pub fn set_months_back(&mut self, months: u32) -> Result<(), ConfigError> {
        validate_months_back(months)?;
        self.months_back = months;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_months_back(self.months_back)?;
        if self.records_key.trim().is_empty() {
            return Err(ConfigError::Invalid("records key must not be empty".into()));
        }
        Ok(())
    }
}

fn validate_months_back(months: u32) -> Result<(), ConfigError> {
    if (1..=MAX_MONTHS_BACK).contains(&months) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "months back must be between 1 and {MAX_MONTHS_BACK}, got {months}"
        )))
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = config_file_in(base.as_ref());
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    /// Reads the stored configuration, falling back to defaults when none exists yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
