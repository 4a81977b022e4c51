use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::DEFAULT_BATCH_SIZE;
use crate::error::{MigrationError, Result};
use crate::transform::PunctuationScheme;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the legacy index service
    pub legacy_url: String,
    /// Base URL of the register store that accepts migrated records
    pub register_url: String,
    /// Subsystem name stamped on error reports
    pub application_name: String,
    pub batch_size: usize,
    pub request_timeout_secs: u64,
    pub decoder: DecoderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub punctuation_scheme: PunctuationScheme,
    pub development_corporation_codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_prefix: String,
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            legacy_url: String::new(),
            register_url: String::new(),
            application_name: "lc-migrator".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout_secs: 30,
            decoder: DecoderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            punctuation_scheme: PunctuationScheme::Keyed,
            development_corporation_codes: vec!["16".to_string(), "10".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_prefix: "migrator.log".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults when the file is absent,
    /// then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                MigrationError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml_str(&content)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("LC_LEGACY_URL") {
            self.legacy_url = url;
        }
        if let Some(url) = lookup("LC_REGISTER_URL") {
            self.register_url = url;
        }
        if let Some(name) = lookup("LC_APPLICATION_NAME") {
            self.application_name = name;
        }
        if let Some(size) = lookup("LC_BATCH_SIZE") {
            self.batch_size = size
                .trim()
                .parse()
                .map_err(|_| MigrationError::Config(format!("LC_BATCH_SIZE '{}' is not a number", size)))?;
        }
        Ok(())
    }

    /// Checks needed before talking to the collaborators
    pub fn validate(&self) -> Result<()> {
        if self.legacy_url.trim().is_empty() {
            return Err(MigrationError::Config("legacy_url is not set".to_string()));
        }
        if self.register_url.trim().is_empty() {
            return Err(MigrationError::Config("register_url is not set".to_string()));
        }
        if self.batch_size == 0 {
            return Err(MigrationError::Config("batch_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
