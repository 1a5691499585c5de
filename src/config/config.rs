use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::config::logging_config::LoggingConfig;
use crate::plugins::registry::PluginInstance;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Host id must not be empty")]
    InvalidHostId,
    #[error("Unknown log level '{0}'")]
    InvalidLogLevel(String),
    #[error("log_file_path is required when log_to_file is enabled")]
    MissingLogFilePath,
    #[error("Invalid plugin '{name}': {reason}")]
    InvalidPlugin { name: String, reason: String },
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Represents the configuration for the host process
#[derive(Debug, Deserialize, Clone)]
pub struct HostConfig {
    pub id: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Default log level for the host configuration
fn default_log_level() -> String {
    "error".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            id: "chorus".to_string(),
            log_level: default_log_level(),
        }
    }
}

impl HostConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::InvalidHostId);
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub host: HostConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub plugins: HashMap<String, PluginInstance>,
}

impl Config {
    /// Load and validate a TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.host.validate()?;

        if self.logging.log_to_file && self.logging.log_file_path.trim().is_empty() {
            return Err(ConfigError::MissingLogFilePath);
        }

        // Every configured plugin must resolve with its options
        for (name, instance) in &self.plugins {
            if let Err(e) = instance.resolve_plugin() {
                return Err(ConfigError::InvalidPlugin {
                    name: name.clone(),
                    reason: e.to_string(),
                });
            }
        }

        Ok(())
    }
}
