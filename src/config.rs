//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for the word game service.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    database_path: String,

    /// Host the relay server binds to.
    #[serde(default = "default_relay_host")]
    relay_host: String,

    /// Port the relay server binds to.
    #[serde(default = "default_relay_port")]
    relay_port: u16,

    /// Relay URL clients connect to (e.g. "ws://127.0.0.1:8081").
    #[serde(default)]
    relay_url: Option<String>,
}

#[instrument]
fn default_database_path() -> String {
    "word_tree.db".to_string()
}

#[instrument]
fn default_relay_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_relay_port() -> u16 {
    8081
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(database_path = %config.database_path, "Config loaded successfully");
        Ok(config)
    }

    /// Relay URL to connect to, derived from host and port when not set
    /// explicitly.
    pub fn effective_relay_url(&self) -> String {
        self.relay_url
            .clone()
            .unwrap_or_else(|| format!("ws://{}:{}", self.relay_host, self.relay_port))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            relay_host: default_relay_host(),
            relay_port: default_relay_port(),
            relay_url: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
