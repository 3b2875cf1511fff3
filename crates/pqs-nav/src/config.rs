//! Configuration management for pqs-nav.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "pqs-nav";

/// Default local storage file name.
const DATABASE_FILE_NAME: &str = "local-storage.db";

/// Storage key holding the serialized analytics buffer.
pub const DEFAULT_ANALYTICS_KEY: &str = "navigation_analytics";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `PQSNAV_`)
/// 2. TOML config file at `~/.config/pqs-nav/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Navigation and history configuration.
    pub navigation: NavigationConfig,
    /// Analytics configuration.
    pub analytics: AnalyticsConfig,
    /// Local storage configuration.
    pub storage: StorageConfig,
}

/// Navigation-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Maximum number of history entries retained.
    pub history_limit: usize,
}

/// Analytics-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Record navigation events.
    pub enabled: bool,
    /// Maximum number of events kept in the buffer.
    pub max_events: usize,
    /// Number of buffered mutations before the buffer is written back.
    /// Set to 1 to write on every mutation.
    pub flush_every: usize,
    /// Key used in local storage.
    pub storage_key: String,
}

/// Local storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the local storage database.
    /// Defaults to `~/.local/share/pqs-nav/local-storage.db`
    pub database_path: Option<PathBuf>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { history_limit: 50 }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_events: 1000,
            flush_every: 10,
            storage_key: DEFAULT_ANALYTICS_KEY.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("PQSNAV_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.navigation.history_limit == 0 {
            return Err(Error::config_validation(
                "history_limit must be greater than 0",
            ));
        }

        if self.analytics.max_events == 0 {
            return Err(Error::config_validation(
                "max_events must be greater than 0",
            ));
        }

        if self.analytics.flush_every == 0 {
            return Err(Error::config_validation(
                "flush_every must be greater than 0",
            ));
        }

        if self.analytics.storage_key.trim().is_empty() {
            return Err(Error::config_validation("storage_key must not be empty"));
        }

        Ok(())
    }

    /// Get the local storage path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
