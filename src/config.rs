//! Configuration management for Railtrail
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{RailtrailError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Railtrail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where session records and the draft are stored
    #[serde(default)]
    pub storage: StorageConfig,
    /// Session bookkeeping settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the sled store; the platform data directory when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path recorded on log entries that do not carry their own URL
    #[serde(default = "default_url")]
    pub default_url: String,
}

fn default_url() -> String {
    crate::session::manager::DEFAULT_PATH.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_url: default_url(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,

    /// Also append log output to this file
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file_path: None,
        }
    }
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from file, environment, and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    /// Later sources win: file, then environment, then CLI.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RailtrailError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| RailtrailError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(path) = std::env::var("RAILTRAIL_STORE_PATH") {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(url) = std::env::var("RAILTRAIL_DEFAULT_URL") {
            self.session.default_url = url;
        }

        if let Ok(level) = std::env::var("RAILTRAIL_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(json) = std::env::var("RAILTRAIL_LOG_JSON") {
            match json.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.logging.json = true,
                "0" | "false" | "no" => self.logging.json = false,
                _ => tracing::warn!("Invalid RAILTRAIL_LOG_JSON: {}", json),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(store) = &cli.store {
            self.storage.path = Some(store.clone());
        }
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `RailtrailError::Config` if any check fails
    pub fn validate(&self) -> Result<()> {
        if self.session.default_url.is_empty() {
            return Err(
                RailtrailError::Config("session.default_url cannot be empty".to_string()).into(),
            );
        }

        if !self.session.default_url.starts_with('/') {
            return Err(RailtrailError::Config(format!(
                "session.default_url must be an absolute path, got: {}",
                self.session.default_url
            ))
            .into());
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(RailtrailError::Config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ))
            .into());
        }

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(
                    RailtrailError::Config("storage.path cannot be empty".to_string()).into(),
                );
            }
        }

        Ok(())
    }

    /// Resolve the store directory
    ///
    /// Uses `storage.path` when set, otherwise `store` under the platform
    /// data directory.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }

        let proj_dirs = ProjectDirs::from("com", "railtrail", "railtrail").ok_or_else(|| {
            RailtrailError::Storage("Could not determine data directory".to_string())
        })?;
        Ok(proj_dirs.data_dir().join("store"))
    }
}
