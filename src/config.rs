//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Configuration files (TOML)
//! - Defaults

use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::session::DEFAULT_SESSION_NAME;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name given to sessions created without one
    #[serde(default = "default_session_name")]
    pub default_name: String,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Format used when `--output` is not given
    #[serde(default)]
    pub format: OutputFormat,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_session_name() -> String {
    DEFAULT_SESSION_NAME.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_name: default_session_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.automaton-workbench/config.toml
    /// 3. /etc/automaton-workbench/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("config.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".automaton-workbench").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/automaton-workbench/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}
