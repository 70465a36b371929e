//! Configuration management for Earnwatch.
//!
//! Configuration lives in a single JSON file at `~/.earnwatch/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (`EARNWATCH_*`)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `EARNWATCH_API_URL` → api.endpoint
//! - `EARNWATCH_LOG_LEVEL` → observability.log_level
//! - `EARNWATCH_LOG_FORMAT` → observability.log_format

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".earnwatch"),
        |dirs| dirs.home_dir().join(".earnwatch"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Upstream API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the earnings-backtest API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000".into()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Default query parameters applied when the user does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryDefaults {
    /// Minimum market capitalization filter (USD)
    #[serde(default = "default_min_market_cap")]
    pub min_market_cap: f64,

    /// Recent-window lookback in days (1-30)
    #[serde(default = "default_recent_days")]
    pub recent_days: u32,

    /// Maximum history entries to list (1-200)
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            min_market_cap: default_min_market_cap(),
            recent_days: default_recent_days(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_min_market_cap() -> f64 {
    1_000_000_000.0
}

fn default_recent_days() -> u32 {
    7
}

fn default_history_limit() -> u32 {
    50
}

/// Top-level Earnwatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub defaults: QueryDefaults,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when the file does not exist. Environment variables win over file
    /// values.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `EARNWATCH_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("EARNWATCH_API_URL") {
            if !url.is_empty() {
                self.api.endpoint = url;
            }
        }
        if let Ok(level) = std::env::var("EARNWATCH_LOG_LEVEL") {
            if !level.is_empty() {
                self.observability.log_level = level;
            }
        }
        if let Ok(format) = std::env::var("EARNWATCH_LOG_FORMAT") {
            if !format.is_empty() {
                self.observability.log_format = format;
            }
        }
    }

    /// Save configuration to the default path (creates the directory).
    pub fn save(&self) -> Result<()> {
        let dir = config_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;

        let path = config_path();
        let raw = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, raw)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, "http://127.0.0.1:8000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.defaults.min_market_cap, 1_000_000_000.0);
        assert_eq!(config.defaults.recent_days, 7);
        assert_eq!(config.defaults.history_limit, 50);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api": {"endpoint": "http://api.example.com/"}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.endpoint, "http://api.example.com/");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.defaults.recent_days, 7);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
