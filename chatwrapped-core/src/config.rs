//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/chatwrapped/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/chatwrapped/` (~/.config/chatwrapped/)
//! - Data: `$XDG_DATA_HOME/chatwrapped/` (~/.local/share/chatwrapped/)
//! - State/Logs: `$XDG_STATE_HOME/chatwrapped/` (~/.local/state/chatwrapped/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Message store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Message store location settings.
#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    /// Use the bundled deterministic sample store instead of the live one
    #[serde(default)]
    pub use_sample: bool,

    /// Explicit path to the store; falls back to the OS message log
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Resolve the store path this run should open.
    ///
    /// `use_sample` wins over an explicit path; the sample store lives in
    /// the XDG data dir and is generated on demand by the caller.
    pub fn resolve_path(&self) -> PathBuf {
        if self.use_sample {
            return Config::sample_store_path();
        }
        self.path
            .clone()
            .unwrap_or_else(|| home_dir().join("Library/Messages/chat.db"))
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/chatwrapped/config.toml`
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("chatwrapped").join("config.toml")
    }

    /// Returns the data directory path (for the generated sample store)
    ///
    /// `$XDG_DATA_HOME/chatwrapped/`
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("chatwrapped")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/chatwrapped/`
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("chatwrapped")
    }

    /// Returns the generated sample store path
    ///
    /// `$XDG_DATA_HOME/chatwrapped/sample.db`
    pub fn sample_store_path() -> PathBuf {
        Self::data_dir().join("sample.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/chatwrapped/chatwrapped.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("chatwrapped.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.store.use_sample);
        assert!(config.store.path.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[store]
use_sample = false
path = "/tmp/chat.db"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.store.path.as_deref(), Some(std::path::Path::new("/tmp/chat.db")));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.store.resolve_path(), PathBuf::from("/tmp/chat.db"));
    }

    #[test]
    fn test_sample_switch_wins_over_path() {
        let toml = r#"
[store]
use_sample = true
path = "/tmp/chat.db"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.store.resolve_path(), Config::sample_store_path());
    }
}
