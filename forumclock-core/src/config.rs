//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/forumclock/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/forumclock/` (~/.config/forumclock/)
//! - State/Logs: `$XDG_STATE_HOME/forumclock/` (~/.local/state/forumclock/)

use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::rate_limit::DEFAULT_MESSAGE;
use serde::Deserialize;
use std::path::{Path, PathBuf};

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

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Date display settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Action throttling
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Date display settings
#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct DisplayConfig {
    /// Locale for calendar dates (`uk` or `en`)
    #[serde(default)]
    pub locale: Locale,
}

/// Rate limiter settings
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    /// Minimum milliseconds between accepted actions
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Rejection message; `{time}` is replaced with the seconds left
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            message: default_message(),
        }
    }
}

impl RateLimitConfig {
    /// Preset used for comment submission.
    pub fn comments() -> Self {
        Self {
            interval_ms: 3000,
            message: "Please wait {time} seconds before submitting another comment".to_string(),
        }
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(Error::Config(
                "rate_limit.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_interval_ms() -> u64 {
    3000
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
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
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.rate_limit.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/forumclock/config.toml` (~/.config/forumclock/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("forumclock").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/forumclock/` (~/.local/state/forumclock/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("forumclock")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("forumclock.log")
    }
}
