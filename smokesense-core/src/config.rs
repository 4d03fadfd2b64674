//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/smokesense/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/smokesense/` (~/.config/smokesense/)
//! - Data: `$XDG_DATA_HOME/smokesense/` (~/.local/share/smokesense/)
//! - State/Logs: `$XDG_STATE_HOME/smokesense/` (~/.local/state/smokesense/)

use crate::analytics::projection::DEFAULT_MINUTES_PER_UNIT;
use crate::error::{Error, Result};
use crate::types::DEFAULT_UNIT_PRICE;
use serde::Deserialize;
use std::path::PathBuf;

const APP_DIR: &str = "smokesense";

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
    /// Analytics defaults
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Local user selection
    #[serde(default)]
    pub user: UserConfig,
}

/// Defaults used by the analytics views
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Minutes spent on one cigarette, for time projections
    #[serde(default = "default_minutes_per_unit")]
    pub minutes_per_unit: f64,

    /// Price of one cigarette when the profile has none
    #[serde(default = "default_unit_price")]
    pub default_unit_price: f64,

    /// Days covered by the stats view
    #[serde(default = "default_stats_window_days")]
    pub stats_window_days: u32,

    /// Symbol printed in front of money amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            minutes_per_unit: default_minutes_per_unit(),
            default_unit_price: default_unit_price(),
            stats_window_days: default_stats_window_days(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl AnalyticsConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !self.minutes_per_unit.is_finite() || self.minutes_per_unit < 0.0 {
            return Err(Error::Config(
                "analytics.minutes_per_unit must be a non-negative number".to_string(),
            ));
        }
        if !self.default_unit_price.is_finite() || self.default_unit_price <= 0.0 {
            return Err(Error::Config(
                "analytics.default_unit_price must be positive".to_string(),
            ));
        }
        if self.stats_window_days == 0 || self.stats_window_days > 366 {
            return Err(Error::Config(
                "analytics.stats_window_days must be between 1 and 366".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_minutes_per_unit() -> f64 {
    DEFAULT_MINUTES_PER_UNIT
}

fn default_unit_price() -> f64 {
    DEFAULT_UNIT_PRICE
}

fn default_stats_window_days() -> u32 {
    30
}

fn default_currency_symbol() -> String {
    "₹".to_string()
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

/// Which local user the CLI acts for
#[derive(Debug, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_id")]
    pub id: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: default_user_id(),
        }
    }
}

fn default_user_id() -> String {
    "local".to_string()
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

        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.analytics.validate()?;
        if self.user.id.trim().is_empty() {
            return Err(Error::Config("user.id must not be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/smokesense/config.toml` (~/.config/smokesense/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join(APP_DIR).join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/smokesense/` (~/.local/share/smokesense/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join(APP_DIR)
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/smokesense/` (~/.local/state/smokesense/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join(APP_DIR)
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/smokesense/data.db` (~/.local/share/smokesense/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }
}
