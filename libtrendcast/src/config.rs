//! Configuration management for Trendcast
//!
//! The daemon configuration lives in TOML and covers where things are stored
//! and how often the periodic jobs run. Operator settings (credentials,
//! affiliate link, hashtags) are separate and live in the settings store.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "TRENDCAST_CONFIG";

/// Environment override for the auto-post interval, in minutes
pub const AUTO_POST_INTERVAL_ENV: &str = "TRENDCAST_AUTO_POST_INTERVAL_MINUTES";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub settings_path: String,
    pub history_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: "~/.local/share/trendcast/settings.json".to_string(),
            history_path: "~/.local/share/trendcast/posts-history.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Time between auto-post ticks (humantime, e.g. "60m")
    pub interval: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: "60m".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Time between engagement simulation ticks
    pub interval: String,
    /// Posts older than this keep their engagement frozen
    pub window: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval: "3h".to_string(),
            window: "7d".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Upper bound for any single source fetch or client call
    pub request_timeout: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout: "30s".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error: defaults are used and environment
    /// overrides still apply.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `TRENDCAST_AUTO_POST_INTERVAL_MINUTES` if set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(minutes) = std::env::var(AUTO_POST_INTERVAL_ENV) {
            let minutes: u64 = minutes.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: AUTO_POST_INTERVAL_ENV.to_string(),
                reason: format!("'{}' is not a whole number of minutes", minutes),
            })?;
            if minutes == 0 {
                return Err(ConfigError::InvalidValue {
                    field: AUTO_POST_INTERVAL_ENV.to_string(),
                    reason: "interval must be at least one minute".to_string(),
                }
                .into());
            }
            self.scheduler.interval = format!("{}m", minutes);
        }
        Ok(())
    }

    /// Check that every duration parses and is non-zero
    pub fn validate(&self) -> Result<()> {
        self.scheduler_interval()?;
        self.simulator_interval()?;
        self.engagement_window()?;
        self.request_timeout()?;
        Ok(())
    }

    pub fn scheduler_interval(&self) -> Result<Duration> {
        parse_duration("scheduler.interval", &self.scheduler.interval)
    }

    pub fn simulator_interval(&self) -> Result<Duration> {
        parse_duration("simulator.interval", &self.simulator.interval)
    }

    pub fn engagement_window(&self) -> Result<Duration> {
        parse_duration("simulator.window", &self.simulator.window)
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration("network.request_timeout", &self.network.request_timeout)
    }

    pub fn settings_path(&self) -> PathBuf {
        expand_path(&self.storage.settings_path)
    }

    pub fn history_path(&self) -> PathBuf {
        expand_path(&self.storage.history_path)
    }
}

fn parse_duration(field: &str, value: &str) -> Result<Duration> {
    let duration = humantime::parse_duration(value).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: format!("'{}': {}", value, e),
    })?;

    if duration.is_zero() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "duration must be greater than zero".to_string(),
        }
        .into());
    }

    Ok(duration)
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(expand_path(&path));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("trendcast").join("config.toml"))
}

/// Resolve the data directory path following XDG Base Directory spec
pub fn resolve_data_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("trendcast"))
}
