//! Logging setup shared by the Trendcast binaries
//!
//! The library itself only emits `tracing` events; which subscriber receives
//! them is up to the binary. Everything is written to stderr so stdout stays
//! free for command output.
//!
//! ```no_run
//! use libtrendcast::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::from_env(false).with_format(LogFormat::Json).init();
//! ```

use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Selects the output format (`text`, `json`, `pretty`)
pub const LOG_FORMAT_ENV: &str = "TRENDCAST_LOG_FORMAT";

/// Default level when `RUST_LOG` is not set
pub const LOG_LEVEL_ENV: &str = "TRENDCAST_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain single-line records
    Text,
    /// One JSON object per line, for log shippers
    Json,
    /// Multi-line, colored output for development
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                other
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl LoggingConfig {
    /// Read format and level from the environment
    ///
    /// `verbose` forces the default level to `debug`; `RUST_LOG` still wins.
    pub fn from_env(verbose: bool) -> Self {
        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LogFormat::Text);

        let level = if verbose {
            "debug".to_string()
        } else {
            std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string())
        };

        Self { format, level }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }

    /// Install the global subscriber
    ///
    /// Calling this twice is harmless; the second call is ignored.
    pub fn init(&self) {
        let filter = self.filter();

        let result = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .flatten_event(true)
                .with_current_span(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init(),
        };

        if result.is_err() {
            tracing::debug!("Logging already initialized");
        }
    }
}
