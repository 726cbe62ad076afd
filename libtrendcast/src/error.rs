//! Error types for Trendcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrendcastError>;

#[derive(Error, Debug)]
pub enum TrendcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Source error: {0}")]
    Source(#[from] SourceFetchError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TrendcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TrendcastError::InvalidInput(_) => 3,
            TrendcastError::Platform(PlatformError::Authentication(_)) => 2,
            TrendcastError::Platform(_) => 1,
            TrendcastError::Config(_) => 1,
            TrendcastError::Storage(_) => 1,
            TrendcastError::Source(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode or decode {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[derive(Error, Debug, Clone)]
pub enum SourceFetchError {
    #[error("Unknown content source: {0}")]
    Unknown(String),

    #[error("Fetching {source_name} failed: {reason}")]
    Failed { source_name: String, reason: String },

    #[error("Fetching {source_name} timed out after {after:?}")]
    Timeout {
        source_name: String,
        after: std::time::Duration,
    },
}
