//! Persistence for settings and post history
//!
//! Both stores are whole-document load/save. The JSON implementations write to
//! a sibling temporary file and rename it into place, so a crash mid-save
//! leaves the previous document intact.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, StorageError};
use crate::types::{PostHistory, Settings};

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the settings, failing on I/O or decode errors
    async fn try_load(&self) -> Result<Settings>;

    async fn save(&self, settings: &Settings) -> Result<()>;

    /// Read the settings, falling back to defaults on any failure
    async fn load(&self) -> Settings {
        match self.try_load().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Could not load settings, starting with empty settings: {}", e);
                Settings::default()
            }
        }
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn try_load(&self) -> Result<PostHistory>;

    async fn save(&self, history: &PostHistory) -> Result<()>;

    /// Read the history, falling back to an empty one on any failure
    async fn load(&self) -> PostHistory {
        match self.try_load().await {
            Ok(history) => history,
            Err(e) => {
                warn!("Could not load post history, starting with empty history: {}", e);
                PostHistory::default()
            }
        }
    }
}

/// Settings kept in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn try_load(&self) -> Result<Settings> {
        Ok(read_json(&self.path).await?.unwrap_or_default())
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        write_json(&self.path, settings).await?;
        debug!("Settings saved to {}", self.path.display());
        Ok(())
    }
}

/// Post history kept in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn try_load(&self) -> Result<PostHistory> {
        Ok(read_json(&self.path).await?.unwrap_or_default())
    }

    async fn save(&self, history: &PostHistory) -> Result<()> {
        write_json(&self.path, history).await?;
        debug!(
            posts = history.len(),
            "Post history saved to {}",
            self.path.display()
        );
        Ok(())
    }
}

/// `Ok(None)` when the file does not exist yet
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match tokio::fs::read_to_string(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.display().to_string(),
                source,
            }
            .into())
        }
    };

    let value = serde_json::from_str(&data).map_err(|source| StorageError::Serialization {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(value))
}

async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> Result<()> {
    let io_error = |source| StorageError::Io {
        path: path.display().to_string(),
        source,
    };

    let data = serde_json::to_string_pretty(value).map_err(|source| {
        StorageError::Serialization {
            path: path.display().to_string(),
            source,
        }
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, data).await.map_err(io_error)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(io_error)?;
    Ok(())
}
