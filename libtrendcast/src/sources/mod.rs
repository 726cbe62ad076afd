//! Content sources and aggregation
//!
//! A [`ContentSource`] produces trending videos. The [`ContentAggregator`]
//! fans out to every requested source at once and concatenates whatever comes
//! back. One source failing, timing out, or not existing never affects the
//! others.
//!
//! ```no_run
//! use std::time::Duration;
//! use libtrendcast::sources::ContentAggregator;
//!
//! # async fn example() {
//! let aggregator = ContentAggregator::with_builtin_sources(Duration::from_secs(30));
//! let videos = aggregator
//!     .aggregate(&["youtube".to_string(), "tiktok".to_string()])
//!     .await;
//! println!("{} candidate videos", videos.len());
//! # }
//! ```

use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::{Result, SourceFetchError, TrendcastError};
use crate::types::VideoContent;

pub mod catalog;

// Available outside tests so integration tests and demos can use it
pub mod mock;

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Lowercase identifier matched against `Settings::content_sources`
    fn name(&self) -> &str;

    /// Current trending videos, in the source's own ranking order
    async fn fetch_trending(&self) -> Result<Vec<VideoContent>>;
}

pub struct ContentAggregator {
    sources: Vec<Arc<dyn ContentSource>>,
    timeout: Duration,
}

impl ContentAggregator {
    /// Aggregator with no sources registered
    pub fn new(timeout: Duration) -> Self {
        Self {
            sources: Vec::new(),
            timeout,
        }
    }

    /// Aggregator with the built-in `youtube` and `tiktok` catalogs
    pub fn with_builtin_sources(timeout: Duration) -> Self {
        Self::new(timeout)
            .with_source(Arc::new(catalog::CatalogSource::youtube()))
            .with_source(Arc::new(catalog::CatalogSource::tiktok()))
    }

    pub fn with_source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.register(source);
        self
    }

    /// Add a source, replacing any registered under the same name
    pub fn register(&mut self, source: Arc<dyn ContentSource>) {
        self.sources.retain(|s| s.name() != source.name());
        self.sources.push(source);
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Fetch a single source by name, bounded by the timeout
    pub async fn fetch_source(
        &self,
        name: &str,
    ) -> std::result::Result<Vec<VideoContent>, SourceFetchError> {
        let source = self
            .sources
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| SourceFetchError::Unknown(name.to_string()))?;

        match tokio::time::timeout(self.timeout, source.fetch_trending()).await {
            Ok(Ok(videos)) => Ok(videos),
            Ok(Err(TrendcastError::Source(e))) => Err(e),
            Ok(Err(e)) => Err(SourceFetchError::Failed {
                source_name: name.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(SourceFetchError::Timeout {
                source_name: name.to_string(),
                after: self.timeout,
            }),
        }
    }

    /// Fetch every requested source concurrently
    ///
    /// The result keeps the order of `names`, then each source's own order.
    /// A repeated name is fetched once, at its first position. Failed sources
    /// are logged and left out; if all fail the result is empty.
    pub async fn aggregate(&self, names: &[String]) -> Vec<VideoContent> {
        info!(sources = ?names, "Finding trending videos");

        let mut unique: Vec<&String> = Vec::with_capacity(names.len());
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }

        let fetches = unique.iter().map(|name| self.fetch_source(name));
        let results = join_all(fetches).await;

        let mut videos = Vec::new();
        for (name, result) in unique.into_iter().zip(results) {
            match result {
                Ok(items) => {
                    debug!(source = %name, count = items.len(), "Fetched trending videos");
                    videos.extend(items);
                }
                Err(e) => error!(source = %name, "Error fetching trending videos: {}", e),
            }
        }

        videos
    }
}
