//! Configurable content source for tests
//!
//! Can return a fixed list, fail with a chosen message, or stall to exercise
//! the aggregator's timeout, and counts how often it was queried.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::ContentSource;
use crate::error::{Result, SourceFetchError};
use crate::types::VideoContent;

#[derive(Debug, Clone)]
pub struct MockSourceConfig {
    pub name: String,
    pub videos: Vec<VideoContent>,
    /// When set, every fetch fails with this message
    pub error: Option<String>,
    pub delay: Duration,
    pub fetch_count: Arc<AtomicUsize>,
}

impl Default for MockSourceConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            videos: Vec::new(),
            error: None,
            delay: Duration::ZERO,
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockSource {
    config: MockSourceConfig,
}

impl MockSource {
    pub fn new(config: MockSourceConfig) -> Self {
        Self { config }
    }

    pub fn success(name: &str, videos: Vec<VideoContent>) -> Self {
        Self::new(MockSourceConfig {
            name: name.to_string(),
            videos,
            ..Default::default()
        })
    }

    pub fn failure(name: &str, error: &str) -> Self {
        Self::new(MockSourceConfig {
            name: name.to_string(),
            error: Some(error.to_string()),
            ..Default::default()
        })
    }

    pub fn with_delay(name: &str, videos: Vec<VideoContent>, delay: Duration) -> Self {
        Self::new(MockSourceConfig {
            name: name.to_string(),
            videos,
            delay,
            ..Default::default()
        })
    }

    /// Shared counter; stays valid after the source is moved into an aggregator
    pub fn fetch_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.config.fetch_count)
    }

    pub fn fetch_count(&self) -> usize {
        self.config.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for MockSource {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch_trending(&self) -> Result<Vec<VideoContent>> {
        self.config.fetch_count.fetch_add(1, Ordering::SeqCst);

        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }

        match &self.config.error {
            Some(reason) => Err(SourceFetchError::Failed {
                source_name: self.config.name.clone(),
                reason: reason.clone(),
            }
            .into()),
            None => Ok(self.config.videos.clone()),
        }
    }
}
