//! Core types for Trendcast
//!
//! Field names serialize in camelCase so `settings.json` and
//! `posts-history.json` stay readable by the web dashboard.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Source used when the operator has not enabled any.
pub const DEFAULT_CONTENT_SOURCE: &str = "youtube";

const MASK: &str = "********";

/// Platform login bundle. Any field may be missing.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "twitterUsername", default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "twitterPassword", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "twitterEmail", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(rename = "apiSecretKey", default, skip_serializing_if = "Option::is_none")]
    pub api_secret_key: Option<String>,
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "accessTokenSecret", default, skip_serializing_if = "Option::is_none")]
    pub access_token_secret: Option<String>,
}

impl Credentials {
    /// Username and password are both set and non-empty
    pub fn is_complete(&self) -> bool {
        non_empty(&self.username).is_some() && non_empty(&self.password).is_some()
    }

    fn masked(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| MASK.to_string());
        Self {
            password: mask(&self.password),
            api_secret_key: mask(&self.api_secret_key),
            access_token_secret: mask(&self.access_token_secret),
            ..self.clone()
        }
    }
}

// Secrets never end up in logs through `{:?}`.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked = self.masked();
        f.debug_struct("Credentials")
            .field("username", &masked.username)
            .field("password", &masked.password)
            .field("email", &masked.email)
            .field("api_key", &masked.api_key)
            .field("api_secret_key", &masked.api_secret_key)
            .field("access_token", &masked.access_token)
            .field("access_token_secret", &masked.access_token_secret)
            .finish()
    }
}

/// Operator configuration, loaded and saved as a whole
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(flatten)]
    pub credentials: Credentials,
    /// Affiliate link template containing [`crate::compose::VIDEO_URL_PLACEHOLDER`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
    #[serde(default)]
    pub auto_post_enabled: bool,
    #[serde(default)]
    pub content_sources: Vec<String>,
    /// Minutes between auto-posts as chosen in the dashboard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_frequency: Option<u32>,
    #[serde(default)]
    pub hashtag_groups: Vec<String>,
    #[serde(default)]
    pub target_audience: Vec<String>,
    #[serde(default)]
    pub analytics_enabled: bool,
}

impl Settings {
    /// The affiliate link template, if set to something non-empty
    pub fn affiliate_template(&self) -> Option<&str> {
        non_empty(&self.affiliate_link)
    }

    /// Enabled sources in first-seen order without repeats, falling back to
    /// the built-in default
    pub fn effective_sources(&self) -> Vec<String> {
        if self.content_sources.is_empty() {
            return vec![DEFAULT_CONTENT_SOURCE.to_string()];
        }

        let mut sources: Vec<String> = Vec::with_capacity(self.content_sources.len());
        for name in &self.content_sources {
            if !sources.contains(name) {
                sources.push(name.clone());
            }
        }
        sources
    }

    /// Auto-posting needs credentials and an affiliate link.
    pub fn validate(&self) -> Result<()> {
        if !self.auto_post_enabled {
            return Ok(());
        }

        if !self.credentials.is_complete() {
            return Err(ConfigError::InvalidValue {
                field: "autoPostEnabled".to_string(),
                reason: "Twitter credentials are required for auto-posting.".to_string(),
            }
            .into());
        }

        if self.affiliate_template().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "autoPostEnabled".to_string(),
                reason: "Affiliate link is required for auto-posting.".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Copy safe to show to the operator, with secrets replaced by asterisks
    pub fn masked(&self) -> Self {
        Self {
            credentials: self.credentials.masked(),
            ..self.clone()
        }
    }
}

/// A candidate video returned by a content source. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VideoContent {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending: Option<bool>,
}

impl VideoContent {
    pub fn new(id: &str, title: &str, url: &str, source: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            source: source.to_string(),
            thumbnail: None,
            description: None,
            views: None,
            likes: None,
            trending: None,
        }
    }
}

/// Simulated engagement counters of a post
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Engagement {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub retweets: u64,
    #[serde(default)]
    pub replies: u64,
    #[serde(default)]
    pub clicks: u64,
}

impl Engagement {
    pub fn total(&self) -> u64 {
        self.likes
            .saturating_add(self.retweets)
            .saturating_add(self.replies)
            .saturating_add(self.clicks)
    }

    /// Field-wise sum, clamped at `u64::MAX`
    pub fn saturating_add(&self, other: Engagement) -> Engagement {
        Engagement {
            likes: self.likes.saturating_add(other.likes),
            retweets: self.retweets.saturating_add(other.retweets),
            replies: self.replies.saturating_add(other.replies),
            clicks: self.clicks.saturating_add(other.clicks),
        }
    }
}

/// A post recorded in the ledger. Only `engagement` changes after insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub content: String,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub engagement: Engagement,
}

impl Post {
    /// Time elapsed since the post was recorded
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }
}

/// Everything posted so far, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostHistory {
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl PostHistory {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Outcome of a single post attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PostResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
