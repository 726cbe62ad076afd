//! Posting orchestration
//!
//! [`Poster::post_video`] runs one complete post: check settings, compose the
//! text, log in, send, log out and record the result in the ledger. Nothing
//! escapes as an error; every failure ends up in the returned [`PostResult`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::compose::{compose_with_link, default_base_text, resolve_affiliate_link};
use crate::error::{PlatformError, Result};
use crate::ledger::{HistoryLedger, NewPost};
use crate::platforms::PostingClient;
use crate::random::SharedRng;
use crate::types::{PostResult, Settings};

pub const CREDENTIALS_MISSING: &str = "Twitter credentials not configured.";
pub const VIDEO_URL_MISSING: &str = "Video URL is required.";

pub struct Poster {
    client: Arc<dyn PostingClient>,
    ledger: Arc<HistoryLedger>,
    rng: SharedRng,
    timeout: Duration,
}

impl Poster {
    /// `timeout` bounds each individual client call
    pub fn new(
        client: Arc<dyn PostingClient>,
        ledger: Arc<HistoryLedger>,
        rng: SharedRng,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            ledger,
            rng,
            timeout,
        }
    }

    /// Post a video link and record it in the history
    ///
    /// The affiliate link is resolved once and the same value goes into the
    /// post text and the ledger entry. Logout runs whenever login succeeded,
    /// and its failure never changes the result.
    pub async fn post_video(
        &self,
        video_url: &str,
        affiliate_link_template: Option<&str>,
        settings: &Settings,
        custom_text: Option<&str>,
    ) -> PostResult {
        if video_url.trim().is_empty() {
            return PostResult::failed(VIDEO_URL_MISSING);
        }

        if !settings.credentials.is_complete() {
            error!("{}", CREDENTIALS_MISSING);
            return PostResult::failed(CREDENTIALS_MISSING);
        }

        let affiliate_link = resolve_affiliate_link(affiliate_link_template, video_url);
        let base = custom_text
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_base_text(video_url));
        let text = self.rng.with(|rng| {
            compose_with_link(&base, &settings.hashtag_groups, affiliate_link.as_deref(), rng)
        });

        let session = match self.bounded(self.client.login(&settings.credentials)).await {
            Ok(session) => session,
            Err(e) => {
                error!(client = self.client.name(), "Failed to log in: {}", e);
                return PostResult::failed(e.to_string());
            }
        };
        info!(client = self.client.name(), "Logged in as {}", session.username);

        let sent = self.bounded(self.client.send(&session, &text)).await;

        if let Err(e) = self.bounded(self.client.logout(&session)).await {
            warn!(client = self.client.name(), "Logout failed: {}", e);
        }

        if let Err(e) = sent {
            error!(client = self.client.name(), "Failed to post: {}", e);
            return PostResult::failed(e.to_string());
        }
        info!(client = self.client.name(), "Posted: {:?}", text);

        let new_post = NewPost {
            content: text,
            video_url: video_url.to_string(),
            affiliate_link,
        };
        match self.ledger.append(new_post).await {
            Ok(_) => PostResult::ok(),
            Err(e) => {
                error!("Post was sent but could not be recorded: {}", e);
                PostResult::failed(format!("Post was sent but could not be recorded: {}", e))
            }
        }
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| PlatformError::Timeout(self.timeout))?
    }
}
