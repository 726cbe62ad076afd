//! Auto-post scheduler
//!
//! One tick: load settings, aggregate trending content, pick one video at
//! random and post it. The timer lives outside; callers just invoke
//! [`AutoPoster::run_tick`].

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::poster::Poster;
use crate::random::SharedRng;
use crate::sources::ContentAggregator;
use crate::store::SettingsStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Auto-posting is off or has no affiliate link
    Disabled,
    /// No source returned anything
    NoContent,
    Posted {
        video_url: String,
    },
    Failed {
        video_url: String,
        error: String,
    },
    /// A previous tick was still running; nothing was done
    Busy,
}

pub struct AutoPoster {
    settings: Arc<dyn SettingsStore>,
    aggregator: Arc<ContentAggregator>,
    poster: Arc<Poster>,
    rng: SharedRng,
    running: Mutex<()>,
}

impl AutoPoster {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        aggregator: Arc<ContentAggregator>,
        poster: Arc<Poster>,
        rng: SharedRng,
    ) -> Self {
        Self {
            settings,
            aggregator,
            poster,
            rng,
            running: Mutex::new(()),
        }
    }

    pub fn state(&self) -> SchedulerState {
        match self.running.try_lock() {
            Ok(_) => SchedulerState::Idle,
            Err(_) => SchedulerState::Running,
        }
    }

    /// Run one auto-post cycle
    ///
    /// Never retries within the cycle; a failed post waits for the next tick.
    pub async fn run_tick(&self) -> TickOutcome {
        let Ok(_running) = self.running.try_lock() else {
            warn!("Auto-post job still running, skipping this tick");
            return TickOutcome::Busy;
        };

        info!("Running auto-post job");
        let settings = self.settings.load().await;

        let template = match settings.affiliate_template() {
            Some(template) if settings.auto_post_enabled => template.to_string(),
            _ => {
                info!("Auto-posting is disabled or affiliate link not set");
                return TickOutcome::Disabled;
            }
        };

        let videos = self.aggregator.aggregate(&settings.effective_sources()).await;
        let Some(index) = self.rng.pick_index(videos.len()) else {
            warn!("No trending videos found for auto-posting");
            return TickOutcome::NoContent;
        };
        let video = &videos[index];
        info!(source = %video.source, url = %video.url, "Selected video for posting: {}", video.title);

        let result = self
            .poster
            .post_video(&video.url, Some(&template), &settings, None)
            .await;

        if result.success {
            info!("Auto-post successful");
            TickOutcome::Posted {
                video_url: video.url.clone(),
            }
        } else {
            let error = result.error.unwrap_or_else(|| "unknown error".to_string());
            error!("Auto-post failed: {}", error);
            TickOutcome::Failed {
                video_url: video.url.clone(),
                error,
            }
        }
    }
}
