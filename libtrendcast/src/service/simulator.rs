//! Engagement simulation
//!
//! Real metrics are not fetched. Each tick bumps the counters of every post
//! still inside the engagement window by small random amounts; older posts
//! keep whatever they had.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::ledger::HistoryLedger;
use crate::random::SharedRng;
use crate::store::SettingsStore;
use crate::types::{Engagement, Post};

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Exclusive upper bounds of the per-tick increments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthBounds {
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub clicks: u64,
}

impl Default for GrowthBounds {
    fn default() -> Self {
        Self {
            likes: 10,
            retweets: 5,
            replies: 3,
            clicks: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationOutcome {
    /// Analytics are turned off in the settings
    Disabled,
    Updated { posts: usize },
    Failed { error: String },
    Busy,
}

pub struct EngagementSimulator {
    settings: Arc<dyn SettingsStore>,
    ledger: Arc<HistoryLedger>,
    rng: SharedRng,
    window: Duration,
    bounds: GrowthBounds,
    running: Mutex<()>,
}

impl EngagementSimulator {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        ledger: Arc<HistoryLedger>,
        rng: SharedRng,
        window: Duration,
    ) -> Self {
        Self {
            settings,
            ledger,
            rng,
            window,
            bounds: GrowthBounds::default(),
            running: Mutex::new(()),
        }
    }

    pub fn with_bounds(mut self, bounds: GrowthBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Posts stamped in the future count as inside the window.
    pub fn in_window(&self, post: &Post, now: DateTime<Utc>) -> bool {
        match post.age(now).to_std() {
            Ok(age) => age <= self.window,
            Err(_) => true,
        }
    }

    pub async fn run_tick(&self) -> SimulationOutcome {
        self.run_tick_at(Utc::now()).await
    }

    /// Run one simulation pass as if the current time were `now`
    pub async fn run_tick_at(&self, now: DateTime<Utc>) -> SimulationOutcome {
        let Ok(_running) = self.running.try_lock() else {
            warn!("Engagement update still running, skipping this tick");
            return SimulationOutcome::Busy;
        };

        info!("Updating engagement metrics");
        let settings = self.settings.load().await;
        if !settings.analytics_enabled {
            info!("Analytics collection is disabled");
            return SimulationOutcome::Disabled;
        }

        let rng = &self.rng;
        let bounds = self.bounds;
        let result = self
            .ledger
            .update_engagement(|post| {
                if !self.in_window(post, now) {
                    return None;
                }
                let growth = Engagement {
                    likes: rng.below(bounds.likes),
                    retweets: rng.below(bounds.retweets),
                    replies: rng.below(bounds.replies),
                    clicks: rng.below(bounds.clicks),
                };
                Some(post.engagement.saturating_add(growth))
            })
            .await;

        match result {
            Ok(posts) => {
                info!(posts, "Engagement metrics updated");
                SimulationOutcome::Updated { posts }
            }
            Err(e) => {
                error!("Error updating engagement metrics: {}", e);
                SimulationOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::NewPost;
    use crate::store::{JsonHistoryStore, JsonSettingsStore};
    use crate::types::Settings;
    use chrono::Duration as ChronoDuration;
    use tempfile::TempDir;

    struct Fixture {
        simulator: EngagementSimulator,
        ledger: Arc<HistoryLedger>,
        temp_dir: TempDir,
    }

    async fn fixture(analytics_enabled: bool) -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let settings = JsonSettingsStore::new(temp_dir.path().join("settings.json"));
        settings
            .save(&Settings {
                analytics_enabled,
                ..Default::default()
            })
            .await
            .unwrap();
        let history = JsonHistoryStore::new(temp_dir.path().join("posts-history.json"));
        let ledger = Arc::new(HistoryLedger::new(Arc::new(history)));
        let simulator = EngagementSimulator::new(
            Arc::new(settings),
            Arc::clone(&ledger),
            SharedRng::seeded(7),
            DEFAULT_WINDOW,
        );
        Fixture {
            simulator,
            ledger,
            temp_dir,
        }
    }

    fn new_post(url: &str) -> NewPost {
        NewPost {
            content: format!("Check out this trending video: {}", url),
            video_url: url.to_string(),
            affiliate_link: None,
        }
    }

    #[tokio::test]
    async fn test_disabled_leaves_history_alone() {
        let f = fixture(false).await;
        let now = Utc::now();
        f.ledger.append_at(new_post("https://v/1"), now).await.unwrap();
        let before = f.ledger.snapshot().await;

        assert_eq!(f.simulator.run_tick_at(now).await, SimulationOutcome::Disabled);
        assert_eq!(f.ledger.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_old_posts_are_frozen() {
        let f = fixture(true).await;
        let now = Utc::now();
        f.ledger
            .append_at(new_post("https://v/old"), now - ChronoDuration::days(8))
            .await
            .unwrap();

        let outcome = f.simulator.run_tick_at(now).await;

        assert_eq!(outcome, SimulationOutcome::Updated { posts: 0 });
        let history = f.ledger.snapshot().await;
        assert_eq!(history.posts[0].engagement, Engagement::default());
    }

    #[tokio::test]
    async fn test_recent_posts_grow_within_bounds() {
        let f = fixture(true).await;
        let now = Utc::now();
        f.ledger
            .append_at(new_post("https://v/new"), now - ChronoDuration::hours(1))
            .await
            .unwrap();

        let mut previous = Engagement::default();
        for _ in 0..20 {
            assert_eq!(
                f.simulator.run_tick_at(now).await,
                SimulationOutcome::Updated { posts: 1 }
            );
            let current = f.ledger.snapshot().await.posts[0].engagement;
            assert!(current.likes >= previous.likes && current.likes - previous.likes < 10);
            assert!(current.retweets >= previous.retweets && current.retweets - previous.retweets < 5);
            assert!(current.replies >= previous.replies && current.replies - previous.replies < 3);
            assert!(current.clicks >= previous.clicks && current.clicks - previous.clicks < 15);
            previous = current;
        }
        assert!(previous.total() > 0);
    }

    #[tokio::test]
    async fn test_window_boundary_and_future_posts() {
        let f = fixture(true).await;
        let now = Utc::now();
        f.ledger
            .append_at(new_post("https://v/edge"), now - ChronoDuration::days(7))
            .await
            .unwrap();
        f.ledger
            .append_at(new_post("https://v/future"), now + ChronoDuration::minutes(5))
            .await
            .unwrap();
        f.ledger
            .append_at(new_post("https://v/stale"), now - ChronoDuration::days(30))
            .await
            .unwrap();

        let history = f.ledger.snapshot().await;
        assert!(f.simulator.in_window(&history.posts[0], now));
        assert!(f.simulator.in_window(&history.posts[1], now));
        assert!(!f.simulator.in_window(&history.posts[2], now));

        assert_eq!(
            f.simulator.run_tick_at(now).await,
            SimulationOutcome::Updated { posts: 2 }
        );
    }

    #[tokio::test]
    async fn test_zero_bounds_keep_counters() {
        let f = fixture(true).await;
        let simulator = f.simulator.with_bounds(GrowthBounds {
            likes: 0,
            retweets: 0,
            replies: 0,
            clicks: 0,
        });
        let now = Utc::now();
        f.ledger.append_at(new_post("https://v/1"), now).await.unwrap();

        assert_eq!(
            simulator.run_tick_at(now).await,
            SimulationOutcome::Updated { posts: 1 }
        );
        assert_eq!(f.ledger.snapshot().await.posts[0].engagement.total(), 0);
    }

    #[tokio::test]
    async fn test_counters_saturate_at_max() {
        let f = fixture(true).await;
        let now = Utc::now();
        f.ledger.append_at(new_post("https://v/1"), now).await.unwrap();
        let near_max = Engagement {
            likes: u64::MAX - 1,
            retweets: u64::MAX - 1,
            replies: u64::MAX - 1,
            clicks: u64::MAX - 1,
        };
        f.ledger.update_engagement(|_| Some(near_max)).await.unwrap();

        for _ in 0..5 {
            assert_eq!(
                f.simulator.run_tick_at(now).await,
                SimulationOutcome::Updated { posts: 1 }
            );
        }

        let engagement = f.ledger.snapshot().await.posts[0].engagement;
        for counter in [
            engagement.likes,
            engagement.retweets,
            engagement.replies,
            engagement.clicks,
        ] {
            assert!(counter >= u64::MAX - 1);
        }
        assert_eq!(engagement.total(), u64::MAX);
    }

    #[tokio::test]
    async fn test_corrupt_history_reports_failure() {
        let f = fixture(true).await;
        let path = f.temp_dir.path().join("posts-history.json");
        std::fs::write(&path, "{ broken").unwrap();

        let outcome = f.simulator.run_tick_at(Utc::now()).await;

        assert!(matches!(outcome, SimulationOutcome::Failed { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
    }
}
