//! Service layer for Trendcast
//!
//! `TrendcastService` wires the stores, the ledger, the content aggregator
//! and the posting client together and hands out the two periodic jobs. The
//! binaries only talk to this facade.
//!
//! - [`scheduler::AutoPoster`]: one auto-post per tick
//! - [`simulator::EngagementSimulator`]: engagement growth per tick
//! - [`history`]: queries and statistics over the ledger
//!
//! # Example
//!
//! ```no_run
//! use libtrendcast::service::TrendcastService;
//!
//! # async fn example() -> libtrendcast::Result<()> {
//! let service = TrendcastService::new()?;
//!
//! let result = service.manual_post("https://youtube.com/watch?v=abc123", None).await;
//! println!("posted: {}", result.success);
//!
//! let stats = service.stats(5).await;
//! println!("{} posts so far", stats.total_posts);
//! # Ok(())
//! # }
//! ```

pub mod history;
pub mod scheduler;
pub mod simulator;

use std::sync::Arc;
use tracing::info;

use self::history::{HistoryQuery, HistoryStats};
use self::scheduler::{AutoPoster, TickOutcome};
use self::simulator::{EngagementSimulator, SimulationOutcome};
use crate::config::Config;
use crate::error::{Result, StorageError};
use crate::ledger::HistoryLedger;
use crate::platforms::dry_run::DryRunClient;
use crate::platforms::PostingClient;
use crate::poster::Poster;
use crate::random::SharedRng;
use crate::sources::ContentAggregator;
use crate::store::{HistoryStore, JsonHistoryStore, JsonSettingsStore, SettingsStore};
use crate::types::{Post, PostHistory, PostResult, Settings, VideoContent};

/// Main service facade
///
/// Every component shares the same settings store, ledger and random number
/// generator, so the scheduler, the simulator and manual posts all see one
/// consistent history.
pub struct TrendcastService {
    config: Config,
    settings: Arc<dyn SettingsStore>,
    ledger: Arc<HistoryLedger>,
    aggregator: Arc<ContentAggregator>,
    poster: Arc<Poster>,
    scheduler: AutoPoster,
    simulator: EngagementSimulator,
}

impl TrendcastService {
    /// Create a service from the default configuration file
    ///
    /// Posts go through the [`DryRunClient`] and content comes from the
    /// built-in catalogs.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    /// Create a service with JSON stores at the configured paths
    pub fn from_config(config: Config) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Start building a service whose parts can be swapped out
    pub fn builder(config: Config) -> TrendcastServiceBuilder {
        TrendcastServiceBuilder {
            config,
            client: None,
            aggregator: None,
            settings_store: None,
            history_store: None,
            rng: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current settings; defaults when the file is missing or unreadable
    pub async fn settings(&self) -> Settings {
        self.settings.load().await
    }

    /// Validate and persist settings
    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        self.settings.save(settings).await?;
        info!(
            auto_post_enabled = settings.auto_post_enabled,
            analytics_enabled = settings.analytics_enabled,
            "Settings updated"
        );
        Ok(())
    }

    /// Trending videos from the sources enabled in the settings
    pub async fn trending(&self) -> Vec<VideoContent> {
        let settings = self.settings.load().await;
        self.aggregator
            .aggregate(&settings.effective_sources())
            .await
    }

    /// Post a video right away, using the configured affiliate link
    pub async fn manual_post(&self, video_url: &str, custom_text: Option<&str>) -> PostResult {
        let settings = self.settings.load().await;
        let template = settings.affiliate_template().map(str::to_string);
        self.poster
            .post_video(video_url, template.as_deref(), &settings, custom_text)
            .await
    }

    pub async fn history(&self) -> PostHistory {
        self.ledger.snapshot().await
    }

    /// Posts matching `query`, newest first
    pub async fn query_history(&self, query: &HistoryQuery) -> Vec<Post> {
        let history = self.ledger.snapshot().await;
        query.apply(&history).into_iter().cloned().collect()
    }

    pub async fn stats(&self, top_n: usize) -> HistoryStats {
        HistoryStats::summarize(&self.ledger.snapshot().await, top_n)
    }

    pub fn scheduler(&self) -> &AutoPoster {
        &self.scheduler
    }

    pub fn simulator(&self) -> &EngagementSimulator {
        &self.simulator
    }

    pub async fn run_scheduler_tick(&self) -> TickOutcome {
        self.scheduler.run_tick().await
    }

    pub async fn run_simulator_tick(&self) -> SimulationOutcome {
        self.simulator.run_tick().await
    }

    /// Create the directories holding the settings and history files
    pub async fn ensure_storage(&self) -> Result<()> {
        for path in [self.config.settings_path(), self.config.history_path()] {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|source| StorageError::Io {
                        path: dir.display().to_string(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

/// Builder for [`TrendcastService`]
///
/// Anything not set falls back to what [`TrendcastService::from_config`]
/// uses.
pub struct TrendcastServiceBuilder {
    config: Config,
    client: Option<Arc<dyn PostingClient>>,
    aggregator: Option<ContentAggregator>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    history_store: Option<Arc<dyn HistoryStore>>,
    rng: Option<SharedRng>,
}

impl TrendcastServiceBuilder {
    pub fn client(mut self, client: Arc<dyn PostingClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn aggregator(mut self, aggregator: ContentAggregator) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    pub fn history_store(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.history_store = Some(store);
        self
    }

    pub fn rng(mut self, rng: SharedRng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> Result<TrendcastService> {
        let config = self.config;
        config.validate()?;
        let timeout = config.request_timeout()?;
        let window = config.engagement_window()?;

        let settings = self
            .settings_store
            .unwrap_or_else(|| Arc::new(JsonSettingsStore::new(config.settings_path())));
        let history = self
            .history_store
            .unwrap_or_else(|| Arc::new(JsonHistoryStore::new(config.history_path())));
        let client = self
            .client
            .unwrap_or_else(|| Arc::new(DryRunClient::new()));
        let aggregator = Arc::new(
            self.aggregator
                .unwrap_or_else(|| ContentAggregator::with_builtin_sources(timeout)),
        );
        let rng = self.rng.unwrap_or_default();

        let ledger = Arc::new(HistoryLedger::new(history));
        let poster = Arc::new(Poster::new(
            client,
            Arc::clone(&ledger),
            rng.clone(),
            timeout,
        ));
        let scheduler = AutoPoster::new(
            Arc::clone(&settings),
            Arc::clone(&aggregator),
            Arc::clone(&poster),
            rng.clone(),
        );
        let simulator =
            EngagementSimulator::new(Arc::clone(&settings), Arc::clone(&ledger), rng, window);

        Ok(TrendcastService {
            config,
            settings,
            ledger,
            aggregator,
            poster,
            scheduler,
            simulator,
        })
    }
}
