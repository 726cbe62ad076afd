//! Trendcast - trending video auto-poster
//!
//! Finds trending videos, composes posts with rotating hashtags and an
//! affiliate link, publishes them through a posting client and keeps a ledger
//! of what was posted along with simulated engagement.

pub mod compose;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod platforms;
pub mod poster;
pub mod random;
pub mod service;
pub mod sources;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TrendcastError};
pub use ledger::HistoryLedger;
pub use random::SharedRng;
pub use service::TrendcastService;
pub use types::{Credentials, Engagement, Post, PostHistory, PostResult, Settings, VideoContent};
