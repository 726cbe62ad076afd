//! Append-only post ledger
//!
//! Every mutation is a full load-modify-save under one async lock, so the
//! scheduler's appends and the simulator's engagement updates cannot lose each
//! other's writes. Mutations read with [`HistoryStore::try_load`]: a history
//! file that fails to decode is reported instead of being overwritten with an
//! empty one.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::Result;
use crate::store::HistoryStore;
use crate::types::{Engagement, Post, PostHistory};

/// Fields supplied by the poster; id, timestamp and engagement are assigned
/// by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: String,
    pub video_url: String,
    pub affiliate_link: Option<String>,
}

pub struct HistoryLedger {
    store: Arc<dyn HistoryStore>,
    write_lock: Mutex<()>,
}

impl HistoryLedger {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Current history; empty if it cannot be read
    pub async fn snapshot(&self) -> PostHistory {
        let _guard = self.write_lock.lock().await;
        self.store.load().await
    }

    pub async fn append(&self, new_post: NewPost) -> Result<Post> {
        self.append_at(new_post, Utc::now()).await
    }

    /// Append a post stamped with `now`
    pub async fn append_at(&self, new_post: NewPost, now: DateTime<Utc>) -> Result<Post> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.store.try_load().await?;

        let post = Post {
            id: next_post_id(&history, now),
            content: new_post.content,
            video_url: new_post.video_url,
            affiliate_link: new_post.affiliate_link,
            timestamp: now,
            engagement: Engagement::default(),
        };
        history.posts.push(post.clone());
        self.store.save(&history).await?;

        info!(post_id = %post.id, total = history.len(), "Recorded post in history");
        Ok(post)
    }

    /// Rewrite engagement counters in place
    ///
    /// `f` sees every post in ledger order and returns the new counters for
    /// the posts it wants to change. Order and membership never change.
    /// Returns how many posts were updated; nothing is written when that is
    /// zero.
    pub async fn update_engagement<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(&Post) -> Option<Engagement> + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut history = self.store.try_load().await?;

        let mut updated = 0;
        for post in history.posts.iter_mut() {
            if let Some(engagement) = f(post) {
                post.engagement = engagement;
                updated += 1;
            }
        }

        if updated > 0 {
            self.store.save(&history).await?;
        }
        Ok(updated)
    }
}

/// `post_<unix millis>`, suffixed when that id is already taken
fn next_post_id(history: &PostHistory, now: DateTime<Utc>) -> String {
    let base = format!("post_{}", now.timestamp_millis());
    let taken = |id: &str| history.posts.iter().any(|p| p.id == id);

    if !taken(&base) {
        return base;
    }

    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
