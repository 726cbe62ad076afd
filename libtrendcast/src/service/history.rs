//! Querying and summarizing post history
//!
//! Works on a [`PostHistory`] snapshot taken from the ledger; nothing here
//! writes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Engagement, Post, PostHistory};

/// Filters for listing posts
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Only posts recorded at or after this time
    pub since: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the content or video URL
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl HistoryQuery {
    fn matches(&self, post: &Post) -> bool {
        if let Some(since) = self.since {
            if post.timestamp < since {
                return false;
            }
        }

        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                post.content.to_lowercase().contains(&term)
                    || post.video_url.to_lowercase().contains(&term)
            }
            None => true,
        }
    }

    /// Matching posts, newest first
    pub fn apply<'a>(&self, history: &'a PostHistory) -> Vec<&'a Post> {
        let matching = history.posts.iter().rev().filter(|post| self.matches(post));
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_posts: usize,
    pub total_engagement: Engagement,
    pub top_posts: Vec<Post>,
    /// Likes, retweets and replies per post
    pub engagement_rate: f64,
    /// Clicks per post
    pub click_through_rate: f64,
}

impl HistoryStats {
    /// Summarize a history, keeping the `top_n` posts with the most engagement
    pub fn summarize(history: &PostHistory, top_n: usize) -> Self {
        let total_engagement = history
            .posts
            .iter()
            .fold(Engagement::default(), |acc, post| acc.saturating_add(post.engagement));

        // Stable sort, so ties keep ledger order
        let mut top_posts = history.posts.clone();
        top_posts.sort_by(|a, b| b.engagement.total().cmp(&a.engagement.total()));
        top_posts.truncate(top_n);

        let total_posts = history.len();
        let (engagement_rate, click_through_rate) = if total_posts == 0 {
            (0.0, 0.0)
        } else {
            let interactions = total_engagement
                .likes
                .saturating_add(total_engagement.retweets)
                .saturating_add(total_engagement.replies);
            (
                interactions as f64 / total_posts as f64,
                total_engagement.clicks as f64 / total_posts as f64,
            )
        };

        Self {
            total_posts,
            total_engagement,
            top_posts,
            engagement_rate,
            click_through_rate,
        }
    }
}
