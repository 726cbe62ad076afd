//! Built-in curated catalogs
//!
//! Trendcast does not scrape video platforms. The `youtube` and `tiktok`
//! sources serve a fixed list of known-trending videos, which keeps the
//! scheduler useful out of the box and gives a stable set of candidates.

use async_trait::async_trait;

use super::ContentSource;
use crate::error::Result;
use crate::types::VideoContent;

#[derive(Debug, Clone)]
pub struct CatalogSource {
    name: String,
    videos: Vec<VideoContent>,
}

impl CatalogSource {
    pub fn new(name: &str, videos: Vec<VideoContent>) -> Self {
        Self {
            name: name.to_string(),
            videos,
        }
    }

    pub fn youtube() -> Self {
        Self::new(
            "youtube",
            vec![
                trending(
                    "youtube_1",
                    "Amazing Cat Compilation 2023",
                    "https://youtube.com/watch?v=abc123",
                    "youtube",
                    "https://example.com/thumbnail1.jpg",
                    1_500_000,
                    75_000,
                ),
                trending(
                    "youtube_2",
                    "How to Make Perfect Pasta Every Time",
                    "https://youtube.com/watch?v=def456",
                    "youtube",
                    "https://example.com/thumbnail2.jpg",
                    980_000,
                    45_000,
                ),
            ],
        )
    }

    pub fn tiktok() -> Self {
        Self::new(
            "tiktok",
            vec![trending(
                "tiktok_1",
                "Dance Challenge 2023",
                "https://tiktok.com/@user/video/123456",
                "tiktok",
                "https://example.com/tiktok1.jpg",
                2_500_000,
                500_000,
            )],
        )
    }
}

fn trending(
    id: &str,
    title: &str,
    url: &str,
    source: &str,
    thumbnail: &str,
    views: u64,
    likes: u64,
) -> VideoContent {
    VideoContent {
        thumbnail: Some(thumbnail.to_string()),
        views: Some(views),
        likes: Some(likes),
        trending: Some(true),
        ..VideoContent::new(id, title, url, source)
    }
}

#[async_trait]
impl ContentSource for CatalogSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_trending(&self) -> Result<Vec<VideoContent>> {
        Ok(self.videos.clone())
    }
}
