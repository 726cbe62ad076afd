use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Parser;
use libtrendcast::logging::{LoggingConfig, LOG_LEVEL_ENV};
use libtrendcast::service::history::{HistoryQuery, HistoryStats};
use libtrendcast::{Post, TrendcastService, VideoContent};

#[derive(Parser, Debug)]
#[command(name = "trend-history")]
#[command(version, about = "Query post history, engagement statistics and trending videos")]
#[command(long_about = r#"Query the local post history, its engagement statistics, or the
videos the auto-poster would currently choose from.

EXAMPLES:
    # Show last 20 posts (default)
    trend-history

    # Show more posts
    trend-history --limit 50

    # Filter by date
    trend-history --since "2025-10-01"
    trend-history --since "2025-10-01T09:00:00Z"

    # Search content and video URLs
    trend-history --search "youtube"

    # Engagement summary with the five best posts
    trend-history --stats
    trend-history --stats --limit 5 --format json | jq .engagementRate

    # Trending videos from the enabled sources
    trend-history --trending

    # JSON output for scripting
    trend-history --format json | jq '.[] | .engagement.clicks'

    # JSONL output (one JSON object per line)
    trend-history --format jsonl

OUTPUT FORMATS:
    text  - Human-readable text (default)
    json  - JSON array, or a single object for --stats
    jsonl - JSON lines, one object per line (streaming-friendly)

EXIT CODES:
    0 - Success (including empty results)
    1 - Error (bad configuration, invalid date, etc.)
"#)]
struct Args {
    /// Filter posts since this date (Unix timestamp or ISO 8601 format)
    #[arg(long, value_name = "DATE")]
    #[arg(help = "Show posts since this date (Unix timestamp, YYYY-MM-DD, or ISO 8601 format)")]
    since: Option<String>,

    /// Search posts by content
    #[arg(short, long, value_name = "TERM")]
    #[arg(help = "Search posts whose text or video URL contains this term (case-insensitive)")]
    search: Option<String>,

    /// Maximum number of posts to return
    #[arg(short, long, default_value = "20", value_name = "N")]
    #[arg(help = "Maximum number of posts to return; with --stats, the number of top posts")]
    limit: usize,

    /// Output format
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Show engagement statistics instead of the post list
    #[arg(long, conflicts_with = "trending")]
    stats: bool,

    /// Show currently trending videos instead of the post list
    #[arg(long)]
    trending: bool,
}

/// Parse date string to a UTC timestamp
fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    if let Ok(timestamp) = date_str.parse::<i64>() {
        return DateTime::from_timestamp(timestamp, 0)
            .with_context(|| format!("Timestamp out of range: {}", date_str));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").with_context(|| {
        format!(
            "Invalid date format: {}. Use Unix timestamp or ISO 8601 (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ)",
            date_str
        )
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

fn print_json<T: serde::Serialize>(format: &str, items: &[T]) -> Result<()> {
    if format == "jsonl" {
        for item in items {
            println!("{}", serde_json::to_string(item)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(items)?);
    }
    Ok(())
}

/// Single-line preview of a post body
fn preview(content: &str, max_chars: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max_chars {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

fn print_posts(posts: &[Post]) {
    for post in posts {
        let timestamp = post.timestamp.format("%Y-%m-%d %H:%M:%S");
        println!("{} | {} | {}", timestamp, post.id, preview(&post.content, 60));
        println!("  video: {}", post.video_url);
        if let Some(link) = &post.affiliate_link {
            println!("  link:  {}", link);
        }
        let e = &post.engagement;
        println!(
            "  likes: {}  retweets: {}  replies: {}  clicks: {}",
            e.likes, e.retweets, e.replies, e.clicks
        );
        println!();
    }
}

fn print_stats(stats: &HistoryStats) {
    let e = &stats.total_engagement;
    println!("Total posts:        {}", stats.total_posts);
    println!(
        "Total engagement:   {} likes, {} retweets, {} replies, {} clicks",
        e.likes, e.retweets, e.replies, e.clicks
    );
    println!("Engagement rate:    {:.2} per post", stats.engagement_rate);
    println!("Click-through rate: {:.2} per post", stats.click_through_rate);

    if !stats.top_posts.is_empty() {
        println!();
        println!("Top posts:");
        for (rank, post) in stats.top_posts.iter().enumerate() {
            println!(
                "  {}. [{}] {}",
                rank + 1,
                post.engagement.total(),
                preview(&post.content, 60)
            );
        }
    }
}

fn print_videos(videos: &[VideoContent]) {
    for video in videos {
        println!("{} | {} | {}", video.source, video.title, video.url);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::from_env(false);
    if std::env::var(LOG_LEVEL_ENV).is_err() {
        logging = logging.with_level("warn");
    }
    logging.init();
    tracing::debug!("trend-history started with args: {:?}", args);

    let service = TrendcastService::new().context("Failed to load configuration")?;

    if args.trending {
        let videos = service.trending().await;
        match args.format.as_str() {
            "text" => print_videos(&videos),
            format => print_json(format, &videos)?,
        }
        return Ok(());
    }

    if args.stats {
        let stats = service.stats(args.limit).await;
        match args.format.as_str() {
            "text" => print_stats(&stats),
            "jsonl" => println!("{}", serde_json::to_string(&stats)?),
            _ => println!("{}", serde_json::to_string_pretty(&stats)?),
        }
        return Ok(());
    }

    let since = args.since.as_deref().map(parse_date).transpose()?;
    let query = HistoryQuery {
        since,
        search: args.search,
        limit: Some(args.limit),
    };
    let posts = service.query_history(&query).await;

    match args.format.as_str() {
        // Empty results print nothing
        "text" => print_posts(&posts),
        format => print_json(format, &posts)?,
    }

    Ok(())
}
