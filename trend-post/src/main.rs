//! trend-post - Post a video link right away

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use libtrendcast::logging::{LoggingConfig, LOG_LEVEL_ENV};
use libtrendcast::poster::CREDENTIALS_MISSING;
use libtrendcast::{PostResult, TrendcastError, TrendcastService};
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(name = "trend-post")]
#[command(version, about = "Post a video link with the configured hashtags and affiliate link")]
#[command(long_about = "\
Post a video link right away, the same way the auto-poster would.

The post text is the custom --text if given, otherwise
\"Check out this trending video: <VIDEO_URL>\". One hashtag group from the
settings is appended at random, followed by the affiliate link with the
video URL filled in. Successful posts are recorded in the post history.

EXAMPLES:
    trend-post https://youtube.com/watch?v=abc123
    trend-post https://youtube.com/watch?v=abc123 --text \"You have to see this\"
    trend-post https://youtube.com/watch?v=abc123 --format json | jq .success

EXIT CODES:
    0 - Posted and recorded
    1 - Posting failed
    2 - Twitter credentials not configured
    3 - Invalid input
")]
struct Cli {
    /// URL of the video to post
    video_url: String,

    /// Custom text instead of the default lead-in
    #[arg(short, long)]
    text: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env(cli.verbose);
    if !cli.verbose && std::env::var(LOG_LEVEL_ENV).is_err() {
        logging = logging.with_level("error");
    }
    logging.init();
    debug!("trend-post started with args: {:?}", cli);

    match run(&cli).await {
        Ok(result) => {
            if let Err(e) = print_result(&cli, &result) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
            if !result.success {
                std::process::exit(failure_code(&result));
            }
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<TrendcastError>()
                .map(TrendcastError::exit_code)
                .unwrap_or(1);
            std::process::exit(code);
        }
    }
}

async fn run(cli: &Cli) -> Result<PostResult> {
    if cli.video_url.trim().is_empty() {
        return Err(TrendcastError::InvalidInput("Video URL is required.".to_string()).into());
    }

    let service = TrendcastService::new().context("Failed to load configuration")?;
    Ok(service
        .manual_post(cli.video_url.trim(), cli.text.as_deref())
        .await)
}

fn print_result(cli: &Cli, result: &PostResult) -> Result<()> {
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(result)?),
        OutputFormat::Text => match &result.error {
            None => println!("Posted {}", cli.video_url.trim()),
            Some(error) => eprintln!("Error: {}", error),
        },
    }
    Ok(())
}

fn failure_code(result: &PostResult) -> i32 {
    match result.error.as_deref() {
        Some(CREDENTIALS_MISSING) => 2,
        _ => 1,
    }
}
