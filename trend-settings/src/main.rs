//! trend-settings - Show and update operator settings
//!
//! Settings are the dashboard's `settings.json`: credentials, affiliate link,
//! content sources, hashtag groups and the auto-post and analytics switches.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use libtrendcast::logging::{LoggingConfig, LOG_LEVEL_ENV};
use libtrendcast::{Settings, TrendcastError, TrendcastService};
use std::io::Read;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "trend-settings")]
#[command(version, about = "Show and update Trendcast operator settings")]
#[command(long_about = "\
Show and update Trendcast operator settings.

`show` prints the current settings with the password and API secrets
masked. `set` replaces the settings with a JSON document read from a file
or from stdin. Settings that enable auto-posting must include Twitter
credentials and an affiliate link, or they are rejected.

EXAMPLES:
    trend-settings show
    trend-settings show --format json | jq .hashtagGroups
    trend-settings set settings.json
    echo '{\"autoPostEnabled\": false}' | trend-settings set -

EXIT CODES:
    0 - Success
    1 - Settings rejected or storage error
    3 - Input is not valid settings JSON
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current settings with secrets masked
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Replace the settings with a JSON document
    Set {
        /// JSON file to read, or `-` for stdin
        #[arg(value_name = "FILE|-")]
        input: String,
    },
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
        logging = logging.with_level("warn");
    }
    logging.init();

    if let Err(e) = run_command(cli.command).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<TrendcastError>()
            .map(TrendcastError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run_command(command: Commands) -> Result<()> {
    let service = TrendcastService::new().context("Failed to load configuration")?;

    match command {
        Commands::Show { format } => {
            let settings = service.settings().await.masked();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
                OutputFormat::Text => print_settings(&settings),
            }
        }
        Commands::Set { input } => {
            let settings = read_settings(&input)?;
            service.save_settings(&settings).await?;
            println!(
                "Settings saved to {}",
                service.config().settings_path().display()
            );
        }
    }

    Ok(())
}

fn read_settings(input: &str) -> Result<Settings> {
    let raw = if input == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read settings from stdin")?;
        raw
    } else {
        let path = PathBuf::from(input);
        std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    let settings: Settings = serde_json::from_str(&raw).map_err(|e| {
        TrendcastError::InvalidInput(format!("Settings are not valid JSON: {}", e))
    })?;
    Ok(settings)
}

fn print_settings(settings: &Settings) {
    let credentials = &settings.credentials;
    let or_unset = |value: &Option<String>| value.clone().unwrap_or_else(|| "(not set)".to_string());
    let on_off = |flag: bool| if flag { "enabled" } else { "disabled" };

    println!("Twitter username:    {}", or_unset(&credentials.username));
    println!("Twitter password:    {}", or_unset(&credentials.password));
    println!("Twitter email:       {}", or_unset(&credentials.email));
    println!("API key:             {}", or_unset(&credentials.api_key));
    println!("API secret key:      {}", or_unset(&credentials.api_secret_key));
    println!("Access token:        {}", or_unset(&credentials.access_token));
    println!("Access token secret: {}", or_unset(&credentials.access_token_secret));
    println!();
    println!("Auto-post:           {}", on_off(settings.auto_post_enabled));
    println!("Affiliate link:      {}", or_unset(&settings.affiliate_link));
    if settings.content_sources.is_empty() {
        println!(
            "Content sources:     {} (default)",
            settings.effective_sources().join(", ")
        );
    } else {
        println!("Content sources:     {}", settings.content_sources.join(", "));
    }
    match settings.post_frequency {
        Some(minutes) => println!("Post frequency:      every {} minutes", minutes),
        None => println!("Post frequency:      (not set)"),
    }
    println!("Analytics:           {}", on_off(settings.analytics_enabled));

    if !settings.target_audience.is_empty() {
        println!("Target audience:     {}", settings.target_audience.join(", "));
    }

    if settings.hashtag_groups.is_empty() {
        println!("Hashtag groups:      (none)");
    } else {
        println!("Hashtag groups:");
        for group in &settings.hashtag_groups {
            println!("  {}", group);
        }
    }
}
