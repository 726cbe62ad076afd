//! trend-send - Background daemon for auto-posting
//!
//! Runs the auto-post job and the engagement simulation on their own
//! intervals until told to stop.

use anyhow::{Context, Result};
use clap::Parser;
use libtrendcast::logging::LoggingConfig;
use libtrendcast::service::scheduler::TickOutcome;
use libtrendcast::service::simulator::SimulationOutcome;
use libtrendcast::{Config, TrendcastError, TrendcastService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "trend-send")]
#[command(version)]
#[command(about = "Background daemon that auto-posts trending videos")]
#[command(long_about = "\
trend-send - Background daemon that auto-posts trending videos

DESCRIPTION:
    trend-send is a long-running daemon with two periodic jobs.

    The auto-post job finds trending videos from the enabled content
    sources, picks one at random and posts it with a rotating hashtag group
    and the configured affiliate link. It does nothing while auto-posting is
    disabled or no affiliate link is set.

    The engagement job grows the simulated likes, retweets, replies and
    clicks of posts from the last seven days. It does nothing while
    analytics are disabled.

USAGE:
    # Run in foreground (logs to stderr)
    trend-send

    # Auto-post every 30 minutes
    trend-send --interval 30

    # Run both jobs once and exit
    trend-send --once

SIGNALS:
    SIGTERM, SIGINT - Graceful shutdown (finishes the current job)

CONFIGURATION:
    Configuration file: ~/.config/trendcast/config.toml
    Settings:           ~/.local/share/trendcast/settings.json
    Post history:       ~/.local/share/trendcast/posts-history.json

    [scheduler]
    interval = \"60m\"        # time between auto-posts

    [simulator]
    interval = \"3h\"         # time between engagement updates
    window = \"7d\"           # posts older than this stop growing

    [network]
    request_timeout = \"30s\" # bound for every fetch and client call

ENVIRONMENT:
    TRENDCAST_CONFIG                      Alternative config file
    TRENDCAST_AUTO_POST_INTERVAL_MINUTES  Auto-post interval in minutes
    TRENDCAST_LOG_FORMAT                  text, json or pretty
    TRENDCAST_LOG_LEVEL                   Default log level (info)

EXIT CODES:
    0 - Clean shutdown
    1 - Configuration or storage error
")]
struct Cli {
    /// Minutes between auto-posts (overrides config and environment)
    #[arg(long, value_name = "MINUTES")]
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Run each job once and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.verbose).init();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    e.downcast_ref::<TrendcastError>()
        .map(TrendcastError::exit_code)
        .unwrap_or(1)
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(minutes) = cli.interval {
        config.scheduler.interval = format!("{}m", minutes);
    }

    let post_interval = config.scheduler_interval()?;
    let simulate_interval = config.simulator_interval()?;

    let service = TrendcastService::from_config(config)?;
    service
        .ensure_storage()
        .await
        .context("Storage is not available")?;
    let service = Arc::new(service);

    info!("trend-send daemon starting");

    if cli.once {
        log_tick(&service.run_scheduler_tick().await);
        log_simulation(&service.run_simulator_tick().await);
        info!("trend-send: ran each job once, exiting");
        return Ok(());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(Arc::clone(&shutdown))?;

    info!(
        "Auto-post interval: {:?}, engagement interval: {:?}",
        post_interval, simulate_interval
    );

    let poster = {
        let service = Arc::clone(&service);
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            run_job_loop("auto-post", post_interval, &shutdown, || {
                let service = Arc::clone(&service);
                async move { log_tick(&service.run_scheduler_tick().await) }
            })
            .await
        })
    };

    let simulator = {
        let service = Arc::clone(&service);
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            run_job_loop("engagement", simulate_interval, &shutdown, || {
                let service = Arc::clone(&service);
                async move { log_simulation(&service.run_simulator_tick().await) }
            })
            .await
        })
    };

    let (posted, simulated) = tokio::join!(poster, simulator);
    posted.context("Auto-post loop panicked")?;
    simulated.context("Engagement loop panicked")?;

    info!("trend-send daemon stopped");
    Ok(())
}

/// Run `job` immediately, then every `interval`, until shutdown
///
/// Each run is awaited before the next sleep starts, so runs of the same job
/// never overlap. Shutdown is checked before every run and every second while
/// sleeping.
async fn run_job_loop<F, Fut>(name: &str, interval: Duration, shutdown: &AtomicBool, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    loop {
        if shutdown.load(Ordering::Relaxed) {
            info!("Shutdown requested, stopping {} loop", name);
            break;
        }

        debug!("Running {} job", name);
        job().await;

        let deadline = Instant::now() + interval;
        while Instant::now() < deadline {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            sleep(remaining.min(Duration::from_secs(1))).await;
        }
    }
}

fn log_tick(outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Posted { video_url } => info!("Auto-posted {}", video_url),
        TickOutcome::Failed { video_url, error } => {
            error!("Auto-post of {} failed: {}", video_url, error)
        }
        TickOutcome::Disabled => debug!("Auto-posting disabled"),
        TickOutcome::NoContent => debug!("Nothing to post this time"),
        TickOutcome::Busy => debug!("Previous auto-post still running"),
    }
}

fn log_simulation(outcome: &SimulationOutcome) {
    match outcome {
        SimulationOutcome::Updated { posts } => info!("Engagement updated for {} post(s)", posts),
        SimulationOutcome::Failed { error } => error!("Engagement update failed: {}", error),
        SimulationOutcome::Disabled => debug!("Analytics disabled"),
        SimulationOutcome::Busy => debug!("Previous engagement update still running"),
    }
}

/// Set up signal handlers for graceful shutdown
#[cfg(unix)]
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to install signal handlers")?;

    std::thread::spawn(move || {
        if signals.forever().next().is_some() {
            info!("Received shutdown signal, stopping gracefully...");
            shutdown.store(true, Ordering::Relaxed);
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal, stopping gracefully...");
            shutdown.store(true, Ordering::Relaxed);
        }
    });
    Ok(())
}
