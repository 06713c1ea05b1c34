//! CLI entry point for quake_trends.
//!
//! Loads UK earthquake events (local cache first, USGS feed as fallback),
//! rolls them up per year, prints a summary and writes a dual-axis chart.
//! With no flags it reads the default cache and does not re-save.

use anyhow::Result;
use clap::Parser;
use quake_trends::{
    analyzers::analyze,
    chart::{DEFAULT_CHART_PATH, render},
    fetch::BasicClient,
    loader::{DEFAULT_CACHE_PATH, FeedQuery, Loader, LoaderOptions, RemoteFeed},
    models::strongest_event,
    output::{display_chart, print_summary, write_csv},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser, Debug)]
#[command(name = "quake_trends")]
#[command(about = "Yearly frequency and magnitude of UK earthquakes", long_about = None)]
struct Cli {
    /// Cached feed response, read before querying the feed
    #[arg(long, env = "QUAKE_CACHE_PATH", default_value = DEFAULT_CACHE_PATH)]
    cache: PathBuf,

    /// Skip the cache and query the feed
    #[arg(long, default_value_t = false)]
    refresh: bool,

    /// Save a freshly fetched response to the cache file
    #[arg(long, default_value_t = false)]
    save: bool,

    /// Where to write the chart image
    #[arg(long, env = "QUAKE_CHART_PATH", default_value = DEFAULT_CHART_PATH)]
    chart: PathBuf,

    /// Optional: also write the yearly rollup as CSV
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Feed request timeout in seconds (0 = wait indefinitely)
    #[arg(long, env = "QUAKE_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Do not print the per-year bar view to the terminal
    #[arg(long, default_value_t = false)]
    no_display: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging()?;
    let cli = Cli::parse();

    run(cli).await
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/quake_trends.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("quake_trends.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Runs the pipeline once: load, aggregate, report.
async fn run(cli: Cli) -> Result<()> {
    let timeout = (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs));
    let client = BasicClient::with_timeout(timeout)?;

    let loader = Loader::new(
        RemoteFeed::new(client),
        LoaderOptions {
            cache_path: cli.cache,
            prefer_local: !cli.refresh,
            save_to_cache: cli.save,
            query: FeedQuery::default(),
        }
    );

    info!("Loading earthquake data");
    let collection = loader.load().await?;
    let records = collection.records();
    info!(events = records.len(), "Loaded earthquakes");

    if let Some(strongest) = strongest_event(&records) {
        info!(
            magnitude = strongest.magnitude,
            latitude = strongest.latitude,
            longitude = strongest.longitude,
            "Strongest earthquake"
        );
    }

    let (aggregates, summary) = analyze(&records)?;
    print_summary(&summary)?;

    if let Some(path) = &cli.csv {
        write_csv(path, &aggregates)?;
        info!(path = %path.display(), "Yearly rollup written");
    }

    render(&cli.chart, &aggregates)?;

    if !cli.no_display {
        display_chart(&mut std::io::stdout().lock(), &aggregates)?;
    }

    Ok(())
}
