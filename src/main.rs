//! # Weeklypedia RSS
//!
//! Builds an RSS 2.0 feed from the [Weeklypedia](https://weekly.hatnote.com/)
//! archive. Weeklypedia publishes a weekly digest of the most edited
//! Wikipedia articles and discussions but offers no feed of its own.
//!
//! ## Usage
//!
//! ```sh
//! weeklypedia_rss -o feed.xml
//! ```
//!
//! ## Architecture
//!
//! The application follows a sequential pipeline:
//! 1. **Indexing**: Fetch the archive page and parse every issue link
//! 2. **Enrichment**: Fetch the newest issues one at a time, with a politeness
//!    delay, and extract their article and discussion lists
//! 3. **Output**: Serialize the issues to RSS and write the feed file
//!
//! Only a failure to fetch the archive aborts the run. Issues whose page cannot
//! be fetched or parsed get a generated description instead.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use config::FeedConfig;
use fetch::{HttpFetcher, RetryFetch};
use outputs::rss;
use utils::ensure_writable_parent;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: usize = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("weeklypedia_rss starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Load config: defaults <- file <- flags ----
    let base_config = match args.config {
        Some(ref path) => FeedConfig::load(path).await.inspect_err(|e| {
            error!(error = %e, "Failed to load configuration");
        })?,
        None => FeedConfig::default(),
    };
    let config = args.apply(base_config);
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }
    info!(
        max_items = config.max_items,
        fetch_content_count = config.fetch_content_count,
        output = %config.output_path.display(),
        "Configuration ready"
    );

    // Early check: ensure the output location is writable
    if let Err(e) = ensure_writable_parent(&config.output_path).await {
        error!(
            path = %config.output_path.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let http = HttpFetcher::new(REQUEST_TIMEOUT)?;
    let fetcher = RetryFetch::new(http, MAX_RETRIES, RETRY_BASE_DELAY);

    // ---- Index issues ----
    let mut issues = match scrapers::archive::index_issues(&fetcher, &config).await {
        Ok(issues) => issues,
        Err(e) => {
            error!(url = %config.archive_url, error = %e, "Failed to fetch archive index");
            return Err(e.into());
        }
    };

    // ---- Enrich the newest issues ----
    let enriched = scrapers::issue::enrich_issues(
        &fetcher,
        &mut issues,
        config.fetch_content_count,
        Duration::from_millis(config.fetch_delay_ms),
    )
    .await;

    // ---- RSS output ----
    let xml = rss::build_feed(&issues, &config, config.max_items)?;
    if let Err(e) = rss::write_feed(&xml, &config.output_path).await {
        error!(path = %config.output_path.display(), error = %e, "Failed writing RSS feed");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        issues = issues.len(),
        items = issues.len().min(config.max_items),
        enriched,
        path = %config.output_path.display(),
        "Execution complete"
    );

    Ok(())
}
