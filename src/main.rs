//! # Newswire
//!
//! A world-news aggregator that concurrently fetches a catalog of RSS feeds,
//! parses each into structured news items, and writes the combined result to
//! a single JSON document.
//!
//! ## Features
//!
//! - Fetches every catalog feed concurrently over one shared HTTP client
//! - Retries each feed a bounded number of times with a fixed delay and a
//!   per-request timeout; a dead feed never takes the run down with it
//! - Tolerant item parsing: missing titles, links, dates, or descriptions
//!   become explicit nulls in the output
//! - Output is one UTF-8 JSON array with non-ASCII text preserved literally
//!
//! ## Usage
//!
//! ```sh
//! newswire --output news_data.json
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Catalog**: load the feed list (built-in or a YAML file)
//! 2. **Fetching**: one retrying fetch unit per feed, all concurrent
//! 3. **Aggregation**: merge per-feed items in completion order
//! 4. **Output**: write the aggregate as a single JSON array

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod catalog;
mod cli;
mod error;
mod fetcher;
mod models;
mod orchestrator;
mod outputs;
mod parser;

use cli::Cli;
use fetcher::TracingObserver;

#[tokio::main]
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
    info!("newswire starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.output, ?args.catalog, "Parsed CLI arguments");

    // --- Feed catalog ---
    let feeds = catalog::load_catalog(args.catalog.as_deref()).await?;
    info!(count = feeds.len(), "Loaded feed catalog");

    // --- Concurrent fetch + aggregate ---
    let policy = args.retry_policy();
    debug!(?policy, "Retry policy");
    let (items, summary) = orchestrator::run(&feeds, &policy, &TracingObserver).await?;

    info!(
        items = summary.total_items,
        feeds = summary.total_feeds,
        failed = summary.feeds_failed,
        "Fetched {} items from {} feeds, {} failed",
        summary.total_items,
        summary.total_feeds,
        summary.feeds_failed
    );

    // --- Write the aggregated document ---
    outputs::json::write_items(&items, &args.output).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
