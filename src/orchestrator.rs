//! Runs every catalog feed to a terminal state concurrently and merges the
//! results into one aggregate collection.
//!
//! Each feed gets its own fetch unit; all units share one HTTP client and
//! are driven together over the runtime, so a stalled or failing feed never
//! blocks or cancels the others. Units return their items instead of writing
//! into shared state: the joining task is the only writer of the aggregate,
//! merging outcomes in whatever order units finish.

use futures::stream::{self, StreamExt};
use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fetcher::{self, FetchObserver, RetryPolicy};
use crate::models::{FeedDescriptor, FetchOutcome, NewsItem, RunSummary};

/// Fetch all catalog feeds to completion and aggregate their items.
///
/// Per-feed exhaustion is absorbed into the summary counts; the only fatal
/// error at this layer is failing to construct the shared HTTP client.
pub async fn run(
    catalog: &[FeedDescriptor],
    policy: &RetryPolicy,
    observer: &dyn FetchObserver,
) -> Result<(Vec<NewsItem>, RunSummary)> {
    let client = Client::builder()
        .build()
        .map_err(|e| Error::ClientInit(e.to_string()))?;

    let outcomes: Vec<FetchOutcome> = stream::iter(catalog)
        .map(|feed| fetcher::fetch_feed(&client, feed, policy, observer))
        .buffer_unordered(catalog.len().max(1))
        .collect()
        .await;
    debug!(outcomes = outcomes.len(), "All feed tasks complete");

    let mut items = Vec::new();
    let mut feeds_failed = 0usize;
    for outcome in outcomes {
        match outcome {
            FetchOutcome::Fetched(batch) => items.extend(batch),
            // already reported by the unit; an exhausted feed simply
            // contributes nothing
            FetchOutcome::Exhausted { .. } => feeds_failed += 1,
        }
    }

    let summary = RunSummary {
        total_items: items.len(),
        total_feeds: catalog.len(),
        feeds_failed,
    };

    Ok((items, summary))
}
