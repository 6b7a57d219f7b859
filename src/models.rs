//! Data models for feed sources, news items, and per-run results.
//!
//! This module defines the core data structures used throughout the
//! application:
//! - [`FeedDescriptor`]: one catalog entry (country, source, endpoint)
//! - [`NewsItem`]: one parsed feed entry, as serialized to the output
//! - [`FetchOutcome`]: the terminal result of one fetch unit
//! - [`RunSummary`]: aggregate counts reported at the end of a run

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// One entry of the feed catalog: where to fetch and how to label the items.
///
/// Descriptors are constructed once at startup (from the built-in list or a
/// YAML catalog file) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedDescriptor {
    /// Country the outlet reports from.
    pub country: String,
    /// Human-readable outlet name, stamped onto every item.
    pub source: String,
    /// Feed endpoint URL.
    pub url: String,
}

/// A single news entry extracted from a feed document.
///
/// Every syndication sub-field is independently optional; a missing title or
/// date serializes as an explicit `null`. Fields serialize in declaration
/// order, so the output document has a stable per-item layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewsItem {
    /// Generated identifier, unique per item.
    pub id: String,
    /// The entry's `<title>` text.
    pub title: Option<String>,
    /// The entry's `<link>` text.
    pub link: Option<String>,
    /// The entry's `<pubDate>` text, kept raw and unparsed.
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
    /// The entry's `<description>` text.
    pub description: Option<String>,
    /// Outlet name from the feed's catalog entry.
    pub source: String,
    /// Country from the feed's catalog entry.
    pub country: String,
    /// UTC timestamp recorded when the item was parsed, RFC 3339.
    pub fetched_at: String,
}

impl NewsItem {
    /// Build an item from parsed sub-fields, stamping source metadata, a
    /// fresh identifier, and the retrieval timestamp.
    pub fn new(
        feed: &FeedDescriptor,
        title: Option<String>,
        link: Option<String>,
        pub_date: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            link,
            pub_date,
            description,
            source: feed.source.clone(),
            country: feed.country.clone(),
            fetched_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Terminal result of one fetch-with-retry unit.
///
/// Consumed by the orchestrator when the unit's task completes; an exhausted
/// feed contributes nothing to the aggregate and never fails the run.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The feed answered with a parseable document. An empty item list still
    /// counts as a successful fetch.
    Fetched(Vec<NewsItem>),
    /// Every attempt failed; `error` is the reason of the last one.
    Exhausted { feed: FeedDescriptor, error: Error },
}

/// Aggregate counts for one complete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Items merged into the aggregate across all feeds.
    pub total_items: usize,
    /// Feeds attempted (the full catalog).
    pub total_feeds: usize,
    /// Feeds that exhausted their retries.
    pub feeds_failed: usize,
}
