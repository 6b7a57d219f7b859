//! Command-line interface definitions for newswire.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every knob has a default matching the standard run, so `newswire` with no
//! arguments fetches the built-in catalog and writes `news_data.json`.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::RetryPolicy;

/// Command-line arguments for the newswire aggregator.
///
/// # Examples
///
/// ```sh
/// # Standard run: built-in catalog, ./news_data.json
/// newswire
///
/// # Custom catalog and output location
/// newswire --catalog feeds.yaml --output /var/data/news.json
///
/// # More patience for flaky networks
/// newswire --max-retries 5 --retry-delay-secs 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the aggregated JSON document
    #[arg(short, long, default_value = "news_data.json")]
    pub output: PathBuf,

    /// YAML file overriding the built-in feed catalog
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Total attempts per feed before giving up
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,

    /// Fixed delay between attempts in seconds
    #[arg(long, default_value_t = 2)]
    pub retry_delay_secs: u64,
}

impl Cli {
    /// The retry policy described by the parsed arguments.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries,
            request_timeout: Duration::from_secs(self.timeout_secs),
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}
