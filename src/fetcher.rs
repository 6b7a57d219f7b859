//! The per-feed fetch unit: one HTTP GET with a bounded timeout, retried a
//! fixed number of times with a fixed inter-attempt delay.
//!
//! Any failure within an attempt (a connect error, a timeout, a non-success
//! status, a malformed document) is treated uniformly: the unit waits the
//! configured delay and tries again until its attempt budget is spent. A feed
//! that exhausts its attempts reports [`FetchOutcome::Exhausted`] and
//! contributes nothing; it never aborts the rest of the run.
//!
//! The unit reports every lifecycle event through an injected
//! [`FetchObserver`], keeping the retry logic independent of any particular
//! log sink. Production wires in [`TracingObserver`]; tests substitute
//! recording implementations.

use reqwest::Client;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::models::{FeedDescriptor, FetchOutcome, NewsItem};
use crate::parser;

/// Client identity sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Retry knobs for a fetch unit, injected by the caller.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per feed, including the first.
    pub max_attempts: u32,
    /// Time allowed for one complete request/response cycle.
    pub request_timeout: Duration,
    /// Fixed pause between consecutive attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            request_timeout: Duration::from_secs(20),
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Receives the lifecycle events of a fetch unit.
pub trait FetchObserver: Send + Sync {
    /// An attempt is about to issue its request. Attempts count from 1.
    fn attempt_started(&self, feed: &FeedDescriptor, attempt: u32);
    /// The attempt failed; `will_retry` is false on the final attempt.
    fn attempt_failed(&self, feed: &FeedDescriptor, attempt: u32, error: &Error, will_retry: bool);
    /// The feed answered with one or more items.
    fn feed_fetched(&self, feed: &FeedDescriptor, item_count: usize);
    /// The feed answered successfully but contained no items.
    fn feed_empty(&self, feed: &FeedDescriptor);
    /// The attempt budget is spent; the feed contributes nothing this run.
    fn retries_exhausted(&self, feed: &FeedDescriptor, attempts: u32, error: &Error);
}

/// Observer that forwards unit events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn attempt_started(&self, feed: &FeedDescriptor, attempt: u32) {
        info!(
            url = %feed.url,
            source = %feed.source,
            country = %feed.country,
            attempt,
            "Sending feed request"
        );
    }

    fn attempt_failed(&self, feed: &FeedDescriptor, attempt: u32, error: &Error, will_retry: bool) {
        warn!(
            url = %feed.url,
            source = %feed.source,
            attempt,
            will_retry,
            error = %error,
            "Feed attempt failed"
        );
    }

    fn feed_fetched(&self, feed: &FeedDescriptor, item_count: usize) {
        info!(url = %feed.url, source = %feed.source, count = item_count, "Fetched feed items");
    }

    fn feed_empty(&self, feed: &FeedDescriptor) {
        warn!(url = %feed.url, source = %feed.source, "No items found in feed");
    }

    fn retries_exhausted(&self, feed: &FeedDescriptor, attempts: u32, error: &Error) {
        error!(
            url = %feed.url,
            source = %feed.source,
            attempts,
            error = %error,
            "Giving up on feed"
        );
    }
}

/// Drive one feed to a terminal outcome.
///
/// A response with a success status that parses cleanly ends the unit, even
/// when the item list is empty. The delay is skipped after the final attempt.
pub async fn fetch_feed(
    client: &Client,
    feed: &FeedDescriptor,
    policy: &RetryPolicy,
    observer: &dyn FetchObserver,
) -> FetchOutcome {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        observer.attempt_started(feed, attempt);

        let error = match fetch_once(client, feed, policy.request_timeout).await {
            Ok(items) => {
                if items.is_empty() {
                    observer.feed_empty(feed);
                } else {
                    observer.feed_fetched(feed, items.len());
                }
                return FetchOutcome::Fetched(items);
            }
            Err(e) => e,
        };

        let will_retry = attempt < max_attempts && error.is_retryable();
        observer.attempt_failed(feed, attempt, &error, will_retry);

        if !will_retry {
            observer.retries_exhausted(feed, attempt, &error);
            return FetchOutcome::Exhausted {
                feed: feed.clone(),
                error,
            };
        }

        sleep(policy.retry_delay).await;
        attempt += 1;
    }
}

async fn fetch_once(
    client: &Client,
    feed: &FeedDescriptor,
    request_timeout: Duration,
) -> Result<Vec<NewsItem>> {
    let bytes = timeout(request_timeout, read_response(client, &feed.url))
        .await
        .map_err(|_| {
            Error::Timeout(format!(
                "request to {} exceeded {:?}",
                feed.url, request_timeout
            ))
        })??;

    parser::parse_items(&bytes, feed)
}

async fn read_response(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .map_err(|e| Error::Network(format!("request to {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            code: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Network(format!("failed to read body from {}: {}", url, e)))?;

    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
    <channel>
        <title>Test Feed</title>
        <link>https://example.com</link>
        <description>A test feed</description>
        <item>
            <title>Test Article</title>
            <link>https://example.com/article</link>
            <pubDate>Wed, 15 Mar 2024 10:00:00 GMT</pubDate>
            <description>Test article description</description>
        </item>
        <item>
            <title>Second Article</title>
            <link>https://example.com/second</link>
        </item>
    </channel>
</rss>"#;

    const EMPTY_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
    <channel>
        <title>Quiet Feed</title>
        <link>https://example.com</link>
        <description>Nothing today</description>
    </channel>
</rss>"#;

    fn feed(url: String) -> FeedDescriptor {
        FeedDescriptor {
            country: "United Kingdom".to_string(),
            source: "BBC".to_string(),
            url,
        }
    }

    fn quick_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            request_timeout: Duration::from_millis(250),
            retry_delay: Duration::from_millis(50),
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        attempts: AtomicU32,
        failures: AtomicU32,
        empty_feeds: AtomicU32,
        fetched_items: AtomicUsize,
        exhausted: Mutex<Option<String>>,
    }

    impl FetchObserver for RecordingObserver {
        fn attempt_started(&self, _feed: &FeedDescriptor, _attempt: u32) {
            self.attempts.fetch_add(1, Ordering::SeqCst);
        }

        fn attempt_failed(
            &self,
            _feed: &FeedDescriptor,
            _attempt: u32,
            _error: &Error,
            _will_retry: bool,
        ) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }

        fn feed_fetched(&self, _feed: &FeedDescriptor, item_count: usize) {
            self.fetched_items.fetch_add(item_count, Ordering::SeqCst);
        }

        fn feed_empty(&self, _feed: &FeedDescriptor) {
            self.empty_feeds.fetch_add(1, Ordering::SeqCst);
        }

        fn retries_exhausted(&self, _feed: &FeedDescriptor, _attempts: u32, error: &Error) {
            *self.exhausted.lock().unwrap() = Some(error.to_string());
        }
    }

    #[tokio::test]
    async fn test_successful_fetch_on_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let observer = RecordingObserver::default();
        let outcome = fetch_feed(
            &client,
            &feed(format!("{}/feed.xml", server.uri())),
            &quick_policy(3),
            &observer,
        )
        .await;

        match outcome {
            FetchOutcome::Fetched(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].title.as_deref(), Some("Test Article"));
                assert_eq!(items[0].source, "BBC");
                assert_eq!(items[1].title.as_deref(), Some("Second Article"));
            }
            FetchOutcome::Exhausted { error, .. } => panic!("unexpected failure: {}", error),
        }
        assert_eq!(observer.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(observer.failures.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_descriptive_user_agent_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let outcome = fetch_feed(
            &client,
            &feed(format!("{}/feed.xml", server.uri())),
            &quick_policy(1),
            &RecordingObserver::default(),
        )
        .await;

        assert!(matches!(outcome, FetchOutcome::Fetched(_)));
    }

    #[tokio::test]
    async fn test_empty_feed_is_success_and_consumes_no_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_RSS))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let observer = RecordingObserver::default();
        let outcome = fetch_feed(
            &client,
            &feed(format!("{}/feed.xml", server.uri())),
            &quick_policy(3),
            &observer,
        )
        .await;

        match outcome {
            FetchOutcome::Fetched(items) => assert!(items.is_empty()),
            FetchOutcome::Exhausted { error, .. } => panic!("unexpected failure: {}", error),
        }
        assert_eq!(observer.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(observer.empty_feeds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_http_error_exhausts_exactly_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = Client::new();
        let observer = RecordingObserver::default();
        let outcome = fetch_feed(
            &client,
            &feed(format!("{}/feed.xml", server.uri())),
            &quick_policy(3),
            &observer,
        )
        .await;

        match outcome {
            FetchOutcome::Exhausted { error, .. } => {
                assert!(matches!(error, Error::Status { code: 500, .. }));
                assert!(error.is_retryable());
            }
            FetchOutcome::Fetched(_) => panic!("expected exhaustion"),
        }
        assert_eq!(observer.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(observer.failures.load(Ordering::SeqCst), 3);
        assert!(observer.exhausted.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delay_separates_consecutive_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let policy = RetryPolicy {
            max_attempts: 3,
            request_timeout: Duration::from_millis(250),
            retry_delay: Duration::from_millis(100),
        };
        let client = Client::new();
        let started = Instant::now();
        let outcome = fetch_feed(
            &client,
            &feed(format!("{}/feed.xml", server.uri())),
            &policy,
            &RecordingObserver::default(),
        )
        .await;

        assert!(matches!(outcome, FetchOutcome::Exhausted { .. }));
        // two inter-attempt delays for three attempts
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_timeout_is_an_attempt_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let policy = RetryPolicy {
            max_attempts: 2,
            request_timeout: Duration::from_millis(100),
            retry_delay: Duration::from_millis(20),
        };
        let client = Client::new();
        let observer = RecordingObserver::default();
        let outcome = fetch_feed(
            &client,
            &feed(format!("{}/feed.xml", server.uri())),
            &policy,
            &observer,
        )
        .await;

        match outcome {
            FetchOutcome::Exhausted { error, .. } => {
                assert!(matches!(error, Error::Timeout(_)))
            }
            FetchOutcome::Fetched(_) => panic!("expected exhaustion"),
        }
        assert_eq!(observer.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_document_is_retried_like_a_network_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<rss><channel><item><title>Broken</description></channel>"),
            )
            .expect(3)
            .mount(&server)
            .await;

        let client = Client::new();
        let observer = RecordingObserver::default();
        let outcome = fetch_feed(
            &client,
            &feed(format!("{}/feed.xml", server.uri())),
            &quick_policy(3),
            &observer,
        )
        .await;

        match outcome {
            FetchOutcome::Exhausted { error, .. } => assert!(matches!(error, Error::Parse(_))),
            FetchOutcome::Fetched(_) => panic!("expected exhaustion"),
        }
        assert_eq!(observer.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_recovery_after_transient_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&server)
            .await;

        let client = Client::new();
        let observer = RecordingObserver::default();
        let outcome = fetch_feed(
            &client,
            &feed(format!("{}/feed.xml", server.uri())),
            &quick_policy(3),
            &observer,
        )
        .await;

        match outcome {
            FetchOutcome::Fetched(items) => assert_eq!(items.len(), 2),
            FetchOutcome::Exhausted { error, .. } => panic!("unexpected failure: {}", error),
        }
        assert_eq!(observer.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(observer.failures.load(Ordering::SeqCst), 2);
        assert!(observer.exhausted.lock().unwrap().is_none());
    }
}
