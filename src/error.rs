use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while loading the catalog, fetching feeds, and writing
/// the output document.
///
/// The retryable variants are uniform: the fetch unit treats a
/// refused connection, a timed-out request, a 500, and a malformed document
/// the same way and simply tries again until its attempt budget is spent.
/// Everything else is fatal to the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timeout: {0}")]
    Timeout(String),

    #[error("HTTP {code} from {url}")]
    Status { code: u16, url: String },

    #[error("feed parsing error: {0}")]
    Parse(String),

    #[error("failed to build HTTP client: {0}")]
    ClientInit(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write output document: {0}")]
    SinkWrite(#[from] std::io::Error),
}

impl Error {
    /// Whether a fetch unit may try again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Timeout(_) | Error::Status { .. } | Error::Parse(_)
        )
    }
}
