//! The feed catalog: a built-in list of world news sources, optionally
//! replaced by a YAML file at startup.
//!
//! Every endpoint is validated before any network work so a typo in a
//! catalog file fails the run immediately rather than burning retries.

use once_cell::sync::Lazy;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::FeedDescriptor;

/// (country, source, endpoint) triples for the default world-news run.
const DEFAULT_FEEDS: &[(&str, &str, &str)] = &[
    ("United Kingdom", "BBC", "http://feeds.bbci.co.uk/news/rss.xml"),
    ("United States", "CNN", "http://rss.cnn.com/rss/edition.rss"),
    ("Qatar", "Al Jazeera", "https://www.aljazeera.com/xml/rss/all.xml"),
    ("Japan", "NHK", "https://www3.nhk.or.jp/rss/news/cat0.xml"),
    (
        "India",
        "The Hindu",
        "https://www.thehindu.com/news/national/feeder/default.rss",
    ),
    (
        "Singapore",
        "CNA",
        "https://www.channelnewsasia.com/rssfeeds/8395986",
    ),
    (
        "Malaysia",
        "The Star",
        "https://www.thestar.com.my/rss/editors-pick",
    ),
    ("Indonesia", "Kompas", "https://rss.kompas.com/"),
    (
        "South Korea",
        "Korea Times",
        "https://www.koreatimes.co.kr/www/rss/rss.xml",
    ),
    (
        "China",
        "China Daily",
        "https://www.chinadaily.com.cn/rss/china_rss.xml",
    ),
    ("Germany", "DW", "https://rss.dw.com/rdf/rss-en-all"),
    ("France", "France 24", "https://www.france24.com/en/rss"),
    ("Canada", "CBC", "https://www.cbc.ca/cmlink/rss-topstories"),
    (
        "Australia",
        "ABC",
        "https://www.abc.net.au/news/feed/51120/rss.xml",
    ),
    (
        "Brazil",
        "Folha de S.Paulo",
        "https://feeds.folha.uol.com.br/emcimadahora/rss091.xml",
    ),
    ("Russia", "RT", "https://www.rt.com/rss/news/"),
    (
        "Mexico",
        "El Universal",
        "https://archivo.eluniversal.com.mx/rss/portada.xml",
    ),
    ("South Africa", "News24", "https://www.news24.com/rss"),
    (
        "Turkey",
        "Hurriyet Daily News",
        "https://www.hurriyetdailynews.com/rss",
    ),
    ("Italy", "ANSA", "https://www.ansa.it/sito/ansait_rss.xml"),
    (
        "Spain",
        "El País",
        "https://feeds.elpais.com/mrss-s/pages/ep/site/elpais.com/portada",
    ),
];

static DEFAULT_CATALOG: Lazy<Vec<FeedDescriptor>> = Lazy::new(|| {
    DEFAULT_FEEDS
        .iter()
        .map(|(country, source, url)| FeedDescriptor {
            country: (*country).to_string(),
            source: (*source).to_string(),
            url: (*url).to_string(),
        })
        .collect()
});

/// The built-in catalog.
pub fn default_catalog() -> Vec<FeedDescriptor> {
    DEFAULT_CATALOG.clone()
}

/// Load the catalog, either from a YAML sequence of descriptors or the
/// built-in default, and validate every endpoint URL.
pub async fn load_catalog(path: Option<&Path>) -> Result<Vec<FeedDescriptor>> {
    let feeds = match path {
        Some(p) => {
            let raw = fs::read_to_string(p).await.map_err(|e| {
                Error::Catalog(format!("cannot read catalog file {}: {}", p.display(), e))
            })?;
            let feeds: Vec<FeedDescriptor> = serde_yaml::from_str(&raw).map_err(|e| {
                Error::Catalog(format!("invalid catalog file {}: {}", p.display(), e))
            })?;
            debug!(path = %p.display(), count = feeds.len(), "Loaded catalog file");
            feeds
        }
        None => default_catalog(),
    };

    for feed in &feeds {
        validate_feed_url(&feed.url)?;
    }

    Ok(feeds)
}

fn validate_feed_url(raw: &str) -> Result<()> {
    let parsed =
        url::Url::parse(raw).map_err(|e| Error::Catalog(format!("invalid URL {}: {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Catalog(format!(
            "unsupported scheme '{}' in {}",
            other, raw
        ))),
    }
}
