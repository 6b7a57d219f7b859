//! JSON sink for the aggregated run.
//!
//! The whole collection is serialized once and written in a single call:
//! either the document lands complete or the run ends with a fatal error.
//! There is no partial-file recovery.
//!
//! # Output format
//!
//! A UTF-8 JSON array with 2-space indentation. Non-ASCII text is preserved
//! literally, and absent syndication fields appear as explicit `null`s.

use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::Result;
use crate::models::NewsItem;

/// Write the aggregate collection to `path` as a pretty-printed JSON array.
///
/// Creates the parent directory when needed. Any serialization or I/O
/// failure is fatal and propagated to the caller.
pub async fn write_items(items: &[NewsItem], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    fs::write(path, json).await?;
    info!(path = %path.display(), count = items.len(), "Wrote aggregated news document");

    Ok(())
}
