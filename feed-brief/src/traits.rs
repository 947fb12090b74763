use crate::types::{ArticleRecord, FeedEntry, Result};
use async_trait::async_trait;
use std::collections::HashSet;

/// Source of feed entries (RSS/Atom over HTTP in production).
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch and parse the whole feed. Failure here aborts the run.
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>>;
}

/// Turns an article URL into plain text.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// `Ok(None)` when the page yields no usable text.
    async fn fetch_text(&self, url: &str) -> Result<Option<String>>;
}

/// Durable record of processed entries.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Idempotent schema creation.
    async fn initialize(&self) -> Result<()>;

    async fn known_ids(&self) -> Result<HashSet<String>>;

    /// Upsert keyed by `record.id`; last write wins.
    async fn save(&self, record: &ArticleRecord) -> Result<()>;
}

/// Outbound delivery of a formatted brief.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, markdown: &str) -> Result<()>;
}
