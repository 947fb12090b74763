use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single item of the watched feed. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
}

impl FeedEntry {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
        published: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            link: link.into(),
            published,
        }
    }
}

/// Persisted form of a processed entry.
///
/// `summary == None` means the entry was archived during the initial sync
/// without ever being summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: String,
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub category: Option<String>,
    pub summary: Option<String>,
}

impl ArticleRecord {
    pub fn archived(entry: &FeedEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            link: entry.link.clone(),
            published: entry.published,
            category: None,
            summary: None,
        }
    }

    pub fn summarized(entry: &FeedEntry, category: &str, summary: &str) -> Self {
        Self {
            category: Some(category.to_string()).filter(|c| !c.is_empty()),
            summary: Some(summary.to_string()),
            ..Self::archived(entry)
        }
    }

    pub fn is_archived_only(&self) -> bool {
        self.summary.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub article_timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Feed-Brief/1.0".to_string(),
            timeout_seconds: 30,
            article_timeout_seconds: 20,
            max_retries: 2,
            retry_delay_seconds: 1,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BriefError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider {provider} returned no result: {reason}")]
    Provider { provider: String, reason: String },

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("General error: {0}")]
    General(String),
}

impl BriefError {
    pub fn provider(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BriefError>;
