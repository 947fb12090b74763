use crate::traits::FeedSource;
use crate::types::{BriefError, FeedEntry, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::info;

/// A single RSS/Atom feed fetched over HTTP.
pub struct RssFeedSource {
    pub url: String,
    fetcher: Fetcher,
}

impl RssFeedSource {
    pub fn new(url: impl Into<String>, fetcher: Fetcher) -> Self {
        Self {
            url: url.into(),
            fetcher,
        }
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    fn source_name(&self) -> String {
        if let Ok(parsed) = url::Url::parse(&self.url) {
            if let Some(domain) = parsed.domain() {
                return format!("RSS Feed ({})", domain);
            }
        }
        "RSS Feed".to_string()
    }

    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        info!("Pulling RSS feed: {}", self.url);

        let content = self.fetcher.fetch_feed(&self.url).await?;
        if !FeedParser::is_valid_feed_content(&content) {
            return Err(BriefError::Parse(format!(
                "{} did not return an RSS/Atom document",
                self.url
            )));
        }

        let entries = FeedParser::parse_feed(&content)?;
        info!("Pulled {} entries from {}", entries.len(), self.source_name());
        Ok(entries)
    }
}
