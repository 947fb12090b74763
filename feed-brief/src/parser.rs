use crate::types::{BriefError, FeedEntry, Result};
use chrono::Utc;
use feed_rs::parser;
use tracing::{debug, info};

pub struct FeedParser;

impl FeedParser {
    /// Parse an RSS/Atom document into entries, keeping feed order.
    pub fn parse_feed(content: &str) -> Result<Vec<FeedEntry>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| BriefError::Parse(format!("Failed to parse feed: {}", e)))?;

        let entries: Vec<FeedEntry> = feed
            .entries
            .into_iter()
            .filter_map(Self::parse_entry)
            .collect();

        info!("Parsed feed with {} entries", entries.len());
        Ok(entries)
    }

    fn parse_entry(entry: feed_rs::model::Entry) -> Option<FeedEntry> {
        let link = match entry.links.first() {
            Some(link) => link.href.clone(),
            None => {
                debug!("Skipping entry without link: {}", entry.id);
                return None;
            }
        };

        let id = if entry.id.trim().is_empty() {
            link.clone()
        } else {
            entry.id
        };

        let title = entry
            .title
            .map(|t| t.content.trim().to_string())
            .unwrap_or_else(|| "Untitled".to_string());

        let published = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Some(FeedEntry {
            id,
            title,
            link,
            published,
        })
    }

    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();
        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<channel")
    }
}
