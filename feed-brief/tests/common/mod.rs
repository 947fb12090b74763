#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use feed_brief::types::{ArticleRecord, BriefError, FeedEntry, Result};
use feed_brief::{ArticleSource, ArticleStore, FeedSource, Notifier};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .try_init()
            .ok();
    });
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

pub fn entry(id: &str, published: DateTime<Utc>) -> FeedEntry {
    FeedEntry::new(
        id,
        format!("Post {}", id),
        format!("https://blog.example.com/{}", id),
        published,
    )
}

pub fn ids(entries: &[FeedEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

pub struct StaticFeed {
    pub entries: Vec<FeedEntry>,
}

#[async_trait]
impl FeedSource for StaticFeed {
    fn source_name(&self) -> String {
        "static feed".to_string()
    }

    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        Ok(self.entries.clone())
    }
}

pub struct FailingFeed;

#[async_trait]
impl FeedSource for FailingFeed {
    fn source_name(&self) -> String {
        "failing feed".to_string()
    }

    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        Err(BriefError::General("feed unreachable".to_string()))
    }
}

/// Returns the same text for every URL except those listed in `empty`.
pub struct StaticArticles {
    pub text: String,
    pub empty: HashSet<String>,
}

impl StaticArticles {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            empty: HashSet::new(),
        }
    }
}

#[async_trait]
impl ArticleSource for StaticArticles {
    async fn fetch_text(&self, url: &str) -> Result<Option<String>> {
        if self.empty.contains(url) {
            Ok(None)
        } else {
            Ok(Some(self.text.clone()))
        }
    }
}

/// Shared journal so tests can check ordering between saves and notifications.
#[derive(Clone, Default)]
pub struct Journal {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub rows: Arc<Mutex<HashMap<String, ArticleRecord>>>,
    pub writes: Arc<Mutex<usize>>,
    pub journal: Journal,
    /// Saves for these ids fail with a database-style error.
    pub failing_ids: HashSet<String>,
}

impl MemoryStore {
    pub fn with_ids(ids: &[&str]) -> Self {
        let store = Self::default();
        {
            let mut rows = store.rows.lock().unwrap();
            for id in ids {
                rows.insert(id.to_string(), ArticleRecord::archived(&entry(id, at(1, 0))));
            }
        }
        store
    }

    pub fn row(&self, id: &str) -> Option<ArticleRecord> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn known_ids(&self) -> Result<HashSet<String>> {
        Ok(self.rows.lock().unwrap().keys().cloned().collect())
    }

    async fn save(&self, record: &ArticleRecord) -> Result<()> {
        if self.failing_ids.contains(&record.id) {
            self.journal.push(format!("save-failed:{}", record.id));
            return Err(BriefError::General(format!("disk full while saving {}", record.id)));
        }
        self.rows
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        *self.writes.lock().unwrap() += 1;
        self.journal.push(format!("save:{}", record.id));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
    pub journal: Journal,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, markdown: &str) -> Result<()> {
        self.messages.lock().unwrap().push(markdown.to_string());
        self.journal.push("notify".to_string());
        if self.fail {
            Err(BriefError::Notification("webhook answered 500".to_string()))
        } else {
            Ok(())
        }
    }
}
