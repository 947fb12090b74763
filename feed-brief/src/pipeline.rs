use crate::differ;
use crate::initial_sync;
use crate::notifier::format_message;
use crate::summarizer::Summarizer;
use crate::traits::{ArticleSource, ArticleStore, FeedSource, Notifier};
use crate::types::{ArticleRecord, FeedEntry, Result};
use tracing::{error, info, warn};

/// Counters describing one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub fetched: usize,
    pub unseen: usize,
    pub archived: usize,
    pub summarized: usize,
    pub skipped: usize,
    pub notified: usize,
    pub notify_failed: usize,
    pub save_failed: usize,
}

/// Feed -> diff -> initial-sync split -> summarize -> persist -> notify.
///
/// Entries are handled one at a time. Only storage initialization, loading
/// known ids and fetching the feed can fail the run; everything after that
/// is logged per entry.
pub struct IngestionPipeline {
    feed: Box<dyn FeedSource>,
    articles: Box<dyn ArticleSource>,
    store: Box<dyn ArticleStore>,
    notifier: Box<dyn Notifier>,
    summarizer: Summarizer,
    initial_summary_limit: usize,
}

impl IngestionPipeline {
    pub fn new(
        feed: Box<dyn FeedSource>,
        articles: Box<dyn ArticleSource>,
        store: Box<dyn ArticleStore>,
        notifier: Box<dyn Notifier>,
        summarizer: Summarizer,
        initial_summary_limit: usize,
    ) -> Self {
        Self {
            feed,
            articles,
            store,
            notifier,
            summarizer,
            initial_summary_limit,
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();

        self.store.initialize().await?;

        let entries = self.feed.fetch_entries().await?;
        report.fetched = entries.len();

        let known_ids = self.store.known_ids().await?;
        let unseen = differ::diff(&entries, &known_ids);
        report.unseen = unseen.len();
        info!("Found {} new entries out of {}", unseen.len(), entries.len());

        let to_process = if known_ids.is_empty() && !unseen.is_empty() {
            let batches = initial_sync::split(unseen, self.initial_summary_limit);
            info!(
                "Cold start: summarizing {} most recent entries, archiving {}",
                batches.to_summarize.len(),
                batches.to_archive.len()
            );

            for entry in &batches.to_archive {
                match self.store.save(&ArticleRecord::archived(entry)).await {
                    Ok(()) => report.archived += 1,
                    Err(e) => {
                        error!("Failed to archive {}: {}", entry.link, e);
                        report.save_failed += 1;
                    }
                }
            }
            batches.to_summarize
        } else {
            unseen
        };

        for entry in &to_process {
            self.process_entry(entry, &mut report).await;
        }

        info!("Run finished: {:?}", report);
        Ok(report)
    }

    async fn process_entry(&self, entry: &FeedEntry, report: &mut RunReport) {
        info!("Processing entry: {}", entry.title);

        let content = match self.articles.fetch_text(&entry.link).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                warn!("Skipping {} due to missing content", entry.link);
                report.skipped += 1;
                return;
            }
            Err(e) => {
                warn!("Skipping {}: {}", entry.link, e);
                report.skipped += 1;
                return;
            }
        };

        let brief = self.summarizer.summarize(&entry.title, &content).await;
        let record = ArticleRecord::summarized(entry, &brief.category, &brief.summary);

        if let Err(e) = self.store.save(&record).await {
            error!("Failed to save {}: {}", entry.link, e);
            report.save_failed += 1;
            return;
        }
        report.summarized += 1;

        let message = format_message(&entry.title, &brief, &entry.link);
        match self.notifier.notify(&message).await {
            Ok(()) => report.notified += 1,
            Err(e) => {
                error!("Failed to send notification for {}: {}", entry.link, e);
                report.notify_failed += 1;
            }
        }
    }
}
