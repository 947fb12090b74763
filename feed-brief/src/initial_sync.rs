use crate::types::FeedEntry;
use tracing::debug;

/// Result of splitting the unseen entries of a cold store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialSyncBatches {
    pub to_summarize: Vec<FeedEntry>,
    pub to_archive: Vec<FeedEntry>,
}

/// Choose which entries get summarized on the very first run.
///
/// With `limit == 0` nothing is summarized and the archive batch keeps feed
/// order. Otherwise entries are ordered newest first (stable, so equal
/// timestamps keep feed order), the first `limit` are summarized and the
/// rest archived in that same order, so feed order is not preserved when
/// `limit > 0`.
pub fn split(entries: Vec<FeedEntry>, limit: usize) -> InitialSyncBatches {
    if limit == 0 {
        return InitialSyncBatches {
            to_summarize: Vec::new(),
            to_archive: entries,
        };
    }

    let mut sorted = entries;
    sorted.sort_by(|a, b| b.published.cmp(&a.published));

    let to_archive = if sorted.len() > limit {
        sorted.split_off(limit)
    } else {
        Vec::new()
    };

    debug!(
        "Initial sync split: {} to summarize, {} to archive",
        sorted.len(),
        to_archive.len()
    );

    InitialSyncBatches {
        to_summarize: sorted,
        to_archive,
    }
}
