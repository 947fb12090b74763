use crate::types::FeedEntry;
use std::collections::HashSet;
use tracing::debug;

/// Entries whose id is not in `known_ids`, in feed order.
///
/// Repeated ids inside one feed response are kept as-is; only the
/// known-id filter is applied.
pub fn diff(entries: &[FeedEntry], known_ids: &HashSet<String>) -> Vec<FeedEntry> {
    let unseen: Vec<FeedEntry> = entries
        .iter()
        .filter(|entry| !known_ids.contains(&entry.id))
        .cloned()
        .collect();

    debug!(
        "Diffed {} entries against {} known ids: {} unseen",
        entries.len(),
        known_ids.len(),
        unseen.len()
    );
    unseen
}
