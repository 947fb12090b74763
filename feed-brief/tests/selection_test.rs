mod common;

use common::{at, entry, ids, init_tracing};
use feed_brief::differ::diff;
use feed_brief::initial_sync::split;
use std::collections::HashSet;

fn known(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn test_diff_filters_known_ids_and_keeps_feed_order() {
    init_tracing();

    let entries = vec![
        entry("c", at(3, 0)),
        entry("a", at(1, 0)),
        entry("d", at(4, 0)),
        entry("b", at(2, 0)),
    ];

    let unseen = diff(&entries, &known(&["a", "b"]));
    assert_eq!(ids(&unseen), vec!["c", "d"]);
}

#[test]
fn test_diff_with_empty_known_set_returns_everything() {
    let entries = vec![entry("x", at(1, 0)), entry("y", at(2, 0))];
    assert_eq!(diff(&entries, &HashSet::new()), entries);
}

#[test]
fn test_diff_all_known_returns_nothing() {
    let entries = vec![entry("x", at(1, 0))];
    assert!(diff(&entries, &known(&["x"])).is_empty());
}

#[test]
fn test_diff_keeps_repeated_ids_from_one_response() {
    let entries = vec![
        entry("dup", at(1, 0)),
        entry("other", at(2, 0)),
        entry("dup", at(3, 0)),
    ];

    let unseen = diff(&entries, &HashSet::new());
    assert_eq!(ids(&unseen), vec!["dup", "other", "dup"]);
}

#[test]
fn test_split_with_zero_limit_archives_everything_in_feed_order() {
    let entries = vec![entry("old", at(1, 0)), entry("new", at(9, 0)), entry("mid", at(5, 0))];

    let batches = split(entries.clone(), 0);
    assert!(batches.to_summarize.is_empty());
    assert_eq!(batches.to_archive, entries);
}

#[test]
fn test_split_picks_most_recent_entries() {
    let entries = vec![entry("old", at(1, 0)), entry("new", at(9, 0)), entry("mid", at(5, 0))];

    let batches = split(entries, 2);
    assert_eq!(ids(&batches.to_summarize), vec!["new", "mid"]);
    assert_eq!(ids(&batches.to_archive), vec!["old"]);
}

#[test]
fn test_split_archive_batch_is_sorted_newest_first() {
    let entries = vec![
        entry("a", at(1, 0)),
        entry("b", at(2, 0)),
        entry("c", at(3, 0)),
        entry("d", at(4, 0)),
    ];

    let batches = split(entries, 1);
    assert_eq!(ids(&batches.to_summarize), vec!["d"]);
    assert_eq!(ids(&batches.to_archive), vec!["c", "b", "a"]);
}

#[test]
fn test_split_limit_larger_than_input_leaves_archive_empty() {
    let entries = vec![entry("a", at(1, 0)), entry("b", at(2, 0))];

    let batches = split(entries, 5);
    assert_eq!(ids(&batches.to_summarize), vec!["b", "a"]);
    assert!(batches.to_archive.is_empty());
}

#[test]
fn test_split_ties_keep_input_order() {
    let entries = vec![
        entry("first", at(2, 0)),
        entry("second", at(2, 0)),
        entry("third", at(2, 0)),
        entry("older", at(1, 0)),
    ];

    let batches = split(entries, 2);
    assert_eq!(ids(&batches.to_summarize), vec!["first", "second"]);
    assert_eq!(ids(&batches.to_archive), vec!["third", "older"]);
}

#[test]
fn test_split_partitions_input_exactly() {
    let entries: Vec<_> = (0..7u32)
        .map(|i| entry(&format!("e{}", i), at(1 + (i * 5) % 7, i)))
        .collect();

    for limit in 0..=8 {
        let batches = split(entries.clone(), limit);
        assert_eq!(batches.to_summarize.len(), limit.min(entries.len()));

        let mut all: Vec<&str> = ids(&batches.to_summarize);
        all.extend(ids(&batches.to_archive));
        all.sort();

        let mut expected = ids(&entries);
        expected.sort();
        assert_eq!(all, expected, "limit {}", limit);
    }
}

#[test]
fn test_split_empty_input() {
    let batches = split(Vec::new(), 3);
    assert!(batches.to_summarize.is_empty());
    assert!(batches.to_archive.is_empty());
}
