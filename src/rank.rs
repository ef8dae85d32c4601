// src/rank.rs
//! Ranking: the canonical top-N pool plus the grouped-by-category variant.
//!
//! Both orderings are deterministic. Top-N is a stable descending sort by
//! score, so ties keep encounter order; the grouped variant keeps catalog
//! declaration order and sorts only within a source.

use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::normalize::Entry;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RankMode {
    #[default]
    TopN,
    Grouped,
}

/// Remove exact duplicates, keyed by link when present, title otherwise.
/// First occurrence wins.
pub fn dedup_entries(entries: Vec<Entry>) -> Vec<Entry> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(entries.len());
    for e in entries {
        let key = if e.link.is_empty() {
            format!("t:{}", e.title)
        } else {
            format!("l:{}", e.link)
        };
        if seen.insert(key) {
            out.push(e);
        }
    }
    out
}

/// Stable descending sort by score, keeping the first `n`.
pub fn top_n(mut entries: Vec<Entry>, n: usize) -> Vec<Entry> {
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    entries.truncate(n);
    entries
}

/// Grouped-variant selection within one source: important entries first
/// (longer titles first among equals), then at most `max_minor` of the
/// rest. All important entries survive.
pub fn select_group(mut entries: Vec<Entry>, max_minor: usize) -> Vec<Entry> {
    entries.sort_by(|a, b| match b.important.cmp(&a.important) {
        Ordering::Equal => b.title.chars().count().cmp(&a.title.chars().count()),
        other => other,
    });
    let important = entries.iter().filter(|e| e.important).count();
    entries.truncate(important + max_minor);
    entries
}
