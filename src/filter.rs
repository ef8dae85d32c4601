// src/filter.rs
//! Blocklist filter: hard exclusion of recruitment, promotion and event
//! noise. Matching runs on the ORIGINAL title so it works even when
//! translation failed or was skipped. No soft-filter state.

use crate::normalize::Entry;

/// True when any blocklist keyword occurs case-insensitively as a
/// substring of `title`.
pub fn is_blocked(title: &str, blocklist: &[String]) -> bool {
    let t = title.to_lowercase();
    blocklist.iter().any(|kw| {
        let k = kw.to_lowercase();
        !k.is_empty() && t.contains(&k)
    })
}

/// Drop blocked entries; returns survivors plus the dropped count.
pub fn retain_clean(entries: Vec<Entry>, blocklist: &[String]) -> (Vec<Entry>, usize) {
    let before = entries.len();
    let kept: Vec<Entry> = entries
        .into_iter()
        .filter(|e| !is_blocked(&e.title, blocklist))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
