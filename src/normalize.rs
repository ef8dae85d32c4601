// src/normalize.rs
//! Entry normalization: untrusted `RawEntry` + `Source` → canonical `Entry`
//! skeleton (score and importance are assigned later).

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::catalog::Source;
use crate::ingest::types::RawEntry;

/// Placeholder for feeds that ship items without a title.
pub const MISSING_TITLE: &str = "无标题";

/// Marker appended to truncated summaries.
pub const TRUNCATION_MARKER: &str = "...";

/// One normalized article item flowing through the pipeline.
///
/// Invariants: `title` is never empty; `translated_title` equals `title`
/// until the translator runs and is never empty while `title` is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub title: String,
    pub translated_title: String,
    pub link: String,
    pub summary: String,
    pub category: String,
    pub source_name: String,
    pub score: f32,
    pub important: bool,
}

/// Decode HTML/XML entities, strip tags, collapse whitespace.
pub fn clean_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

fn truncate_summary(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push_str(TRUNCATION_MARKER);
        out
    } else {
        s.to_string()
    }
}

/// Build an Entry skeleton from one raw item.
pub fn normalize_entry(
    raw: RawEntry,
    category: &str,
    source: &Source,
    summary_max_chars: usize,
) -> Entry {
    let title = raw
        .title
        .as_deref()
        .map(clean_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| MISSING_TITLE.to_string());

    let link = raw
        .link
        .map(|l| l.trim().to_string())
        .unwrap_or_default();

    let summary = raw
        .summary
        .as_deref()
        .map(clean_text)
        .map(|s| truncate_summary(&s, summary_max_chars))
        .unwrap_or_default();

    Entry {
        translated_title: title.clone(),
        title,
        link,
        summary,
        category: category.to_string(),
        source_name: source.name.clone(),
        score: 0.0,
        important: false,
    }
}
