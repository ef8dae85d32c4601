// src/score.rs
//! Additive importance heuristic for headlines.
//!
//! Cheap by design: the goal is relative ranking for a daily digest, not
//! precision classification. Keyword hits dominate; the length bonus
//! separates otherwise-unscored headlines.

/// Scoring result. `value` is non-negative and deterministic for a given
/// pair of titles; the raw number is exposed for testability only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Score {
    pub value: f32,
    pub keyword_hits: usize,
}

impl Score {
    /// An entry is "important" when at least one keyword matched, i.e. the
    /// score is above the pure length bonus.
    pub fn important(&self) -> bool {
        self.keyword_hits > 0
    }
}

/// True when any keyword occurs case-insensitively as a substring of either
/// title. Also drives the AI-topic split on the summary line.
pub fn matches_any(title: &str, translated: &str, keywords: &[String]) -> bool {
    let t = title.to_lowercase();
    let tr = translated.to_lowercase();
    keywords.iter().any(|kw| {
        let k = kw.to_lowercase();
        !k.is_empty() && (t.contains(&k) || tr.contains(&k))
    })
}

/// Score a headline from its original and translated titles.
///
/// Each keyword occurring case-insensitively as a substring of either title
/// adds `weight`; duplicate list entries count again. The length bonus is
/// `title_chars / 10`.
pub fn score_title(title: &str, translated: &str, keywords: &[String], weight: f32) -> Score {
    let t = title.to_lowercase();
    let tr = translated.to_lowercase();

    let mut hits = 0usize;
    for kw in keywords {
        let k = kw.to_lowercase();
        if k.is_empty() {
            continue;
        }
        if t.contains(&k) || tr.contains(&k) {
            hits += 1;
        }
    }

    let value = weight * hits as f32 + title.chars().count() as f32 / 10.0;
    Score {
        value,
        keyword_hits: hits,
    }
}
