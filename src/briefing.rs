// src/briefing.rs
//! The briefing document: structured sections built once per run, rendered
//! to text once. Formatting stays separate from scoring and ranking so both
//! sides test in isolation.

use chrono::{DateTime, Local};

use crate::normalize::Entry;
use crate::score::matches_any;

/// Visual section delimiter. A presentation detail, but kept stable so
/// chunked messages still read as one document.
pub const SECTION_DELIMITER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━";

/// The final rendered digest for one run. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Briefing {
    pub header: String,
    pub summary: Option<String>,
    pub body: Vec<String>,
    pub footer: String,
    pub total_count: usize,
    pub important_count: usize,
}

impl Briefing {
    /// Render the whole document. Builders own the section layout; this
    /// only joins header, optional summary, body lines and footer.
    pub fn render(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.body.len() + 5);
        parts.push(&self.header);
        parts.push("");
        if let Some(summary) = &self.summary {
            parts.push(summary);
            parts.push("");
        }
        for line in &self.body {
            parts.push(line);
        }
        parts.push(&self.footer);
        parts.join("\n")
    }
}

/// Grouped-variant input: one source's survivors, or its fetch error.
#[derive(Debug)]
pub struct SourceSection {
    pub name: String,
    pub entries: Vec<Entry>,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct CategorySection {
    pub name: String,
    pub sources: Vec<SourceSection>,
}

fn header_line(now: DateTime<Local>) -> String {
    format!("📰 每日简报 - {}", now.format("%Y年%m月%d日"))
}

fn footer_lines(total: usize, important: usize, now: DateTime<Local>) -> String {
    format!(
        "{SECTION_DELIMITER}\n共收集 {total} 条资讯，其中重点 {important} 条\n生成时间: {}",
        now.format("%H:%M:%S")
    )
}

fn push_entry_detail(body: &mut Vec<String>, entry: &Entry, indent: &str) {
    if entry.translated_title != entry.title {
        body.push(format!("{indent}译: {}", entry.translated_title));
    }
    if !entry.link.is_empty() {
        body.push(format!("{indent}{}", entry.link));
    }
}

/// Canonical presentation: one ranked list across all categories.
pub fn build_top_n(entries: &[Entry], ai_keywords: &[String], now: DateTime<Local>) -> Briefing {
    let total = entries.len();
    let important = entries.iter().filter(|e| e.important).count();
    let ai = entries
        .iter()
        .filter(|e| matches_any(&e.title, &e.translated_title, ai_keywords))
        .count();

    let mut body = Vec::new();
    body.push(SECTION_DELIMITER.to_string());
    for (i, entry) in entries.iter().enumerate() {
        let marker = if entry.important { "🔥 " } else { "" };
        body.push(format!(
            "{}. {marker}[{} · {}] {}",
            i + 1,
            entry.category,
            entry.source_name,
            entry.title
        ));
        push_entry_detail(&mut body, entry, "   ");
    }

    Briefing {
        header: header_line(now),
        summary: Some(format!("🤖 AI要闻 {ai} 条 · 其他 {} 条", total - ai)),
        body,
        footer: footer_lines(total, important, now),
        total_count: total,
        important_count: important,
    }
}

/// Grouped presentation: categories and sources in catalog order, failed
/// sources rendered inline.
pub fn build_grouped(sections: &[CategorySection], now: DateTime<Local>) -> Briefing {
    let mut body = Vec::new();
    let mut total = 0usize;
    let mut important = 0usize;

    for category in sections {
        body.push(SECTION_DELIMITER.to_string());
        body.push(format!("📂 {}", category.name));
        body.push(SECTION_DELIMITER.to_string());
        body.push(String::new());

        for source in &category.sources {
            if let Some(err) = &source.error {
                body.push(format!("❌ {}: {err}", source.name));
                body.push(String::new());
                continue;
            }
            if source.entries.is_empty() {
                continue;
            }
            body.push(format!("🔹 {}", source.name));
            for entry in &source.entries {
                let marker = if entry.important { "🔥 " } else { "" };
                body.push(format!("  • {marker}{}", entry.title));
                push_entry_detail(&mut body, entry, "    ");
                total += 1;
                if entry.important {
                    important += 1;
                }
            }
            body.push(String::new());
        }
    }

    Briefing {
        header: header_line(now),
        summary: None,
        body,
        footer: footer_lines(total, important, now),
        total_count: total,
        important_count: important,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 7, 8, 15, 3).unwrap()
    }

    fn entry(title: &str, translated: &str, important: bool) -> Entry {
        Entry {
            title: title.to_string(),
            translated_title: translated.to_string(),
            link: format!("https://example.test/{}", title.len()),
            summary: String::new(),
            category: "技术资讯".to_string(),
            source_name: "Hacker News".to_string(),
            score: 0.0,
            important,
        }
    }

    #[test]
    fn top_n_layout_and_counts() {
        let ai_keywords = vec!["GPT".to_string()];
        let entries = vec![
            entry("OpenAI ships GPT-5", "OpenAI 发布 GPT-5", true),
            entry("平平无奇的新闻", "平平无奇的新闻", false),
        ];
        let briefing = build_top_n(&entries, &ai_keywords, at());
        assert_eq!(briefing.total_count, 2);
        assert_eq!(briefing.important_count, 1);

        let text = briefing.render();
        assert!(text.starts_with("📰 每日简报 - 2026年08月07日"));
        assert!(text.contains("🤖 AI要闻 1 条 · 其他 1 条"));
        assert!(text.contains("1. 🔥 [技术资讯 · Hacker News] OpenAI ships GPT-5"));
        assert!(text.contains("译: OpenAI 发布 GPT-5"));
        assert!(text.contains("2. [技术资讯 · Hacker News] 平平无奇的新闻"));
        assert!(text.contains("共收集 2 条资讯，其中重点 1 条"));
        assert!(text.contains("生成时间: 08:15:03"));
    }

    #[test]
    fn translated_line_only_when_it_differs() {
        let briefing = build_top_n(&[entry("同一个标题", "同一个标题", false)], &[], at());
        assert!(!briefing.render().contains("译:"));
    }

    #[test]
    fn grouped_layout_renders_errors_and_skips_empty_sources() {
        let sections = vec![CategorySection {
            name: "技术资讯".to_string(),
            sources: vec![
                SourceSection {
                    name: "Hacker News".to_string(),
                    entries: vec![entry("Story", "故事", true)],
                    error: None,
                },
                SourceSection {
                    name: "极客公园".to_string(),
                    entries: vec![],
                    error: Some("timed out after 10s".to_string()),
                },
                SourceSection {
                    name: "36氪".to_string(),
                    entries: vec![],
                    error: None,
                },
            ],
        }];
        let briefing = build_grouped(&sections, at());
        let text = briefing.render();
        assert!(text.contains("📂 技术资讯"));
        assert!(text.contains("🔹 Hacker News"));
        assert!(text.contains("  • 🔥 Story"));
        assert!(text.contains("❌ 极客公园: timed out after 10s"));
        assert!(!text.contains("36氪"));
        assert_eq!(briefing.total_count, 1);
        assert_eq!(briefing.important_count, 1);
    }

    #[test]
    fn render_is_deterministic() {
        let entries = vec![entry("a", "a", false)];
        let b1 = build_top_n(&entries, &[], at()).render();
        let b2 = build_top_n(&entries, &[], at()).render();
        assert_eq!(b1, b2);
    }
}
