// src/ingest/rss.rs
//! Feed collaborator: HTTP fetch plus RSS 2.0 / Atom parsing.
//!
//! The catalog mixes both formats, so parsing tries RSS first and falls
//! back to Atom. Fixture mode skips HTTP entirely for tests and demos.

use async_trait::async_trait;
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;

use super::types::{FeedFetcher, FetchError, RawEntry};
use crate::catalog::Source;
use crate::config::FetchSettings;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Atom {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    summary: Option<AtomText>,
}

// Atom text constructs carry a `type` attribute, so a plain String field
// would not deserialize.
#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

fn rss_entry(item: Item) -> RawEntry {
    RawEntry {
        title: item.title,
        link: item.link,
        // RSS feeds disagree on the summary element name.
        summary: item.description.or(item.summary),
    }
}

fn atom_entry(entry: AtomEntry) -> RawEntry {
    // Prefer the alternate link; fall back to the first one with an href.
    let link = entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .and_then(|l| l.href.clone());
    RawEntry {
        title: entry.title.and_then(|t| t.value),
        link,
        summary: entry.summary.and_then(|t| t.value),
    }
}

/// Parse one feed document, trying RSS 2.0 then Atom.
pub fn parse_feed(xml: &str) -> Result<Vec<RawEntry>, FetchError> {
    let clean = scrub_html_entities_for_xml(xml);

    match from_str::<Rss>(&clean) {
        Ok(rss) => Ok(rss.channel.items.into_iter().map(rss_entry).collect()),
        Err(rss_err) => match from_str::<Atom>(&clean) {
            Ok(feed) if !feed.entries.is_empty() || clean.contains("<feed") => {
                Ok(feed.entries.into_iter().map(atom_entry).collect())
            }
            _ => Err(FetchError::Parse(rss_err.to_string())),
        },
    }
}

// Feeds routinely embed HTML entities that are not valid XML entities.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

pub struct RssClient {
    mode: Mode,
}

enum Mode {
    Http { client: reqwest::Client },
    Fixture(String),
}

impl RssClient {
    pub fn new(settings: &FetchSettings) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()
            .expect("reqwest client");
        Self {
            mode: Mode::Http { client },
        }
    }

    /// Parse a fixed XML document instead of going to the network.
    pub fn from_fixture(xml: &str) -> Self {
        Self {
            mode: Mode::Fixture(xml.to_string()),
        }
    }
}

#[async_trait]
impl FeedFetcher for RssClient {
    async fn fetch(&self, source: &Source) -> Result<Vec<RawEntry>, FetchError> {
        let body = match &self.mode {
            Mode::Fixture(xml) => xml.clone(),
            Mode::Http { client } => {
                let rsp = client.get(&source.url).send().await?;
                rsp.error_for_status()?.text().await?
            }
        };

        let t0 = std::time::Instant::now();
        let entries = parse_feed(&body)?;
        histogram!("briefing_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(entries)
    }

    fn name(&self) -> &'static str {
        "rss"
    }
}
