// src/ingest/types.rs
use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::Source;

/// Untrusted collaborator output: may be empty, malformed, or oversized.
/// Nothing downstream relies on invariants here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("cancelled by run deadline")]
    Cancelled,
}

/// Per-source result. `Err` is distinct from `Ok(vec![])`: a failed fetch
/// and an empty feed render differently and count differently.
#[derive(Debug)]
pub struct FetchOutcome {
    pub category: String,
    pub source: Source,
    pub result: Result<Vec<RawEntry>, FetchError>,
}

impl FetchOutcome {
    pub fn entries(&self) -> &[RawEntry] {
        match &self.result {
            Ok(v) => v,
            Err(_) => &[],
        }
    }
}

/// The external feed-parsing collaborator. Implementations must not cap to
/// `source.limit` themselves; the fan-out truncates uniformly.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, source: &Source) -> Result<Vec<RawEntry>, FetchError>;
    fn name(&self) -> &'static str;
}
