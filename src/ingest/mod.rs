// src/ingest/mod.rs
pub mod rss;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{sleep_until, timeout, Duration, Instant};
use tracing::warn;

use crate::catalog::{Catalog, Source};
use crate::config::FetchSettings;
use types::{FeedFetcher, FetchError, FetchOutcome};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "briefing_entries_total",
            "Raw entries collected across all sources."
        );
        describe_counter!(
            "briefing_fetch_errors_total",
            "Sources that failed to fetch or parse."
        );
        describe_counter!(
            "briefing_fetch_cancelled_total",
            "Sources cancelled by the run deadline."
        );
        describe_histogram!("briefing_fetch_ms", "Per-source fetch time in milliseconds.");
    });
}

/// Fetch every catalog source through `fetcher` with a bounded worker pool.
///
/// Each fetch has its own error boundary and timeout; one slow or failing
/// source cannot block or fail the others. The overall deadline aborts
/// whatever is still in flight. Outcomes come back in catalog declaration
/// order regardless of completion order, so downstream stages are
/// deterministic.
pub async fn fetch_all(
    fetcher: Arc<dyn FeedFetcher>,
    catalog: &Catalog,
    settings: &FetchSettings,
) -> Vec<FetchOutcome> {
    ensure_metrics_described();

    let specs: Vec<(String, Source)> = catalog
        .sources()
        .map(|(c, s)| (c.name.clone(), s.clone()))
        .collect();

    let sem = Arc::new(Semaphore::new(settings.concurrency.max(1)));
    let per_fetch = Duration::from_secs(settings.timeout_secs.max(1));
    let timeout_secs = settings.timeout_secs.max(1);

    let mut set: JoinSet<(usize, FetchOutcome)> = JoinSet::new();
    for (i, (category, source)) in specs.iter().cloned().enumerate() {
        let fetcher = fetcher.clone();
        let sem = sem.clone();
        set.spawn(async move {
            let _permit = sem.acquire_owned().await.ok();
            let t0 = std::time::Instant::now();
            let result = match timeout(per_fetch, fetcher.fetch(&source)).await {
                Ok(Ok(mut entries)) => {
                    entries.truncate(source.limit.max(1));
                    Ok(entries)
                }
                Ok(Err(e)) => Err(e),
                Err(_) => Err(FetchError::Timeout(timeout_secs)),
            };
            histogram!("briefing_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
            (
                i,
                FetchOutcome {
                    category,
                    source,
                    result,
                },
            )
        });
    }

    let deadline = Instant::now() + Duration::from_secs(settings.overall_deadline_secs.max(1));
    let mut slots: Vec<Option<FetchOutcome>> = specs.iter().map(|_| None).collect();
    loop {
        tokio::select! {
            joined = set.join_next() => match joined {
                Some(Ok((i, outcome))) => slots[i] = Some(outcome),
                Some(Err(e)) => warn!(error = ?e, "fetch task failed to join"),
                None => break,
            },
            _ = sleep_until(deadline) => {
                warn!(pending = set.len(), "run deadline reached, cancelling in-flight fetches");
                set.abort_all();
                while let Some(joined) = set.join_next().await {
                    if let Ok((i, outcome)) = joined {
                        slots[i] = Some(outcome);
                    }
                }
                break;
            }
        }
    }

    let outcomes: Vec<FetchOutcome> = slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.unwrap_or_else(|| {
                let (category, source) = specs[i].clone();
                counter!("briefing_fetch_cancelled_total").increment(1);
                FetchOutcome {
                    category,
                    source,
                    result: Err(FetchError::Cancelled),
                }
            })
        })
        .collect();

    for outcome in &outcomes {
        match &outcome.result {
            Ok(entries) => {
                counter!("briefing_entries_total").increment(entries.len() as u64);
            }
            Err(e) => {
                warn!(source = %outcome.source.name, error = %e, "source fetch failed");
                counter!("briefing_fetch_errors_total").increment(1);
            }
        }
    }

    outcomes
}
