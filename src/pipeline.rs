// src/pipeline.rs
//! One briefing run: fetch → normalize → translate → filter → score → rank
//! → format. Pure stage composition over the collaborator seams; every
//! stage is isolated so the run degrades gracefully and produces the best
//! briefing possible from whatever succeeded.

use std::sync::Arc;

use chrono::Local;
use metrics::counter;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::briefing::{self, Briefing, CategorySection, SourceSection};
use crate::config::BriefingConfig;
use crate::filter;
use crate::ingest::{
    self,
    types::{FeedFetcher, FetchOutcome},
};
use crate::normalize::{normalize_entry, Entry};
use crate::rank::{self, RankMode};
use crate::score;
use crate::translate::TitleTranslator;

/// What a run produced, with enough accounting for logs and tests.
#[derive(Debug)]
pub struct RunReport {
    pub briefing: Briefing,
    pub text: String,
    pub sources_total: usize,
    pub sources_failed: usize,
    pub dropped_by_filter: usize,
}

pub struct BriefingPipeline {
    config: BriefingConfig,
    fetcher: Arc<dyn FeedFetcher>,
    translator: TitleTranslator,
}

impl BriefingPipeline {
    pub fn new(
        config: BriefingConfig,
        fetcher: Arc<dyn FeedFetcher>,
        translator: TitleTranslator,
    ) -> Self {
        Self {
            config,
            fetcher,
            translator,
        }
    }

    pub fn config(&self) -> &BriefingConfig {
        &self.config
    }

    pub async fn run(&self) -> RunReport {
        let outcomes =
            ingest::fetch_all(self.fetcher.clone(), &self.config.catalog, &self.config.fetch)
                .await;
        let sources_total = outcomes.len();
        let sources_failed = outcomes.iter().filter(|o| o.result.is_err()).count();

        let mut entries: Vec<Entry> = Vec::new();
        for outcome in &outcomes {
            for raw in outcome.entries() {
                entries.push(normalize_entry(
                    raw.clone(),
                    &outcome.category,
                    &outcome.source,
                    self.config.summary_max_chars,
                ));
            }
        }

        self.translate_titles(&mut entries).await;

        let (mut entries, dropped_by_filter) =
            filter::retain_clean(entries, &self.config.blocklist);
        counter!("briefing_filtered_total").increment(dropped_by_filter as u64);

        for entry in &mut entries {
            let s = score::score_title(
                &entry.title,
                &entry.translated_title,
                &self.config.keywords,
                self.config.keyword_weight,
            );
            entry.score = s.value;
            entry.important = s.important();
        }

        let entries = rank::dedup_entries(entries);

        let now = Local::now();
        let briefing = match self.config.rank_mode {
            RankMode::TopN => briefing::build_top_n(
                &rank::top_n(entries, self.config.top_n),
                &self.config.ai_keywords,
                now,
            ),
            RankMode::Grouped => {
                briefing::build_grouped(&self.grouped_sections(&outcomes, entries), now)
            }
        };
        let text = briefing.render();

        info!(
            total = briefing.total_count,
            important = briefing.important_count,
            failed_sources = sources_failed,
            dropped = dropped_by_filter,
            "briefing built"
        );

        RunReport {
            briefing,
            text,
            sources_total,
            sources_failed,
            dropped_by_filter,
        }
    }

    /// Localize all titles with a bounded fan-out. Results stay attached to
    /// their entry regardless of completion order.
    async fn translate_titles(&self, entries: &mut [Entry]) {
        if entries.is_empty() {
            return;
        }
        let sem = Arc::new(Semaphore::new(self.config.translate.concurrency.max(1)));
        let mut set: JoinSet<(usize, String)> = JoinSet::new();
        for (i, entry) in entries.iter().enumerate() {
            let translator = self.translator.clone();
            let title = entry.title.clone();
            let sem = sem.clone();
            set.spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                (i, translator.localize(&title).await)
            });
        }
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((i, translated)) => entries[i].translated_title = translated,
                Err(e) => warn!(error = ?e, "translate task failed to join"),
            }
        }
    }

    /// Bucket survivors back under their catalog source, carrying fetch
    /// errors through for rendering.
    fn grouped_sections(
        &self,
        outcomes: &[FetchOutcome],
        entries: Vec<Entry>,
    ) -> Vec<CategorySection> {
        let mut sections: Vec<CategorySection> = Vec::new();
        for outcome in outcomes {
            if sections
                .last()
                .map(|s| s.name != outcome.category)
                .unwrap_or(true)
            {
                sections.push(CategorySection {
                    name: outcome.category.clone(),
                    sources: Vec::new(),
                });
            }

            let survivors: Vec<Entry> = entries
                .iter()
                .filter(|e| e.source_name == outcome.source.name && e.category == outcome.category)
                .cloned()
                .collect();
            let survivors = rank::select_group(survivors, self.config.max_minor_per_source);

            if let Some(section) = sections.last_mut() {
                section.sources.push(SourceSection {
                    name: outcome.source.name.clone(),
                    entries: survivors,
                    error: outcome.result.as_ref().err().map(|e| e.to_string()),
                });
            }
        }
        sections
    }
}
