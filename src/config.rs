// src/config.rs
//! Run configuration: keyword lists, blocklist, ranking knobs, fetch and
//! translation settings, and the feed catalog.
//!
//! Resolution order: `$BRIEFING_CONFIG_PATH` → `config/briefing.toml` →
//! built-in seed. The config is injected into the pipeline at construction
//! time; nothing here is global mutable state.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::chunk::MAX_CHUNK_CHARS;
use crate::rank::RankMode;

pub const DEFAULT_CONFIG_PATH: &str = "config/briefing.toml";
pub const ENV_CONFIG_PATH: &str = "BRIEFING_CONFIG_PATH";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Per-source fetch timeout. The external parser has no timeout
    /// guarantee of its own, so this bounds worst-case latency.
    pub timeout_secs: u64,
    /// Deadline for the whole fan-out; in-flight fetches are cancelled.
    pub overall_deadline_secs: u64,
    /// Bounded worker pool size for concurrent fetches.
    pub concurrency: usize,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            overall_deadline_secs: 60,
            concurrency: 4,
            user_agent: "daily-briefing/0.1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslateSettings {
    pub enabled: bool,
    /// Target locale for non-native titles, e.g. "zh-CN".
    pub target_lang: String,
    pub timeout_secs: u64,
    pub concurrency: usize,
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            target_lang: "zh-CN".to_string(),
            timeout_secs: 6,
            concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BriefingConfig {
    /// Importance keywords; each hit adds `keyword_weight` to the score.
    pub keywords: Vec<String>,
    /// Narrower AI subset used for the summary-line topic split.
    pub ai_keywords: Vec<String>,
    /// Hard-exclusion blocklist matched against original titles.
    pub blocklist: Vec<String>,
    pub keyword_weight: f32,
    pub top_n: usize,
    /// Grouped mode: non-important entries kept per source.
    pub max_minor_per_source: usize,
    pub max_chunk_chars: usize,
    pub summary_max_chars: usize,
    pub rank_mode: RankMode,
    pub fetch: FetchSettings,
    pub translate: TranslateSettings,
    pub catalog: Catalog,
}

impl Default for BriefingConfig {
    fn default() -> Self {
        Self {
            keywords: seed_keywords(),
            ai_keywords: seed_ai_keywords(),
            blocklist: seed_blocklist(),
            keyword_weight: 10.0,
            top_n: 20,
            max_minor_per_source: 3,
            max_chunk_chars: MAX_CHUNK_CHARS,
            summary_max_chars: 200,
            rank_mode: RankMode::TopN,
            fetch: FetchSettings::default(),
            translate: TranslateSettings::default(),
            catalog: Catalog::default_seed(),
        }
    }
}

impl BriefingConfig {
    /// Load using the env-var path, the default path, then the seed.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!(
                "{ENV_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            ));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default.exists() {
            return Self::load_from(&default);
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading briefing config at {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: BriefingConfig = toml::from_str(toml_str).context("parsing briefing config")?;
        Ok(cfg.validated())
    }

    /// Clamp out-of-range knobs instead of failing the run.
    fn validated(mut self) -> Self {
        self.top_n = self.top_n.max(1);
        self.max_chunk_chars = self.max_chunk_chars.max(1);
        self.summary_max_chars = self.summary_max_chars.max(1);
        if self.keyword_weight < 0.0 {
            self.keyword_weight = 0.0;
        }
        for cat in &mut self.catalog.categories {
            for src in &mut cat.sources {
                src.limit = src.limit.max(1);
            }
        }
        self
    }
}

fn seed_keywords() -> Vec<String> {
    [
        "AI",
        "人工智能",
        "大模型",
        "LLM",
        "OpenAI",
        "GPT",
        "Claude",
        "Anthropic",
        "Gemini",
        "芯片",
        "半导体",
        "融资",
        "发布",
        "开源",
        "突破",
        "breakthrough",
        "收购",
        "acquisition",
        "IPO",
        "上市",
        "美联储",
        "降息",
        "加息",
        "财报",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn seed_ai_keywords() -> Vec<String> {
    [
        "AI",
        "人工智能",
        "大模型",
        "LLM",
        "OpenAI",
        "GPT",
        "Claude",
        "Anthropic",
        "Gemini",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn seed_blocklist() -> Vec<String> {
    [
        "招聘",
        "急聘",
        "内推",
        "求职",
        "hiring",
        "job opening",
        "jobs",
        "广告",
        "推广",
        "优惠",
        "折扣",
        "promotion",
        "sponsored",
        "报名",
        "webinar",
        "峰会",
        "meetup",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn seed_has_sane_defaults() {
        let cfg = BriefingConfig::default();
        assert_eq!(cfg.top_n, 20);
        assert_eq!(cfg.max_chunk_chars, 4000);
        assert_eq!(cfg.rank_mode, RankMode::TopN);
        assert!(!cfg.catalog.is_empty());
        assert!(cfg.keywords.iter().any(|k| k == "OpenAI"));
        assert!(cfg.blocklist.iter().any(|k| k == "招聘"));
    }

    #[test]
    fn partial_toml_overrides_seed() {
        let cfg = BriefingConfig::from_toml_str(
            r#"
top_n = 10
rank_mode = "grouped"

[fetch]
concurrency = 2
"#,
        )
        .unwrap();
        assert_eq!(cfg.top_n, 10);
        assert_eq!(cfg.rank_mode, RankMode::Grouped);
        assert_eq!(cfg.fetch.concurrency, 2);
        // untouched fields keep the seed
        assert_eq!(cfg.max_chunk_chars, 4000);
        assert!(!cfg.catalog.is_empty());
    }

    #[test]
    fn validation_clamps_degenerate_values() {
        let cfg = BriefingConfig::from_toml_str(
            r#"
top_n = 0
max_chunk_chars = 0
keyword_weight = -3.0

[[catalog.category]]
name = "X"

[[catalog.category.sources]]
name = "A"
url = "https://a.example/rss"
limit = 0
"#,
        )
        .unwrap();
        assert_eq!(cfg.top_n, 1);
        assert_eq!(cfg.max_chunk_chars, 1);
        assert_eq!(cfg.keyword_weight, 0.0);
        assert_eq!(cfg.catalog.categories[0].sources[0].limit, 1);
    }

    #[test]
    fn load_from_reads_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("briefing.toml");
        std::fs::write(&path, "top_n = 7\nblocklist = [\"hiring\"]\n").unwrap();

        let cfg = BriefingConfig::load_from(&path).unwrap();
        assert_eq!(cfg.top_n, 7);
        assert_eq!(cfg.blocklist, vec!["hiring".to_string()]);

        let err = BriefingConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("reading briefing config"));
    }

    #[serial_test::serial]
    #[test]
    fn load_default_errors_on_dangling_env_path() {
        env::set_var(ENV_CONFIG_PATH, "/definitely/not/here.toml");
        let err = BriefingConfig::load_default().unwrap_err();
        assert!(err.to_string().contains(ENV_CONFIG_PATH));
        env::remove_var(ENV_CONFIG_PATH);
    }
}
