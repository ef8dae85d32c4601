// tests/pipeline_e2e.rs
use async_trait::async_trait;
use std::sync::Arc;

use daily_briefing::catalog::{Catalog, Category, Source};
use daily_briefing::chunk::split_chunks;
use daily_briefing::config::BriefingConfig;
use daily_briefing::filter::is_blocked;
use daily_briefing::ingest::types::{FeedFetcher, FetchError, RawEntry};
use daily_briefing::pipeline::BriefingPipeline;
use daily_briefing::rank::RankMode;
use daily_briefing::translate::{MockTranslator, TitleTranslator};

fn raw(title: &str, link: &str) -> RawEntry {
    RawEntry {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        summary: None,
    }
}

/// Two healthy sources (one English, one Chinese) and one broken source.
struct ScriptedFetcher;

#[async_trait]
impl FeedFetcher for ScriptedFetcher {
    async fn fetch(&self, source: &Source) -> Result<Vec<RawEntry>, FetchError> {
        match source.name.as_str() {
            "Tech EN" => Ok(vec![
                raw(
                    "OpenAI announces GPT-5 with major breakthrough",
                    "https://example.test/gpt5",
                ),
                raw("Local bakery opens new branch", "https://example.test/bakery"),
                raw(
                    "Senior Engineer job opening at BigCo",
                    "https://example.test/job",
                ),
                RawEntry {
                    title: None,
                    link: Some("https://example.test/untitled".to_string()),
                    summary: Some("no title on this one".to_string()),
                },
            ]),
            "Tech ZH" => Ok(vec![
                raw("国产芯片取得重大突破", "https://example.test/chip"),
                raw("周末生活方式指南", "https://example.test/life"),
            ]),
            "Broken" => Err(FetchError::Parse("not xml".into())),
            other => panic!("unexpected source {other}"),
        }
    }
    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn test_config() -> BriefingConfig {
    let mut config = BriefingConfig::default();
    config.catalog = Catalog {
        categories: vec![Category {
            name: "技术资讯".to_string(),
            sources: vec![
                Source {
                    name: "Tech EN".to_string(),
                    url: "https://en.example/rss".to_string(),
                    limit: 5,
                },
                Source {
                    name: "Tech ZH".to_string(),
                    url: "https://zh.example/rss".to_string(),
                    limit: 5,
                },
                Source {
                    name: "Broken".to_string(),
                    url: "https://broken.example/rss".to_string(),
                    limit: 5,
                },
            ],
        }],
    };
    config
}

fn pipeline(config: BriefingConfig) -> BriefingPipeline {
    let translator = TitleTranslator::new(
        Arc::new(MockTranslator {
            prefix: "译文:".to_string(),
        }),
        "zh-CN",
    );
    BriefingPipeline::new(config, Arc::new(ScriptedFetcher), translator)
}

#[tokio::test]
async fn top_n_run_scores_filters_and_renders() {
    let config = test_config();
    let blocklist = config.blocklist.clone();
    let report = pipeline(config).run().await;

    assert_eq!(report.sources_total, 3);
    assert_eq!(report.sources_failed, 1);
    assert_eq!(report.dropped_by_filter, 1); // the job ad

    let briefing = &report.briefing;
    // survivors: gpt5, bakery, untitled, chip, life
    assert_eq!(briefing.total_count, 5);

    // the keyword-rich headline outranks the bakery
    let pos = |needle: &str| {
        briefing
            .body
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("missing line: {needle}"))
    };
    assert!(pos("OpenAI announces GPT-5") < pos("Local bakery"));
    assert!(pos("国产芯片取得重大突破") < pos("Local bakery"));

    // blocked titles are gone entirely
    assert!(!report.text.contains("job opening"));
    for line in &briefing.body {
        assert!(!is_blocked(line, &blocklist), "blocked text leaked: {line}");
    }

    // untitled item got the placeholder and was kept
    assert!(report.text.contains("无标题"));

    // English titles show the mock translation, Chinese ones stay single-line
    assert!(report.text.contains("译: 译文:OpenAI announces GPT-5"));
    assert!(!report.text.contains("译: 译文:国产芯片"));

    // chunking is lossless over the rendered document
    let chunks = split_chunks(&report.text, 100);
    assert!(chunks.iter().all(|c| c.chars().count() <= 100));
    assert_eq!(chunks.concat(), report.text);
}

#[tokio::test]
async fn top_n_body_is_deterministic_across_runs() {
    let r1 = pipeline(test_config()).run().await;
    let r2 = pipeline(test_config()).run().await;
    assert_eq!(r1.briefing.body, r2.briefing.body);
    assert_eq!(r1.briefing.summary, r2.briefing.summary);
}

#[tokio::test]
async fn grouped_run_renders_sources_and_errors_in_catalog_order() {
    let mut config = test_config();
    config.rank_mode = RankMode::Grouped;
    let report = pipeline(config).run().await;

    let text = &report.text;
    assert!(text.contains("📂 技术资讯"));
    assert!(text.contains("🔹 Tech EN"));
    assert!(text.contains("🔹 Tech ZH"));
    assert!(text.contains("❌ Broken: feed parse error: not xml"));

    // important entries carry the marker
    assert!(text.contains("• 🔥 OpenAI announces GPT-5 with major breakthrough"));

    // grouped order follows the catalog, not the score
    let en = text.find("🔹 Tech EN").unwrap();
    let zh = text.find("🔹 Tech ZH").unwrap();
    assert!(en < zh);
}
