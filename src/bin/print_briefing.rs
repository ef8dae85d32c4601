//! Offline demo: renders a briefing from a bundled fixture feed and prints
//! it. No network, no credentials.

use std::sync::Arc;

use daily_briefing::catalog::{Catalog, Category, Source};
use daily_briefing::config::BriefingConfig;
use daily_briefing::ingest::rss::RssClient;
use daily_briefing::pipeline::BriefingPipeline;
use daily_briefing::translate::{DisabledTranslator, TitleTranslator};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut config = BriefingConfig::default();
    config.translate.enabled = false;
    config.catalog = Catalog {
        categories: vec![Category {
            name: "技术资讯".to_string(),
            sources: vec![Source {
                name: "Hacker News".to_string(),
                url: "fixture://hn".to_string(),
                limit: 10,
            }],
        }],
    };

    let fetcher = Arc::new(RssClient::from_fixture(include_str!(
        "../../tests/fixtures/hn_rss.xml"
    )));
    let translator = TitleTranslator::new(Arc::new(DisabledTranslator), "zh-CN");

    let report = BriefingPipeline::new(config, fetcher, translator).run().await;
    println!("{}", report.text);
}
