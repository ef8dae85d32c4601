//! Daily Briefing, binary entrypoint.
//! Generates the digest, prints it to stdout, then attempts delivery.
//!
//! Exit is non-zero when delivery credentials are missing; per-chunk
//! delivery failures are logged and do not fail the run.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use daily_briefing::config::BriefingConfig;
use daily_briefing::ingest::rss::RssClient;
use daily_briefing::notify::telegram::TelegramNotifier;
use daily_briefing::pipeline::BriefingPipeline;
use daily_briefing::translate::TitleTranslator;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("daily_briefing=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = BriefingConfig::load_default()?;
    let max_chunk_chars = config.max_chunk_chars;

    let fetcher = Arc::new(RssClient::new(&config.fetch));
    let translator = TitleTranslator::from_settings(&config.translate);
    let pipeline = BriefingPipeline::new(config, fetcher, translator);

    let report = pipeline.run().await;
    println!("{}", report.text);

    let notifier = match TelegramNotifier::from_env() {
        Ok(n) => n,
        Err(e) => {
            error!(error = %e, "delivery skipped");
            return Err(e.into());
        }
    };

    let delivery = notifier.send_document(&report.text, max_chunk_chars).await;
    if delivery.all_sent() {
        info!(chunks = delivery.chunks_total, "delivery finished");
    } else {
        warn!(
            sent = delivery.chunks_sent,
            total = delivery.chunks_total,
            "delivery finished with failed chunks"
        );
    }

    Ok(())
}
