// src/notify/mod.rs
pub mod telegram;

use thiserror::Error;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Missing delivery credentials. Fatal to the delivery step only; the
/// briefing itself is still generated and printed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing delivery credentials: {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },
}

/// Transport failure for one chunk. Isolated per chunk; never aborts the
/// remaining sends.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
}

/// Per-run delivery accounting, one slot per chunk in send order.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub chunks_total: usize,
    pub chunks_sent: usize,
    pub failures: Vec<(usize, DeliveryError)>,
}

impl DeliveryReport {
    pub fn all_sent(&self) -> bool {
        self.chunks_sent == self.chunks_total
    }
}
