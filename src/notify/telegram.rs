// src/notify/telegram.rs
//! Telegram bot API transport: one `sendMessage` call per chunk, in order.
//! A failed chunk is logged and counted; the rest are still sent.

use std::time::Duration;

use metrics::counter;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::{ConfigError, DeliveryError, DeliveryReport, ENV_BOT_TOKEN, ENV_CHAT_ID};
use crate::chunk::split_chunks;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug)]
pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    api_base: String,
    client: Client,
}

impl TelegramNotifier {
    /// Read credentials from the environment. Every missing variable is
    /// reported distinctly.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = non_empty_env(ENV_BOT_TOKEN);
        let chat_id = non_empty_env(ENV_CHAT_ID);
        match (bot_token, chat_id) {
            (Some(token), Some(chat)) => Ok(Self::new(token, chat)),
            (token, chat) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push(ENV_BOT_TOKEN);
                }
                if chat.is_none() {
                    missing.push(ENV_CHAT_ID);
                }
                Err(ConfigError::MissingCredentials { missing })
            }
        }
    }

    pub fn new(bot_token: String, chat_id: String) -> Self {
        let client = Client::builder()
            .user_agent("daily-briefing/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            bot_token,
            chat_id,
            api_base: DEFAULT_API_BASE.to_string(),
            client,
        }
    }

    /// Point at a different API host (tests, self-hosted bot API).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }

    /// Send one chunk. Single best-effort attempt; the caller decides what
    /// a failure means.
    pub async fn send_chunk(&self, text: &str) -> Result<(), DeliveryError> {
        let body = serde_json::json!({ "chat_id": self.chat_id, "text": text });
        let rsp = self
            .client
            .post(self.send_message_url())
            .json(&body)
            .send()
            .await?;

        let status = rsp.status();
        if !status.is_success() {
            let body = rsp.text().await.unwrap_or_default();
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                body,
            });
        }
        debug!(chars = text.chars().count(), "chunk accepted");
        Ok(())
    }

    /// Chunk the document and send every piece in order. Failures are
    /// isolated per chunk.
    pub async fn send_document(&self, text: &str, max_chunk_chars: usize) -> DeliveryReport {
        let chunks = split_chunks(text, max_chunk_chars);
        let mut report = DeliveryReport {
            chunks_total: chunks.len(),
            ..Default::default()
        };

        for (i, chunk) in chunks.iter().enumerate() {
            match self.send_chunk(chunk).await {
                Ok(()) => {
                    report.chunks_sent += 1;
                    counter!("briefing_chunks_sent_total").increment(1);
                    info!(chunk = i + 1, total = report.chunks_total, "chunk delivered");
                }
                Err(e) => {
                    counter!("briefing_chunks_failed_total").increment(1);
                    warn!(chunk = i + 1, total = report.chunks_total, error = %e, "chunk delivery failed, continuing");
                    report.failures.push((i, e));
                }
            }
        }
        report
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[serial]
    #[test]
    fn from_env_reports_each_missing_credential() {
        env::remove_var(ENV_BOT_TOKEN);
        env::remove_var(ENV_CHAT_ID);
        let err = TelegramNotifier::from_env().unwrap_err();
        let ConfigError::MissingCredentials { missing } = err;
        assert_eq!(missing, vec![ENV_BOT_TOKEN, ENV_CHAT_ID]);

        env::set_var(ENV_BOT_TOKEN, "123:abc");
        let err = TelegramNotifier::from_env().unwrap_err();
        let ConfigError::MissingCredentials { missing } = err;
        assert_eq!(missing, vec![ENV_CHAT_ID]);
        env::remove_var(ENV_BOT_TOKEN);
    }

    #[serial]
    #[test]
    fn blank_credentials_count_as_missing() {
        env::set_var(ENV_BOT_TOKEN, "   ");
        env::set_var(ENV_CHAT_ID, "42");
        let err = TelegramNotifier::from_env().unwrap_err();
        let ConfigError::MissingCredentials { missing } = err;
        assert_eq!(missing, vec![ENV_BOT_TOKEN]);
        env::remove_var(ENV_BOT_TOKEN);
        env::remove_var(ENV_CHAT_ID);
    }

    #[test]
    fn send_message_url_hides_no_surprises() {
        let n = TelegramNotifier::new("123:abc".into(), "42".into())
            .with_api_base("http://localhost:9999");
        assert_eq!(
            n.send_message_url(),
            "http://localhost:9999/bot123:abc/sendMessage"
        );
    }
}
