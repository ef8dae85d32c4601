// src/translate.rs
//! Title translation: CJK-script detection in front of an external
//! translation collaborator. Failure is never fatal: the adapter falls
//! back to the original text and the entry keeps flowing.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, warn};

use crate::config::TranslateSettings;

/// Low-level collaborator: does the actual remote call.
#[async_trait]
pub trait Translate: Send + Sync {
    /// Translate `text` from an auto-detected language into `target`.
    async fn translate(&self, text: &str, target: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub type DynTranslator = Arc<dyn Translate>;

/// True when the text already contains CJK ideographs (the briefing's
/// native script), so no translation is needed.
pub fn has_cjk(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(
            c as u32,
            0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF
        )
    })
}

/// No-op collaborator used when translation is disabled.
pub struct DisabledTranslator;

#[async_trait]
impl Translate for DisabledTranslator {
    async fn translate(&self, text: &str, _target: &str) -> Result<String> {
        Ok(text.to_string())
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic collaborator for tests: prefixes instead of translating.
pub struct MockTranslator {
    pub prefix: String,
}

#[async_trait]
impl Translate for MockTranslator {
    async fn translate(&self, text: &str, _target: &str) -> Result<String> {
        Ok(format!("{}{}", self.prefix, text))
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Google web translate endpoint (auto → target). No API key required;
/// quota failures surface as errors and the adapter falls back.
pub struct HttpTranslator {
    http: reqwest::Client,
}

impl HttpTranslator {
    pub fn new(timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("daily-briefing/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .expect("reqwest client");
        Self { http }
    }
}

#[async_trait]
impl Translate for HttpTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let rsp = self
            .http
            .get("https://translate.googleapis.com/translate_a/single")
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .context("translate request")?
            .error_for_status()
            .context("translate non-2xx")?;

        let body: serde_json::Value = rsp.json().await.context("translate body")?;

        // Response shape: [[["translated","original",...], ...], ...]
        let mut out = String::new();
        if let Some(segments) = body.get(0).and_then(|v| v.as_array()) {
            for seg in segments {
                if let Some(s) = seg.get(0).and_then(|v| v.as_str()) {
                    out.push_str(s);
                }
            }
        }
        let out = out.trim().to_string();
        if out.is_empty() {
            bail!("empty translation result");
        }
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "google-web"
    }
}

/// The adapter the pipeline talks to: skips native-script titles, calls the
/// collaborator otherwise, and keeps the original on any failure.
#[derive(Clone)]
pub struct TitleTranslator {
    inner: DynTranslator,
    target: String,
}

impl TitleTranslator {
    pub fn new(inner: DynTranslator, target: impl Into<String>) -> Self {
        Self {
            inner,
            target: target.into(),
        }
    }

    pub fn from_settings(settings: &TranslateSettings) -> Self {
        let inner: DynTranslator = if settings.enabled {
            Arc::new(HttpTranslator::new(settings.timeout_secs))
        } else {
            Arc::new(DisabledTranslator)
        };
        Self::new(inner, settings.target_lang.clone())
    }

    /// Localize one title. Never fails; never returns an empty string for a
    /// non-empty input.
    pub async fn localize(&self, title: &str) -> String {
        if title.is_empty() || has_cjk(title) {
            return title.to_string();
        }
        match self.inner.translate(title, &self.target).await {
            Ok(t) if !t.trim().is_empty() => t,
            Ok(_) => title.to_string(),
            Err(e) => {
                counter!("briefing_translate_fallback_total").increment(1);
                warn!(provider = self.inner.name(), error = %e, "translation failed, keeping original");
                debug!(title, "untranslated title");
                title.to_string()
            }
        }
    }
}
