//! Google Cloud Translation API (v2) provider.
//!
//! Calls the `translate` and `detect` endpoints. Auth via URL query param.

use async_trait::async_trait;
use polyglot_core::{error::PolyglotError, traits::Translator};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const TRANSLATE_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Google Translate v2 REST provider.
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleTranslator {
    /// Create from config values.
    pub fn from_config(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, PolyglotError> {
        let url = format!("{TRANSLATE_BASE_URL}{path}?key={}", self.api_key);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PolyglotError::Provider(format!("google request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(PolyglotError::Provider(format!(
                "google returned {status}: {text}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| PolyglotError::Provider(format!("google: failed to parse response: {e}")))
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    /// "text" disables HTML entity escaping in the result.
    format: &'a str,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<TranslationItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationItem {
    translated_text: String,
}

#[derive(Deserialize)]
struct DetectResponse {
    data: DetectData,
}

#[derive(Deserialize)]
struct DetectData {
    /// Nested array: one inner list of candidates per query string.
    detections: Vec<Vec<DetectionItem>>,
}

#[derive(Deserialize)]
struct DetectionItem {
    language: String,
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn detect(&self, text: &str) -> Result<String, PolyglotError> {
        debug!("google: POST /detect ({} chars)", text.chars().count());
        let parsed: DetectResponse = self.post_json("/detect", &DetectRequest { q: text }).await?;

        parsed
            .data
            .detections
            .first()
            .and_then(|candidates| candidates.first())
            .map(|d| d.language.clone())
            .ok_or_else(|| PolyglotError::Provider("google: empty detection result".into()))
    }

    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> Result<String, PolyglotError> {
        debug!("google: POST /translate -> {target} (source: {source:?})");
        let body = TranslateRequest {
            q: text,
            target,
            source,
            format: "text",
        };
        let parsed: TranslateResponse = self.post_json("", &body).await?;

        parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| PolyglotError::Provider("google: empty translation result".into()))
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_empty() {
            warn!("google: no API key configured");
            return false;
        }
        let url = format!("{TRANSLATE_BASE_URL}/languages?key={}", self.api_key);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("google not available: {e}");
                false
            }
        }
    }
}
