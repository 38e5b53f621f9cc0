//! Chat-completion client used as a text-to-structured-data extractor.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};
use sitelens_core::PageAnalysis;

use crate::error::AnalyzerError;
use crate::parse::{parse_analysis_reply, ParseOutcome};
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};

const SERVICE: &str = "chat-completion API";

/// Bearer-authenticated client for an OpenAI-compatible
/// `/chat/completions` endpoint.
///
/// The API base comes from config, so tests point it at a mock server.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_key", &"[redacted]")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmClient {
    /// Creates a client against a custom API base (for example `.../v1`).
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AnalyzerError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let raw = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&raw).map_err(|e| AnalyzerError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            model: model.to_owned(),
        })
    }

    /// Sends one system + user exchange in JSON mode and returns the
    /// assistant message content.
    ///
    /// # Errors
    ///
    /// - [`AnalyzerError::RateLimited`] on HTTP 429.
    /// - [`AnalyzerError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`AnalyzerError::Http`] on network failure or timeout.
    /// - [`AnalyzerError::Deserialize`] if the body is not JSON.
    /// - [`AnalyzerError::MissingContent`] if there is no message content.
    pub async fn complete_json(&self, system: &str, user: &str) -> Result<String, AnalyzerError> {
        let body = json!({
            "model": self.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": 0.1
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AnalyzerError::RateLimited { service: SERVICE });
        }
        if !status.is_success() {
            return Err(AnalyzerError::UnexpectedStatus {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| AnalyzerError::Deserialize {
                context: "chat completion response".to_string(),
                source: e,
            })?;

        value
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| AnalyzerError::MissingContent("completion has no message content".to_string()))
    }
}

/// Turns extracted page text into a [`PageAnalysis`].
///
/// [`CroExtractor::extract`] never fails: an unconfigured client, a failed
/// call, or an unparseable reply all yield [`PageAnalysis::failed`].
#[derive(Debug, Clone, Default)]
pub struct CroExtractor {
    client: Option<LlmClient>,
}

impl CroExtractor {
    #[must_use]
    pub fn new(client: Option<LlmClient>) -> Self {
        Self { client }
    }

    /// Whether a chat-completion client is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Extracts the five analysis fields for `url` from `page_text`.
    pub async fn extract(&self, url: &str, page_text: &str) -> PageAnalysis {
        let Some(client) = &self.client else {
            tracing::warn!(url, "no chat-completion API key configured; returning failed analysis");
            return PageAnalysis::failed();
        };

        let reply = match client
            .complete_json(SYSTEM_PROMPT, &build_user_prompt(url, page_text))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(url, error = %e, "analysis request failed");
                return PageAnalysis::failed();
            }
        };

        match parse_analysis_reply(&reply) {
            ParseOutcome::Parsed(analysis) => analysis,
            ParseOutcome::Failed(reason) => {
                tracing::warn!(url, %reason, "could not parse analysis reply");
                PageAnalysis::failed()
            }
        }
    }
}
