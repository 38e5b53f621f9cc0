//! Screenshot URLs for analyzed pages.
//!
//! The live provider is a Microlink-style JSON API that renders the page and
//! returns `data.screenshot.url`. When it fails, a URL-template provider is
//! used instead. Template providers render lazily on first image load, so they
//! never fail here: thum.io takes the target verbatim in its path, which only
//! works for URLs without a query string or fragment; anything else goes to
//! WordPress mShots with the target percent-encoded.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::error::AnalyzerError;

const SERVICE: &str = "screenshot API";
const THUM_IO_BASE: &str = "https://image.thum.io/get/width/1200/crop/800/";
const MSHOTS_BASE: &str = "https://s0.wp.com/mshots/v1/";

#[derive(Debug, Deserialize)]
struct MicrolinkResponse {
    status: String,
    data: Option<MicrolinkData>,
}

#[derive(Debug, Deserialize)]
struct MicrolinkData {
    screenshot: Option<MicrolinkAsset>,
}

#[derive(Debug, Deserialize)]
struct MicrolinkAsset {
    url: String,
}

/// Resolves a screenshot image URL for a target page.
#[derive(Debug, Clone)]
pub struct ScreenshotService {
    client: Client,
    base_url: Url,
}

impl ScreenshotService {
    /// Creates a service with a custom live-provider base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AnalyzerError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| AnalyzerError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Returns a screenshot URL for `target`, falling back to a template
    /// provider when the live provider fails.
    pub async fn capture(&self, target: &str) -> String {
        match self.capture_live(target).await {
            Ok(url) => url,
            Err(e) => {
                tracing::info!(url = target, error = %e, "live screenshot unavailable, using template provider");
                template_screenshot_url(target)
            }
        }
    }

    /// Asks the live provider to render `target`.
    ///
    /// # Errors
    ///
    /// - [`AnalyzerError::RateLimited`] on HTTP 429.
    /// - [`AnalyzerError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`AnalyzerError::Http`] on network failure.
    /// - [`AnalyzerError::Deserialize`] if the body is not the expected JSON.
    /// - [`AnalyzerError::MissingContent`] if no screenshot URL came back.
    pub async fn capture_live(&self, target: &str) -> Result<String, AnalyzerError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("url", target)
            .append_pair("screenshot", "true")
            .append_pair("meta", "false");

        let response = self.client.get(url).send().await?;
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
        let body: MicrolinkResponse =
            serde_json::from_str(&text).map_err(|e| AnalyzerError::Deserialize {
                context: format!("screenshot(url={target})"),
                source: e,
            })?;

        if body.status != "success" {
            return Err(AnalyzerError::MissingContent(format!(
                "screenshot API returned status '{}'",
                body.status
            )));
        }

        body.data
            .and_then(|d| d.screenshot)
            .map(|s| s.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AnalyzerError::MissingContent("screenshot URL missing".to_string()))
    }
}

/// Template-provider screenshot URL for `target`.
#[must_use]
pub fn template_screenshot_url(target: &str) -> String {
    let embeddable = Url::parse(target)
        .is_ok_and(|u| u.query().is_none() && u.fragment().is_none());

    if embeddable {
        format!("{THUM_IO_BASE}{target}")
    } else {
        let encoded = utf8_percent_encode(target, NON_ALPHANUMERIC);
        format!("{MSHOTS_BASE}{encoded}?w=1200&h=800")
    }
}
