//! HTTP client for the PageSpeed Insights v5 `runPagespeed` endpoint.
//!
//! Requests a mobile Lighthouse run with the four categories the signal
//! needs and maps the response into a [`PerformanceSignal`].

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use sitelens_core::{CoreMetrics, PerformanceSignal};

use crate::error::PerformanceError;

const CATEGORIES: [&str; 4] = ["performance", "accessibility", "best-practices", "seo"];
const STRATEGY: &str = "mobile";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageSpeedResponse {
    lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    #[serde(default)]
    categories: HashMap<String, Category>,
    #[serde(default)]
    audits: HashMap<String, Audit>,
}

#[derive(Debug, Deserialize)]
struct Category {
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Audit {
    numeric_value: Option<f64>,
}

/// Client for the live measurement API.
///
/// The endpoint comes from config, so tests point it at a mock server.
#[derive(Clone)]
pub struct PageSpeedClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for PageSpeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSpeedClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PageSpeedClient {
    /// Creates a client with a custom endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`PerformanceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PerformanceError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PerformanceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| PerformanceError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Runs a live measurement of `page_url`.
    ///
    /// # Errors
    ///
    /// - [`PerformanceError::RateLimited`] on HTTP 429.
    /// - [`PerformanceError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`PerformanceError::Http`] on network failure.
    /// - [`PerformanceError::Deserialize`] if the body is not the expected JSON.
    /// - [`PerformanceError::Incomplete`] if a score or metric is missing.
    pub async fn measure(&self, page_url: &str) -> Result<PerformanceSignal, PerformanceError> {
        let url = self.build_url(page_url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PerformanceError::RateLimited);
        }
        if !status.is_success() {
            return Err(PerformanceError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: PageSpeedResponse =
            serde_json::from_str(&body).map_err(|e| PerformanceError::Deserialize {
                context: format!("runPagespeed(url={page_url})"),
                source: e,
            })?;

        to_signal(page_url, parsed)
    }

    fn build_url(&self, page_url: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("url", page_url);
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("strategy", STRATEGY);
            for category in CATEGORIES {
                pairs.append_pair("category", category);
            }
        }
        url
    }
}

fn to_signal(
    page_url: &str,
    response: PageSpeedResponse,
) -> Result<PerformanceSignal, PerformanceError> {
    let result = response
        .lighthouse_result
        .ok_or_else(|| PerformanceError::Incomplete("lighthouseResult".to_string()))?;

    Ok(PerformanceSignal {
        url: page_url.to_string(),
        performance_score: category_score(&result, "performance")?,
        core_metrics: CoreMetrics {
            first_contentful_paint_ms: audit_ms(&result, "first-contentful-paint")?,
            largest_contentful_paint_ms: audit_ms(&result, "largest-contentful-paint")?,
            speed_index_ms: audit_ms(&result, "speed-index")?,
            total_blocking_time_ms: audit_ms(&result, "total-blocking-time")?,
            cumulative_layout_shift: audit_value(&result, "cumulative-layout-shift")?.clamp(0.0, 1.0),
        },
        accessibility_score: category_score(&result, "accessibility")?,
        best_practices_score: category_score(&result, "best-practices")?,
        seo_score: category_score(&result, "seo")?,
    })
}

/// Lighthouse scores are fractions in `[0, 1]`; the signal wants `0..=100`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn category_score(result: &LighthouseResult, key: &str) -> Result<u8, PerformanceError> {
    let score = result
        .categories
        .get(key)
        .and_then(|c| c.score)
        .ok_or_else(|| PerformanceError::Incomplete(format!("category score '{key}'")))?;
    Ok((score * 100.0).round().clamp(0.0, 100.0) as u8)
}

fn audit_value(result: &LighthouseResult, key: &str) -> Result<f64, PerformanceError> {
    result
        .audits
        .get(key)
        .and_then(|a| a.numeric_value)
        .filter(|v| v.is_finite())
        .ok_or_else(|| PerformanceError::Incomplete(format!("audit '{key}'")))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn audit_ms(result: &LighthouseResult, key: &str) -> Result<u32, PerformanceError> {
    let value = audit_value(result, key)?;
    Ok(value.round().clamp(0.0, f64::from(u32::MAX)) as u32)
}
