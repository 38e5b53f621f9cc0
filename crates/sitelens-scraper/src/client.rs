//! HTTP client for retrieving arbitrary third-party pages.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::target::host_of;

/// Fetches raw page HTML while presenting a browser-like identity.
///
/// Non-2xx statuses are surfaced as typed errors by [`Self::fetch_html`];
/// [`Self::fetch_or_empty`] swallows every failure and yields an empty body
/// so one unreachable site never fails a batch. Nothing is retried.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the body of `url` as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] on HTTP 429.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on network, TLS, timeout or body decoding failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScraperError::RateLimited {
                domain: host_of(url),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetches `url`, returning an empty string on any failure.
    ///
    /// Failures are logged at `warn` with the URL and error attached.
    pub async fn fetch_or_empty(&self, url: &str) -> String {
        match self.fetch_html(url).await {
            Ok(body) => {
                tracing::debug!(url, bytes = body.len(), "fetched page");
                body
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "page fetch failed; continuing with empty content");
                String::new()
            }
        }
    }
}
