use thiserror::Error;

/// Errors from the chat-completion and screenshot clients.
///
/// None of these reach an HTTP caller: the pipeline logs them and substitutes
/// a sentinel analysis or a template screenshot URL.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from an upstream API.
    #[error("{service} rate limit exceeded")]
    RateLimited { service: &'static str },

    #[error("unexpected HTTP status {status} from {service}")]
    UnexpectedStatus { service: &'static str, status: u16 },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The upstream answered successfully but without the value we need.
    #[error("{0}")]
    MissingContent(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error(transparent)]
    Scraper(#[from] sitelens_scraper::ScraperError),

    #[error(transparent)]
    Performance(#[from] sitelens_performance::PerformanceError),
}
