use thiserror::Error;

/// Errors from the live measurement path and known-domain loading.
#[derive(Debug, Error)]
pub enum PerformanceError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429: the daily quota is exhausted or requests are too frequent.
    #[error("PageSpeed API rate limit exceeded")]
    RateLimited,

    #[error("unexpected HTTP status {status} from PageSpeed API")]
    UnexpectedStatus { status: u16 },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A category score or audit value the signal needs was absent.
    #[error("PageSpeed response is missing {0}")]
    Incomplete(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to read known domains file {path}: {source}")]
    KnownDomainsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse known domains file: {0}")]
    KnownDomainsParse(#[from] serde_yaml::Error),

    #[error("invalid known domain entry: {0}")]
    KnownDomainsValidation(String),
}
