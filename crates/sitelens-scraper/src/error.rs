use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {domain}")]
    RateLimited { domain: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid target URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("at least one URL is required")]
    EmptyBatch,

    #[error("at most {max} URLs may be analyzed at once, got {got}")]
    TooManyUrls { max: usize, got: usize },

    #[error("subject URL \"{subject}\" is not one of the analyzed URLs")]
    UnknownSubject { subject: String },
}
