//! Page retrieval and plain-text extraction.

pub mod client;
pub mod error;
pub mod extract;
pub mod target;

pub use client::PageFetcher;
pub use error::ScraperError;
pub use extract::{extract_text, MAX_TEXT_CHARS};
pub use target::{parse_target_url, resolve_batch, TargetBatch};
