//! Per-URL analysis pipelines.
//!
//! [`Analyzer`] wires the page fetcher, text extractor, chat-completion
//! extractor, screenshot chain and performance service together. Every
//! stage degrades to a fallback value instead of failing, so a batch always
//! yields one result per requested URL, in request order.

pub mod error;
pub mod llm;
pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod screenshot;

pub use error::AnalyzerError;
pub use llm::{CroExtractor, LlmClient};
pub use parse::{parse_analysis_reply, ParseOutcome};
pub use pipeline::{page_insights, AnalysisReport, Analyzer, SiteComparison};
pub use screenshot::{template_screenshot_url, ScreenshotService};
