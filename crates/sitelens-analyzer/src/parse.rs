//! Parsing of the model's reply into a [`PageAnalysis`].

use std::sync::LazyLock;

use regex::Regex;
use sitelens_core::PageAnalysis;

static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid json object regex"));

/// Result of reading a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(PageAnalysis),
    Failed(String),
}

/// Parses `reply` as exactly the five analysis fields.
///
/// The whole reply is tried first. Failing that, the span from the first
/// `{` to the last `}` is tried, which covers replies wrapped in prose or
/// code fences.
#[must_use]
pub fn parse_analysis_reply(reply: &str) -> ParseOutcome {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return ParseOutcome::Failed("empty reply".to_string());
    }

    let direct_err = match serde_json::from_str::<PageAnalysis>(trimmed) {
        Ok(analysis) => return ParseOutcome::Parsed(analysis),
        Err(e) => e,
    };

    let Some(candidate) = JSON_OBJECT_RE.find(trimmed) else {
        return ParseOutcome::Failed(format!("no JSON object in reply: {direct_err}"));
    };

    match serde_json::from_str::<PageAnalysis>(candidate.as_str()) {
        Ok(analysis) => ParseOutcome::Parsed(analysis),
        Err(e) => ParseOutcome::Failed(format!("reply is not an analysis object: {e}")),
    }
}
