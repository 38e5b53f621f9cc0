//! Validation of caller-supplied target URLs.

use reqwest::Url;

use crate::error::ScraperError;

/// Parses `raw` as an absolute `http`/`https` URL with a host.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] for relative URLs, other schemes, or
/// URLs without a host.
pub fn parse_target_url(raw: &str) -> Result<Url, ScraperError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| ScraperError::InvalidUrl {
        url: trimmed.to_owned(),
        reason: reason.to_owned(),
    };

    if trimmed.is_empty() {
        return Err(invalid("URL is empty"));
    }

    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("only http and https URLs are supported"));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL has no host"));
    }

    Ok(url)
}

/// A validated set of target URLs plus the index of the subject site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBatch {
    /// Input URLs with surrounding whitespace removed, in input order.
    pub urls: Vec<String>,
    /// Index into `urls` of the site the others are compared against.
    pub subject: usize,
}

/// Validates a batch of target URLs and resolves the subject site.
///
/// The subject defaults to the first URL. An explicit subject is matched
/// against the batch after URL normalisation, so `https://a.test` and
/// `https://a.test/` name the same site.
///
/// # Errors
///
/// - [`ScraperError::EmptyBatch`] if `urls` is empty.
/// - [`ScraperError::TooManyUrls`] if `urls` has more than `max_urls` entries.
/// - [`ScraperError::InvalidUrl`] if any URL (or the subject) fails
///   [`parse_target_url`].
/// - [`ScraperError::UnknownSubject`] if the subject is not in the batch.
pub fn resolve_batch(
    urls: &[String],
    subject: Option<&str>,
    max_urls: usize,
) -> Result<TargetBatch, ScraperError> {
    if urls.is_empty() {
        return Err(ScraperError::EmptyBatch);
    }
    if urls.len() > max_urls {
        return Err(ScraperError::TooManyUrls {
            max: max_urls,
            got: urls.len(),
        });
    }

    let parsed = urls
        .iter()
        .map(|raw| parse_target_url(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let subject = match subject.map(str::trim).filter(|s| !s.is_empty()) {
        None => 0,
        Some(raw) => {
            let wanted = parse_target_url(raw)?;
            parsed
                .iter()
                .position(|u| *u == wanted)
                .ok_or_else(|| ScraperError::UnknownSubject {
                    subject: raw.to_owned(),
                })?
        }
    };

    Ok(TargetBatch {
        urls: urls.iter().map(|u| u.trim().to_owned()).collect(),
        subject,
    })
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
pub(crate) fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_url() {
        let url = parse_target_url("https://example.com/pricing").expect("valid");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn trims_whitespace() {
        assert!(parse_target_url("  http://example.com  ").is_ok());
    }

    #[test]
    fn rejects_relative_url() {
        let err = parse_target_url("/pricing").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidUrl { .. }), "got: {err:?}");
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(parse_target_url("ftp://example.com").is_err());
        assert!(parse_target_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_target_url("   ").is_err());
    }

    fn urls(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|u| (*u).to_string()).collect()
    }

    #[test]
    fn resolve_batch_trims_and_defaults_subject_to_first() {
        let batch = resolve_batch(&urls(&[" https://a.test", "https://b.test "]), None, 10)
            .expect("valid batch");
        assert_eq!(batch.urls, ["https://a.test", "https://b.test"]);
        assert_eq!(batch.subject, 0);
    }

    #[test]
    fn resolve_batch_finds_explicit_subject() {
        let batch = resolve_batch(
            &urls(&["https://a.test", "https://b.test"]),
            Some("https://b.test"),
            10,
        )
        .expect("valid batch");
        assert_eq!(batch.subject, 1);
    }

    #[test]
    fn resolve_batch_matches_subject_after_normalisation() {
        let batch = resolve_batch(
            &urls(&["https://a.test", "https://B.test"]),
            Some(" https://b.test/ "),
            10,
        )
        .expect("valid batch");
        assert_eq!(batch.subject, 1);

        let batch = resolve_batch(&urls(&["https://a.test/"]), Some("https://a.test"), 10)
            .expect("valid batch");
        assert_eq!(batch.subject, 0);
    }

    #[test]
    fn resolve_batch_blank_subject_means_first() {
        let batch = resolve_batch(&urls(&["https://a.test"]), Some("  "), 10).expect("valid");
        assert_eq!(batch.subject, 0);
    }

    #[test]
    fn resolve_batch_rejects_empty_and_oversized_batches() {
        assert!(matches!(
            resolve_batch(&[], None, 10),
            Err(ScraperError::EmptyBatch)
        ));
        let err = resolve_batch(&urls(&["https://a.test", "https://b.test"]), None, 1).unwrap_err();
        assert!(matches!(err, ScraperError::TooManyUrls { max: 1, got: 2 }));
        assert_eq!(err.to_string(), "at most 1 URLs may be analyzed at once, got 2");
    }

    #[test]
    fn resolve_batch_rejects_invalid_url() {
        let err = resolve_batch(&urls(&["https://a.test", "mailto:x@y.z"]), None, 10).unwrap_err();
        assert!(err.to_string().contains("mailto:x@y.z"), "got: {err}");
    }

    #[test]
    fn resolve_batch_rejects_unknown_subject() {
        let err =
            resolve_batch(&urls(&["https://a.test"]), Some("https://z.test"), 10).unwrap_err();
        assert!(matches!(err, ScraperError::UnknownSubject { ref subject } if subject == "https://z.test"));
    }

    #[test]
    fn host_of_strips_scheme() {
        assert_eq!(host_of("https://example.com/a"), "example.com");
        assert_eq!(host_of("garbage"), "garbage");
    }
}
