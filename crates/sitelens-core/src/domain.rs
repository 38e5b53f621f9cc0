//! Human-visible site labels used when rendering insight text.

/// Returns the label a reader would recognise for `url`: its host, minus a
/// leading `www.`.
///
/// Given `"https://www.example.com/pricing"`, returns `"example.com"`.
/// Falls back to the trimmed input when it does not parse as a URL with a
/// host, so a label is always non-empty for non-empty input.
#[must_use]
pub fn domain_label(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .map_or_else(
            || url.trim().to_string(),
            |host| host.strip_prefix("www.").unwrap_or(&host).to_string(),
        )
}
