//! HTML → plain text reduction for the extraction prompt.

use std::sync::LazyLock;

use regex::Regex;

/// Upper bound, in characters, on extracted text handed to the model.
pub const MAX_TEXT_CHARS: usize = 12_000;

// An unterminated block runs to end of input.
static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?(?:</script\s*>|$)").expect("valid script regex")
});
static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?(?:</style\s*>|$)").expect("valid style regex")
});
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
// A tag opens with a name, `!` or `?` right after `<`, so `1 < 2 > 0` is text.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)</?[A-Za-z!?][^>]*>").expect("valid tag regex"));

/// Reduces `html` to whitespace-normalized visible text.
///
/// Script and style blocks are dropped with their contents, remaining tags
/// become word breaks, whitespace runs collapse to one space, and the result
/// is cut to [`MAX_TEXT_CHARS`] characters. Applying it to its own output is
/// a no-op.
#[must_use]
pub fn extract_text(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, " ");
    let without_styles = STYLE_RE.replace_all(&without_scripts, " ");
    let without_comments = COMMENT_RE.replace_all(&without_styles, " ");
    let without_tags = TAG_RE.replace_all(&without_comments, " ");

    let collapsed = without_tags.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= MAX_TEXT_CHARS {
        return collapsed;
    }

    let truncated: String = collapsed.chars().take(MAX_TEXT_CHARS).collect();
    truncated.trim_end().to_string()
}
