//! Clean-up helpers for text and urls taken from recipe pages.

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static OUTER_ELEMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*<[^>]+>(.*)</[^>]+>\s*$").unwrap());

/// Clean up text from a page: strip tags, decode entities, squash whitespace.
///
/// Empty input gives `None`; input that is only markup or whitespace gives `Some("")`.
pub fn clean_text(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    let stripped = TAG_REGEX.replace_all(s, "");
    let decoded = decode_html_entities(&stripped);
    let squashed = WHITESPACE_REGEX.replace_all(&decoded, " ");
    Some(squashed.trim().to_string())
}

/// Clean up HTML from a page, omitting the outer element
pub fn clean_html(s: &str) -> Option<String> {
    if s.is_empty() {
        return None;
    }
    let inner = OUTER_ELEMENT_REGEX.replace(s, "$1");
    Some(inner.trim().to_string())
}

/// Strip any hash and query string from a url
pub fn strip_hash_qs(url: &str) -> &str {
    let url = url.split('#').next().unwrap_or(url);
    url.split('?').next().unwrap_or(url)
}
