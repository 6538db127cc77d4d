//! Plain-text helpers shared by the extractor and the keyword analyzer

use regex::Regex;
use std::sync::OnceLock;

fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap())
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Remove HTML comments and tags, keeping the text between them untouched.
///
/// Tags are removed without inserting whitespace, so `<p>a</p><p>b</p>`
/// becomes `ab`. A lone `<` with no closing `>` is left in place.
pub fn strip_tags(html: &str) -> String {
    let without_comments = comment_pattern().replace_all(html, "");
    tag_pattern().replace_all(&without_comments, "").into_owned()
}

/// First `max_chars` characters of `text` (never splits a code point)
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Number of characters (Unicode scalar values)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split text into alphanumeric runs
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
}
