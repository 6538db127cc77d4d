//! Structural facts pulled out of raw HTML with pattern matching.
//!
//! Every pass is an independent scan over the same string. Markup that does
//! not match a pattern simply contributes nothing; none of these functions
//! can fail.

use crate::text::{strip_tags, truncate_chars};
use crate::{HeadingCounts, ImageStats, LinkStats};
use regex::Regex;
use std::sync::OnceLock;

/// Characters of stripped content used when a document has no description
pub const DESCRIPTION_FALLBACK_CHARS: usize = 160;

/// Everything the extractor finds in one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extraction {
    pub headings: HeadingCounts,
    pub images: ImageStats,
    pub links: LinkStats,
}

/// Run all extraction passes over `html`
pub fn extract(html: &str, site_base_url: &str) -> Extraction {
    Extraction {
        headings: count_headings(html),
        images: classify_images(html),
        links: classify_links(html, site_base_url),
    }
}

fn heading_open_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<h([1-6])[^>]*>").unwrap())
}

fn image_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<img[^>]+>").unwrap())
}

fn alt_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"alt=(?:"([^"]*)"|'([^']*)')"#).unwrap())
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)<a[^>]+href=(?:"([^"]*)"|'([^']*)')[^>]*>"#).unwrap()
    })
}

/// Count `<hN ...>...</hN>` pairs per level.
///
/// The closing tag must be of the same level and on the same line as the
/// opening tag. After a match, scanning resumes behind the closing tag, so a
/// heading of another level nested inside it is not counted.
pub fn count_headings(html: &str) -> HeadingCounts {
    // ASCII lowercasing keeps byte offsets aligned with `html`
    let lower = html.to_ascii_lowercase();
    let mut levels = Vec::new();
    let mut pos = 0;

    while let Some(caps) = heading_open_pattern().captures_at(html, pos) {
        let (Some(open), Some(digit)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let level = digit.as_str().as_bytes()[0] - b'0';
        let body_start = open.end();
        let line_end = lower[body_start..]
            .find('\n')
            .map_or(lower.len(), |i| body_start + i);
        let closing = format!("</h{}>", level);

        match lower[body_start..line_end].find(&closing) {
            Some(offset) => {
                levels.push(level);
                pos = body_start + offset + closing.len();
            }
            // `<` is ASCII, so the next byte is a char boundary
            None => pos = open.start() + 1,
        }
    }

    HeadingCounts::from_levels(levels)
}

/// Classify every `<img>` tag by its alt attribute
pub fn classify_images(html: &str) -> ImageStats {
    let mut stats = ImageStats::default();

    for tag in image_pattern().find_iter(html) {
        stats.total += 1;
        let alt = alt_pattern()
            .captures(tag.as_str())
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)));
        match alt {
            Some(value) if value.as_str().is_empty() => stats.with_empty_alt += 1,
            Some(_) => stats.with_alt += 1,
            None => stats.missing_alt += 1,
        }
    }

    stats
}

/// Classify every `<a href>` as internal or external.
///
/// A link is internal when its href starts with `site_base_url` or with `/`.
/// Everything else, including empty and fragment-only hrefs, is external.
pub fn classify_links(html: &str, site_base_url: &str) -> LinkStats {
    let mut stats = LinkStats::default();

    for caps in link_pattern().captures_iter(html) {
        let href = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map_or("", |m| m.as_str());
        stats.total += 1;
        if is_internal_link(href, site_base_url) {
            stats.internal += 1;
        } else {
            stats.external += 1;
        }
    }

    stats
}

/// Internal-link heuristic; `//host/...` counts as internal because it starts with `/`
pub fn is_internal_link(href: &str, site_base_url: &str) -> bool {
    href.starts_with(site_base_url) || href.starts_with('/')
}

/// Description stand-in: the first characters of the tag-stripped content
pub fn description_candidate(html: &str) -> String {
    let text = strip_tags(html);
    truncate_chars(&text, DESCRIPTION_FALLBACK_CHARS).to_string()
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn html_fragments() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop::sample::select(vec![
                "<h1>", "</h1>", "<h2 id=a>", "</h2>", "<img src=x>", "<img alt=''>",
                "<img alt=\"a\">", "<a href=\"/x\">", "<a href='http://o'>", "</a>", "<p>",
                "text", "\n", "é", "<", ">", "\"", "'",
            ]),
            0..40,
        )
        .prop_map(|parts| parts.concat())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn sums_hold_for_arbitrary_input(ref input in ".{0,400}") {
            let e = extract(input, "https://example.com");
            prop_assert_eq!(
                e.images.with_alt + e.images.with_empty_alt + e.images.missing_alt,
                e.images.total
            );
            prop_assert_eq!(e.links.internal + e.links.external, e.links.total);
        }

        #[test]
        fn sums_hold_for_html_like_input(ref input in html_fragments()) {
            let e = extract(input, "http://o");
            prop_assert_eq!(
                e.images.with_alt + e.images.with_empty_alt + e.images.missing_alt,
                e.images.total
            );
            prop_assert_eq!(e.links.internal + e.links.external, e.links.total);
            let _ = description_candidate(input);
        }
    }
}
