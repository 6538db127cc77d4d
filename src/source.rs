//! Document source: turn an HTML file on disk into a [`ContentInput`].
//!
//! The analyzer itself never touches the filesystem. Everything it would need
//! from a CMS (title, stored description, site URL, favicon) is looked up here
//! from the file, the config, or explicit overrides.

use crate::text::strip_tags;
use crate::ContentInput;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Favicon file looked up next to a document when nothing else is known
pub const DEFAULT_FAVICON: &str = "favicon.ico";

/// Where the values that are not in the HTML body come from
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Use this title instead of the document's `<title>`
    pub title: Option<String>,
    /// Use this description instead of the document's meta description
    pub description: Option<String>,
    pub site_url: Option<String>,
    /// Known favicon presence; skips detection
    pub favicon_exists: Option<bool>,
    /// Favicon location to check; defaults to `favicon.ico` in the site root
    pub favicon_path: Option<PathBuf>,
    /// Directory served as the site root; defaults to the document's directory
    pub site_root: Option<PathBuf>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    pub fn with_favicon(mut self, exists: bool) -> Self {
        self.favicon_exists = Some(exists);
        self
    }

    pub fn with_favicon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.favicon_path = Some(path.into());
        self
    }

    pub fn with_site_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.site_root = Some(root.into());
        self
    }
}

/// An HTML document loaded from disk, ready for analysis
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub path: PathBuf,
    pub input: ContentInput,
}

impl DocumentSource {
    /// Read `path` and build its analysis input
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page: {}", path.display()))?;
        debug!(file_path = %path.display(), bytes = raw.len(), "loaded page");
        Ok(Self::from_html(path, &raw, options))
    }

    /// Build the analysis input from already-read HTML.
    ///
    /// `path` is only used to locate a favicon when no site root is known.
    pub fn from_html(path: &Path, raw: &str, options: &LoadOptions) -> Self {
        let title = options
            .title
            .clone()
            .or_else(|| extract_title(raw))
            .unwrap_or_default();
        let description = options
            .description
            .clone()
            .or_else(|| extract_meta_description(raw));
        let favicon_exists = options
            .favicon_exists
            .unwrap_or_else(|| detect_favicon(path, options));

        let mut input = ContentInput::new(body_html(raw), title)
            .with_site_base_url(options.site_url.clone().unwrap_or_default())
            .with_favicon(favicon_exists);
        input.excerpt_or_description = description;

        Self {
            path: path.to_path_buf(),
            input,
        }
    }
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").unwrap())
}

fn meta_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<meta\s[^>]*>").unwrap())
}

fn meta_name_description_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?i)\bname\s*=\s*["']?description["'\s/>]"#).unwrap())
}

fn meta_content_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

fn body_open_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)<body(?:\s[^>]*)?>").unwrap())
}

/// Text of the first `<title>` element, tags stripped and trimmed
pub fn extract_title(html: &str) -> Option<String> {
    let caps = title_pattern().captures(html)?;
    let text = decode_entities(&strip_tags(caps.get(1)?.as_str()));
    Some(collapse_whitespace(&text))
}

/// `content` of `<meta name="description">`, attributes in any order
pub fn extract_meta_description(html: &str) -> Option<String> {
    meta_pattern()
        .find_iter(html)
        .map(|tag| tag.as_str())
        .filter(|tag| meta_name_description_pattern().is_match(tag))
        .find_map(|tag| {
            let caps = meta_content_pattern().captures(tag)?;
            let value = caps.get(1).or_else(|| caps.get(2))?;
            Some(decode_entities(value.as_str().trim()))
        })
}

/// Inner HTML of `<body>`, or the whole document when there is no body tag.
///
/// A missing `</body>` takes everything up to the end of the document.
pub fn body_html(html: &str) -> &str {
    let Some(open) = body_open_pattern().find(html) else {
        return html;
    };
    let rest = &html[open.end()..];
    // ASCII lowercasing keeps byte offsets aligned
    match rest.to_ascii_lowercase().rfind("</body") {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Whether the favicon exists on disk.
///
/// The favicon belongs to the site, not the page: without a configured path
/// it is looked up in the site root, or next to the document when no root is known.
fn detect_favicon(document: &Path, options: &LoadOptions) -> bool {
    let candidate = match (&options.favicon_path, &options.site_root) {
        (Some(path), _) => path.clone(),
        (None, Some(root)) => root.join(DEFAULT_FAVICON),
        (None, None) => document
            .parent()
            .unwrap_or(Path::new("."))
            .join(DEFAULT_FAVICON),
    };
    let exists = candidate.is_file();
    debug!(favicon = %candidate.display(), exists, "favicon lookup");
    exists
}

/// Decode the handful of entities that commonly show up in titles
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
