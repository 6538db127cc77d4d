//! seoscope: On-page SEO analyzer
//!
//! This library audits a single HTML document and produces a deterministic
//! 0-100 score together with a structured diagnostic report: title, meta
//! description, heading structure, image alt coverage, link classification,
//! favicon presence and keyword frequency.
//!
//! The engine is a pipeline of pure functions. [`analyze`] is the entry point;
//! everything it returns is an immutable snapshot of one input.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod mcp;
pub mod reporter;
pub mod source;
pub mod text;

pub use analyzer::report::{analyze, analyze_value};
pub use error::AnalyzeError;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything the engine needs to know about one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInput {
    /// Raw HTML content
    pub html: String,
    /// Document title
    pub title: String,
    /// Excerpt or meta description, if the document has one
    #[serde(default)]
    pub excerpt_or_description: Option<String>,
    /// Base URL of the site, used to classify links
    #[serde(default)]
    pub site_base_url: String,
    /// Whether the site serves a favicon
    #[serde(default)]
    pub favicon_exists: bool,
}

impl ContentInput {
    pub fn new(html: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            title: title.into(),
            excerpt_or_description: None,
            site_base_url: String::new(),
            favicon_exists: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.excerpt_or_description = Some(description.into());
        self
    }

    pub fn with_site_base_url(mut self, url: impl Into<String>) -> Self {
        self.site_base_url = url.into();
        self
    }

    pub fn with_favicon(mut self, exists: bool) -> Self {
        self.favicon_exists = exists;
        self
    }

    /// Build an input from an untyped JSON request.
    ///
    /// `html` and `title` must be present strings. The remaining fields are
    /// optional, but must have the right type when given (`null` counts as
    /// absent).
    pub fn from_value(value: &serde_json::Value) -> error::Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| AnalyzeError::wrong_type("input", "must be a JSON object"))?;

        let required_string = |field: &'static str| -> error::Result<String> {
            match obj.get(field) {
                None | Some(serde_json::Value::Null) => Err(AnalyzeError::missing(field)),
                Some(serde_json::Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(AnalyzeError::wrong_type(field, "must be a string")),
            }
        };
        let optional_string = |field: &'static str| -> error::Result<Option<String>> {
            match obj.get(field) {
                None | Some(serde_json::Value::Null) => Ok(None),
                Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(AnalyzeError::wrong_type(field, "must be a string")),
            }
        };

        let html = required_string("html")?;
        let title = required_string("title")?;
        let excerpt_or_description = optional_string("excerptOrDescription")?;
        let site_base_url = optional_string("siteBaseUrl")?.unwrap_or_default();
        let favicon_exists = match obj.get("faviconExists") {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Bool(b)) => *b,
            Some(_) => {
                return Err(AnalyzeError::wrong_type(
                    "faviconExists",
                    "must be a boolean",
                ))
            }
        };

        Ok(Self {
            html,
            title,
            excerpt_or_description,
            site_base_url,
            favicon_exists,
        })
    }
}

/// Heading level range recognized by the extractor
pub const HEADING_LEVELS: std::ops::RangeInclusive<u8> = 1..=6;

/// Occurrences of each heading level (h1 through h6)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts {
    pub h1: u32,
    pub h2: u32,
    pub h3: u32,
    pub h4: u32,
    pub h5: u32,
    pub h6: u32,
}

impl HeadingCounts {
    /// Build counts from a sequence of matched levels; levels outside 1..=6 are ignored
    pub fn from_levels(levels: impl IntoIterator<Item = u8>) -> Self {
        let mut counts = [0u32; 6];
        for level in levels {
            if HEADING_LEVELS.contains(&level) {
                counts[(level - 1) as usize] += 1;
            }
        }
        let [h1, h2, h3, h4, h5, h6] = counts;
        Self {
            h1,
            h2,
            h3,
            h4,
            h5,
            h6,
        }
    }

    /// Count for a level (0 for levels outside 1..=6)
    pub fn count(&self, level: u8) -> u32 {
        match level {
            1 => self.h1,
            2 => self.h2,
            3 => self.h3,
            4 => self.h4,
            5 => self.h5,
            6 => self.h6,
            _ => 0,
        }
    }

    pub fn total(&self) -> u32 {
        HEADING_LEVELS.map(|level| self.count(level)).sum()
    }
}

/// Image alt attribute coverage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total: u32,
    /// Images with a non-empty alt attribute
    pub with_alt: u32,
    /// Images with `alt=""`
    pub with_empty_alt: u32,
    /// Images without any alt attribute
    pub missing_alt: u32,
}

impl ImageStats {
    /// Images that give no text alternative (missing or empty alt)
    pub fn lacking_alt(&self) -> u32 {
        self.missing_alt + self.with_empty_alt
    }
}

/// Anchor classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    pub total: u32,
    pub internal: u32,
    pub external: u32,
}

/// Optimal title length, in characters
pub const TITLE_OPTIMAL_RANGE: std::ops::RangeInclusive<usize> = 30..=65;
/// Optimal description length, in characters
pub const DESCRIPTION_OPTIMAL_RANGE: std::ops::RangeInclusive<usize> = 120..=160;

/// Presence and length check for a title or description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCheck {
    pub value: String,
    pub present: bool,
    /// Length in characters
    pub length: usize,
    pub optimal_range_label: String,
}

impl FieldCheck {
    pub fn title(value: impl Into<String>) -> Self {
        let value = value.into();
        let length = text::char_len(&value);
        Self {
            present: length > 0,
            length,
            optimal_range_label: range_label(&TITLE_OPTIMAL_RANGE),
            value,
        }
    }

    pub fn description(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            present: !value.trim().is_empty(),
            length: text::char_len(&value),
            optimal_range_label: range_label(&DESCRIPTION_OPTIMAL_RANGE),
            value,
        }
    }

    pub fn within(&self, range: &std::ops::RangeInclusive<usize>) -> bool {
        range.contains(&self.length)
    }
}

fn range_label(range: &std::ops::RangeInclusive<usize>) -> String {
    format!("{}–{} chars", range.start(), range.end())
}

/// Raw keyword frequency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub word: String,
    pub count: u32,
}

/// Keyword frequency after plural/singular variants are merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedKeywordEntry {
    pub word: String,
    pub count: u32,
}

/// Severity color tier of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Good,
    Warning,
    Bad,
}

impl ScoreTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreTier::Good,
            50..=79 => ScoreTier::Warning,
            _ => ScoreTier::Bad,
        }
    }

    /// Hex color used by the presentation layer
    pub fn color(&self) -> &'static str {
        match self {
            ScoreTier::Good => "#46b450",
            ScoreTier::Warning => "#ffb900",
            ScoreTier::Bad => "#dc3232",
        }
    }
}

impl std::fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreTier::Good => write!(f, "good"),
            ScoreTier::Warning => write!(f, "warning"),
            ScoreTier::Bad => write!(f, "bad"),
        }
    }
}

/// SEO score with its tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Numeric score (0-100)
    pub value: u8,
    pub tier: ScoreTier,
}

impl Score {
    pub fn new(value: u8) -> Self {
        let tier = ScoreTier::from_score(value);
        Self { value, tier }
    }
}

impl Default for Score {
    fn default() -> Self {
        Score::new(0)
    }
}

/// Rubric factor a deduction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Title,
    Description,
    Images,
    Headings,
    Favicon,
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Factor::Title => write!(f, "Title"),
            Factor::Description => write!(f, "Description"),
            Factor::Images => write!(f, "Images"),
            Factor::Headings => write!(f, "Headings"),
            Factor::Favicon => write!(f, "Favicon"),
        }
    }
}

/// Rubric rules that can deduct points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    TitleMissing,
    TitleLength,
    DescriptionMissing,
    DescriptionLength,
    ImageAlt,
    H1Count,
    H2Count,
    FaviconMissing,
}

impl Rule {
    pub fn factor(&self) -> Factor {
        match self {
            Rule::TitleMissing | Rule::TitleLength => Factor::Title,
            Rule::DescriptionMissing | Rule::DescriptionLength => Factor::Description,
            Rule::ImageAlt => Factor::Images,
            Rule::H1Count | Rule::H2Count => Factor::Headings,
            Rule::FaviconMissing => Factor::Favicon,
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::TitleMissing => write!(f, "title-missing"),
            Rule::TitleLength => write!(f, "title-length"),
            Rule::DescriptionMissing => write!(f, "description-missing"),
            Rule::DescriptionLength => write!(f, "description-length"),
            Rule::ImageAlt => write!(f, "image-alt"),
            Rule::H1Count => write!(f, "h1-count"),
            Rule::H2Count => write!(f, "h2-count"),
            Rule::FaviconMissing => write!(f, "favicon-missing"),
        }
    }
}

/// One applied rubric deduction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deduction {
    pub rule: Rule,
    pub factor: Factor,
    /// Human-readable condition that triggered the deduction
    pub message: String,
    /// Points subtracted from 100
    pub points: u32,
}

impl Deduction {
    pub fn new(rule: Rule, message: impl Into<String>, points: u32) -> Self {
        Self {
            rule,
            factor: rule.factor(),
            message: message.into(),
            points,
        }
    }
}

/// Full diagnostic report for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub headings: HeadingCounts,
    pub images: ImageStats,
    pub links: LinkStats,
    pub title: FieldCheck,
    pub description: FieldCheck,
    pub favicon_exists: bool,
    /// Raw keyword frequencies, most frequent first (at most 50)
    pub keywords: Vec<KeywordEntry>,
    pub score: Score,
    /// Deductions that produced `score`, in rubric order
    pub deductions: Vec<Deduction>,
}

impl Report {
    /// Top keywords with plural variants merged (e.g. "photos" into "photo").
    ///
    /// Derived from `keywords` only, so consumers holding a serialized report
    /// can compute the same view themselves.
    pub fn normalized_keywords(&self) -> Vec<NormalizedKeywordEntry> {
        analyzer::keywords::aggregate(
            &self.keywords,
            analyzer::keywords::NORMALIZED_KEYWORD_LIMIT,
        )
    }
}

/// Report for a document loaded from disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Path to the analyzed document
    pub file_path: PathBuf,
    pub report: Report,
}
