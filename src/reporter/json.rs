//! JSON reporter for machine-readable output

use crate::analyzer::engine::{AggregateStats, PageAudit};
use crate::{NormalizedKeywordEntry, PageResult, Report};
use serde::Serialize;
use std::path::Path;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single analysis result as JSON
    pub fn report(&self, result: &PageResult) -> String {
        self.to_json(&JsonPage::from(result), "{}")
    }

    /// Report multiple results as JSON array
    pub fn report_many(&self, results: &[PageResult]) -> String {
        let pages: Vec<JsonPage> = results.iter().map(JsonPage::from).collect();
        self.to_json(&pages, "[]")
    }

    /// Report with summary
    pub fn report_with_summary(&self, results: &[PageResult], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results: results.iter().map(JsonPage::from).collect(),
            summary: JsonSummary {
                files_analyzed: stats.files_analyzed,
                average_score: stats.average_score.value,
                average_tier: stats.average_score.tier.to_string(),
                total_deductions: stats.total_deductions,
                total_images: stats.total_images,
                images_lacking_alt: stats.images_lacking_alt,
                total_links: stats.total_links,
                internal_links: stats.internal_links,
                external_links: stats.external_links,
            },
        };
        self.to_json(&output, "{}")
    }

    /// Report quick audits; a single audit is emitted as an object
    pub fn report_audits(&self, audits: &[PageAudit]) -> String {
        match audits {
            [single] => self.to_json(single, "{}"),
            _ => self.to_json(audits, "[]"),
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// A page report with the normalized keyword view filled in
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPage<'a> {
    file_path: &'a Path,
    #[serde(flatten)]
    report: &'a Report,
    normalized_keywords: Vec<NormalizedKeywordEntry>,
}

impl<'a> From<&'a PageResult> for JsonPage<'a> {
    fn from(result: &'a PageResult) -> Self {
        Self {
            file_path: &result.file_path,
            report: &result.report,
            normalized_keywords: result.report.normalized_keywords(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: Vec<JsonPage<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    files_analyzed: usize,
    average_score: u8,
    average_tier: String,
    total_deductions: usize,
    total_images: u32,
    images_lacking_alt: u32,
    total_links: u32,
    internal_links: u32,
    external_links: u32,
}
