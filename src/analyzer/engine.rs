//! Analysis engine - loads pages from disk and runs the analyzer on them

use super::checks::{quick_audit, QuickAudit};
use super::report::analyze;
use crate::config::Config;
use crate::source::{DocumentSource, LoadOptions};
use crate::{PageResult, Score};
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Quick audit of a page loaded from disk
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAudit {
    pub file_path: PathBuf,
    pub audit: QuickAudit,
}

/// Runs the analyzer over files, filling in context from config and overrides
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    /// Overrides that apply to every analyzed file
    options: LoadOptions,
}

impl AnalysisEngine {
    /// Create a new analysis engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this title for every page instead of its `<title>`
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    /// Use this description for every page instead of its meta description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    /// Site URL that wins over config and per-file overrides
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.options.site_url = Some(url.into());
        self
    }

    /// Skip favicon detection
    pub fn with_favicon(mut self, exists: bool) -> Self {
        self.options.favicon_exists = Some(exists);
        self
    }

    /// Favicon location that wins over the config's
    pub fn with_favicon_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.favicon_path = Some(path.into());
        self
    }

    /// Root of the site being analyzed; its `favicon.ico` applies to every page
    pub fn with_site_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.options.site_root = Some(root.into());
        self
    }

    /// Load options for one file: engine overrides first, then config
    fn options_for(&self, path: &Path, config: Option<&Config>) -> LoadOptions {
        let mut options = self.options.clone();
        if let Some(config) = config {
            let effective = config.effective_for_file(path);
            if options.site_url.is_none() {
                options.site_url = effective.site_url;
            }
            if options.favicon_path.is_none() {
                options.favicon_path = config.favicon.clone();
            }
        }
        options
    }

    fn load(&self, path: &Path, config: Option<&Config>) -> Result<DocumentSource> {
        DocumentSource::load(path, &self.options_for(path, config))
    }

    /// Analyze a page and return the full report
    pub fn analyze(&self, path: &Path, config: Option<&Config>) -> Result<PageResult> {
        let document = self.load(path, config)?;
        let report = analyze(&document.input);
        debug!(
            file_path = %path.display(),
            score = report.score.value,
            deductions = report.deductions.len(),
            "analyzed page"
        );
        Ok(PageResult {
            file_path: document.path,
            report,
        })
    }

    /// Run the four quick checks on a page
    pub fn audit(&self, path: &Path, config: Option<&Config>) -> Result<PageAudit> {
        let document = self.load(path, config)?;
        Ok(PageAudit {
            audit: quick_audit(&document.input),
            file_path: document.path,
        })
    }

    /// Analyze multiple pages sequentially
    pub fn analyze_many(&self, paths: &[&Path], config: Option<&Config>) -> Vec<Result<PageResult>> {
        paths.iter().map(|p| self.analyze(p, config)).collect()
    }

    /// Analyze multiple pages in parallel using rayon
    pub fn analyze_parallel(
        &self,
        paths: &[PathBuf],
        config: Option<&Config>,
    ) -> Vec<Result<PageResult>> {
        use rayon::prelude::*;

        info!(files = paths.len(), "analyzing pages in parallel");
        paths.par_iter().map(|p| self.analyze(p, config)).collect()
    }

    /// Get aggregate stats from multiple results
    pub fn aggregate_stats(results: &[PageResult]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let total_score: u32 = results
            .iter()
            .map(|r| u32::from(r.report.score.value))
            .sum();
        let avg_score = (total_score / results.len() as u32) as u8;

        let mut stats = AggregateStats {
            files_analyzed: results.len(),
            average_score: Score::new(avg_score),
            ..AggregateStats::default()
        };
        for result in results {
            let report = &result.report;
            stats.total_deductions += report.deductions.len();
            stats.total_images += report.images.total;
            stats.images_lacking_alt += report.images.lacking_alt();
            stats.total_links += report.links.total;
            stats.internal_links += report.links.internal;
            stats.external_links += report.links.external;
        }
        stats
    }
}

/// Aggregate statistics from multiple page analyses
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregateStats {
    /// Number of pages analyzed
    pub files_analyzed: usize,
    /// Average score across all pages (rounded down)
    pub average_score: Score,
    /// Total number of deductions across all pages
    pub total_deductions: usize,
    pub total_images: u32,
    /// Images with a missing or empty alt attribute
    pub images_lacking_alt: u32,
    pub total_links: u32,
    pub internal_links: u32,
    pub external_links: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScoreTier;
    use std::fs;
    use tempfile::TempDir;

    const GOOD_PAGE: &str = r#"<html><head>
<title>A complete guide to growing tomatoes at home</title>
<meta name="description" content="Everything you need to know about growing tomatoes at home: choosing varieties, planting, watering, feeding and harvesting your crop.">
</head><body>
<h1>Growing tomatoes</h1>
<h2>Choosing varieties</h2>
<p>Tomatoes come in many shapes.</p>
<h2>Planting</h2>
<img src="seedling.jpg" alt="Tomato seedling">
<a href="/guides/peppers">Peppers</a>
<a href="https://other.org">Other</a>
</body></html>"#;

    fn write_page(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_analyze_good_page() {
        let dir = TempDir::new().unwrap();
        let page = write_page(dir.path(), "index.html", GOOD_PAGE);
        fs::write(dir.path().join("favicon.ico"), b"ico").unwrap();

        let engine = AnalysisEngine::new().with_site_url("https://example.com");
        let result = engine.analyze(&page, None).unwrap();

        assert_eq!(result.file_path, page);
        assert_eq!(result.report.score.value, 100, "{:?}", result.report.deductions);
        assert_eq!(result.report.score.tier, ScoreTier::Good);
        assert_eq!(result.report.links.internal, 1);
        assert_eq!(result.report.links.external, 1);
    }

    #[test]
    fn test_missing_favicon_detected() {
        let dir = TempDir::new().unwrap();
        let page = write_page(dir.path(), "index.html", GOOD_PAGE);

        let result = AnalysisEngine::new().analyze(&page, None).unwrap();
        assert!(!result.report.favicon_exists);
        assert_eq!(result.report.score.value, 85);
    }

    #[test]
    fn test_engine_overrides() {
        let dir = TempDir::new().unwrap();
        let page = write_page(dir.path(), "index.html", GOOD_PAGE);

        let engine = AnalysisEngine::new()
            .with_title("Short")
            .with_favicon(true);
        let result = engine.analyze(&page, None).unwrap();
        assert_eq!(result.report.title.value, "Short");
        assert!(result.report.favicon_exists);
        assert_eq!(result.report.score.value, 85);
    }

    #[test]
    fn test_site_root_favicon_covers_nested_pages() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("guides")).unwrap();
        let page = write_page(&dir.path().join("guides"), "tomatoes.html", GOOD_PAGE);
        fs::write(dir.path().join("favicon.ico"), b"ico").unwrap();

        let result = AnalysisEngine::new()
            .with_site_url("https://example.com")
            .with_site_root(dir.path())
            .analyze(&page, None)
            .unwrap();
        assert!(result.report.favicon_exists);
        assert_eq!(result.report.score.value, 100);
    }

    #[test]
    fn test_config_site_url_and_favicon() {
        let dir = TempDir::new().unwrap();
        let page = write_page(dir.path(), "index.html", GOOD_PAGE);
        let icon = write_page(dir.path(), "icon.png", "png");

        let config = Config {
            site_url: Some("https://other.org".to_string()),
            favicon: Some(icon),
            ..Config::default()
        };
        let result = AnalysisEngine::new().analyze(&page, Some(&config)).unwrap();
        assert_eq!(result.report.links.internal, 2);
        assert!(result.report.favicon_exists);
    }

    #[test]
    fn test_engine_site_url_beats_config() {
        let dir = TempDir::new().unwrap();
        let page = write_page(dir.path(), "index.html", GOOD_PAGE);
        let config = Config {
            site_url: Some("https://other.org".to_string()),
            ..Config::default()
        };
        let result = AnalysisEngine::new()
            .with_site_url("https://example.com")
            .analyze(&page, Some(&config))
            .unwrap();
        assert_eq!(result.report.links.internal, 1);
    }

    #[test]
    fn test_analyze_missing_file_is_error() {
        let engine = AnalysisEngine::new();
        assert!(engine.analyze(Path::new("/no/such/page.html"), None).is_err());
    }

    #[test]
    fn test_audit() {
        let dir = TempDir::new().unwrap();
        let page = write_page(dir.path(), "index.html", GOOD_PAGE);
        let audit = AnalysisEngine::new().audit(&page, None).unwrap();
        assert_eq!(audit.audit.passed, 4);
        assert_eq!(audit.file_path, page);
    }

    #[test]
    fn test_analyze_many() {
        let dir = TempDir::new().unwrap();
        let a = write_page(dir.path(), "a.html", GOOD_PAGE);
        let b = write_page(dir.path(), "b.html", "<p>bare</p>");

        let engine = AnalysisEngine::new().with_favicon(true);
        let results = engine.analyze_many(&[a.as_path(), b.as_path()], None);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().report.score.value, 100);
        // -30 title, -10 short stand-in description, -10 h1, -5 h2
        assert_eq!(results[1].as_ref().unwrap().report.score.value, 45);
    }

    #[test]
    fn test_analyze_parallel() {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..6)
            .map(|i| write_page(dir.path(), &format!("p{}.html", i), GOOD_PAGE))
            .collect();

        let results = AnalysisEngine::new().analyze_parallel(&paths, None);
        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_aggregate_stats_empty() {
        let stats = AnalysisEngine::aggregate_stats(&[]);
        assert_eq!(stats.files_analyzed, 0);
        assert_eq!(stats.total_deductions, 0);
        assert_eq!(stats.average_score.value, 0);
    }

    #[test]
    fn test_aggregate_stats_multiple() {
        let dir = TempDir::new().unwrap();
        let a = write_page(dir.path(), "a.html", GOOD_PAGE);
        let b = write_page(dir.path(), "b.html", "<img src=x><a href='/x'>x</a>");

        let engine = AnalysisEngine::new().with_favicon(true);
        let r1 = engine.analyze(&a, None).unwrap();
        let r2 = engine.analyze(&b, None).unwrap();

        let stats = AnalysisEngine::aggregate_stats(&[r1.clone(), r2.clone()]);
        assert_eq!(stats.files_analyzed, 2);
        assert_eq!(
            stats.total_deductions,
            r1.report.deductions.len() + r2.report.deductions.len()
        );
        assert_eq!(stats.total_images, 2);
        assert_eq!(stats.images_lacking_alt, 1);
        assert_eq!(stats.total_links, 3);
        let expected_avg =
            ((u32::from(r1.report.score.value) + u32::from(r2.report.score.value)) / 2) as u8;
        assert_eq!(stats.average_score.value, expected_avg);
    }
}
