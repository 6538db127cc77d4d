//! Config schema and deserialization

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Optional threshold override for matched files
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Optional site URL for matched files (e.g. a docs subsite)
    #[serde(default)]
    pub site_url: Option<String>,
}

/// Root config structure for .seoscoperc.json
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum score threshold (exit 1 if below). Default: 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Base URL of the site; links starting with it count as internal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,

    /// Favicon location, relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<PathBuf>,

    /// Glob patterns for files/directories to exclude from analysis
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Page file suffixes (default: .html, .htm)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub page_patterns: Vec<String>,

    /// Per-path configuration overrides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>, cli_site_url: Option<&str>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if let Some(url) = cli_site_url {
            self.site_url = Some(url.to_string());
        }
        self
    }

    /// Get effective config for a specific file path, applying overrides
    pub fn effective_for_file(&self, file_path: &Path) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            threshold: self.threshold,
            site_url: self.site_url.clone(),
        };

        // later overrides win
        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = Some(threshold);
                }
                if let Some(ref url) = override_cfg.site_url {
                    effective.site_url = Some(url.clone());
                }
            }
        }

        effective
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        let path_str = file_path.to_string_lossy();
        patterns.iter().any(|pattern| match globset::Glob::new(pattern) {
            Ok(glob) => {
                glob.compile_matcher().is_match(file_path)
                    || path_str.contains(pattern.trim_start_matches("**/"))
            }
            Err(_) => false,
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.site_url.is_none() {
            self.site_url = base.site_url;
        }
        if self.favicon.is_none() {
            self.favicon = base.favicon;
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.page_patterns.is_empty() {
            self.page_patterns = base.page_patterns;
        }

        // base overrides first so ours win
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }

    /// Get page file suffixes
    pub fn get_page_patterns(&self) -> Vec<&str> {
        if self.page_patterns.is_empty() {
            vec![".html", ".htm"]
        } else {
            self.page_patterns.iter().map(|s| s.as_str()).collect()
        }
    }

    /// Whether a file name ends with one of the page suffixes (case-insensitive)
    pub fn is_page(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.get_page_patterns()
            .iter()
            .any(|suffix| name.ends_with(&suffix.to_lowercase()))
    }
}

/// Effective configuration for a specific file (after applying overrides)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub threshold: Option<u8>,
    pub site_url: Option<String>,
}
