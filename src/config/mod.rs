//! Configuration loading for seoscope

mod schema;

pub use schema::{Config, ConfigOverride, EffectiveConfig};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILENAME: &str = ".seoscoperc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            debug!(config_path = %path.display(), "loading config");
            load_config_with_extends(&path, &mut HashSet::new())
        }
        None => {
            debug!(work_dir = %work_dir.display(), "no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    // favicon is relative to the file that names it, not to the final config
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    if let Some(favicon) = config.favicon.take() {
        config.favicon = Some(if favicon.is_absolute() {
            favicon
        } else {
            config_dir.join(favicon)
        });
    }

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    debug!(
        config_path = %config_path.display(),
        extends = %extends_path.display(),
        "resolving extends"
    );
    load_config_with_extends(&extends_path, visited)
}

/// Search for .seoscoperc.json in directory and its parents
fn find_config_in_parents(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir;
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Build a GlobSet from ignore patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().context("Failed to compile ignore patterns")
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

/// Default config written by `seoscope init`
pub fn default_config(threshold: Option<u8>, site_url: Option<&str>) -> Config {
    Config {
        threshold: Some(threshold.unwrap_or(70)),
        site_url: Some(site_url.unwrap_or("https://example.com").to_string()),
        favicon: Some(PathBuf::from("favicon.ico")),
        ignore: vec![
            "**/node_modules/**".to_string(),
            "**/drafts/**".to_string(),
        ],
        page_patterns: vec![".html".to_string(), ".htm".to_string()],
        ..Config::default()
    }
}
