//! seoscope: On-page SEO analyzer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use seoscope::analyzer::{AnalysisEngine, PageAudit};
use seoscope::config::{
    build_ignore_set, default_config, is_ignored, load_config, Config, CONFIG_FILENAME,
};
use seoscope::reporter::{ConsoleReporter, JsonReporter};
use seoscope::PageResult;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// seoscope: On-page SEO analyzer for HTML pages
#[derive(Parser, Debug)]
#[command(name = "seoscope")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// HTML file or directory to analyze (omit when using a subcommand)
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (one line per page)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output and debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Run the four quick checks instead of the full score
    #[arg(long)]
    quick: bool,

    /// Title to use instead of the page's <title>
    #[arg(long)]
    title: Option<String>,

    /// Description to use instead of the page's meta description
    #[arg(long)]
    description: Option<String>,

    /// Site base URL; links starting with it count as internal
    #[arg(long, value_name = "URL")]
    site_url: Option<String>,

    /// Favicon file to check (default: favicon.ico next to each page)
    #[arg(long, value_name = "PATH", conflicts_with_all = ["has_favicon", "no_favicon"])]
    favicon: Option<PathBuf>,

    /// Treat the favicon as present without checking
    #[arg(long, conflicts_with = "no_favicon")]
    has_favicon: bool,

    /// Treat the favicon as missing without checking
    #[arg(long)]
    no_favicon: bool,

    /// Path to config file (default: search .seoscoperc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run analysis in parallel (default for directories with many pages)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run MCP server (stdio JSON-RPC)
    Mcp,

    /// Create .seoscoperc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Site base URL
        #[arg(long, value_name = "URL")]
        site_url: Option<String>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// Log to stderr so JSON on stdout stays clean; RUST_LOG wins over --verbose
fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(mut args: Args) -> Result<ExitCode> {
    if let Some(cmd) = args.command.take() {
        return match cmd {
            Commands::Mcp => seoscope::mcp::run_mcp_server().map(|_| ExitCode::SUCCESS),
            Commands::Init {
                threshold,
                site_url,
                dir,
            } => run_init(threshold, site_url.as_deref(), dir.as_deref()),
        };
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("A path to an HTML file or directory is required");
    };

    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    // CLI flags override config file
    let config = load_config(work_dir, args.config.as_deref())?
        .merge_with_cli(args.threshold, args.site_url.as_deref());

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let pages = collect_page_files(&path, ignore_set.as_ref(), &config)?;
    if pages.is_empty() {
        eprintln!("{}: No HTML pages found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }
    info!(pages = pages.len(), path = %path.display(), "collected pages");

    if let Some(jobs) = args.jobs {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
        {
            warn!(error = %e, "could not configure thread pool");
        }
    }

    let engine = build_engine(&args);

    if args.quick {
        return run_quick(&args, &engine, &pages, &config);
    }

    let use_parallel = args.parallel || pages.len() > 10;
    let outcomes = if use_parallel {
        engine.analyze_parallel(&pages, Some(&config))
    } else {
        let refs: Vec<&Path> = pages.iter().map(PathBuf::as_path).collect();
        engine.analyze_many(&refs, Some(&config))
    };
    let (results, had_errors) = split_outcomes(&pages, outcomes, args.quiet);

    if results.is_empty() {
        eprintln!("{}: All pages failed to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = AnalysisEngine::aggregate_stats(&results);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            println!("{}", reporter.report(&results[0]));
        } else {
            println!("{}", reporter.report_with_summary(&results, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for result in &results {
            reporter.report_quiet(result);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(&results, &stats);
        }
    }

    let score = if results.len() == 1 {
        results[0].report.score.value
    } else {
        stats.average_score.value
    };
    let threshold = threshold_for(&args, &config, &results);
    if let Some(code) = check_threshold(score, threshold, &args) {
        return Ok(code);
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn build_engine(args: &Args) -> AnalysisEngine {
    let mut engine = AnalysisEngine::new();
    // an analyzed directory is the site root
    if let Some(root) = args.path.as_ref().filter(|p| p.is_dir()) {
        engine = engine.with_site_root(root.clone());
    }
    if let Some(ref title) = args.title {
        engine = engine.with_title(title.clone());
    }
    if let Some(ref description) = args.description {
        engine = engine.with_description(description.clone());
    }
    if let Some(ref url) = args.site_url {
        engine = engine.with_site_url(url.clone());
    }
    if let Some(ref favicon) = args.favicon {
        engine = engine.with_favicon_path(favicon.clone());
    }
    if args.has_favicon {
        engine = engine.with_favicon(true);
    } else if args.no_favicon {
        engine = engine.with_favicon(false);
    }
    engine
}

fn run_quick(
    args: &Args,
    engine: &AnalysisEngine,
    pages: &[PathBuf],
    config: &Config,
) -> Result<ExitCode> {
    let mut audits: Vec<PageAudit> = Vec::with_capacity(pages.len());
    let mut had_errors = false;
    for page in pages {
        match engine.audit(page, Some(config)) {
            Ok(audit) => audits.push(audit),
            Err(e) => {
                had_errors = true;
                report_failure(page, &e, args.quiet);
            }
        }
    }

    if audits.is_empty() {
        eprintln!("{}: All pages failed to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }

    if args.json {
        println!("{}", JsonReporter::new().pretty().report_audits(&audits));
    } else if args.quiet {
        for audit in &audits {
            println!(
                "{}: {}/{} ({})",
                audit.file_path.display(),
                audit.audit.passed,
                audit.audit.total,
                audit.audit.tier
            );
        }
    } else {
        let reporter = ConsoleReporter::new();
        for audit in &audits {
            reporter.report_audit(audit);
        }
    }

    let total: u32 = audits.iter().map(|a| u32::from(a.audit.percent())).sum();
    let score = (total / audits.len() as u32) as u8;
    let threshold = args.threshold.or(config.threshold);
    if let Some(code) = check_threshold(score, threshold, args) {
        return Ok(code);
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// CLI threshold, else the page's effective one (single page) or the config's
fn threshold_for(args: &Args, config: &Config, results: &[PageResult]) -> Option<u8> {
    if args.threshold.is_some() {
        return args.threshold;
    }
    match results {
        [single] => config.effective_for_file(&single.file_path).threshold,
        _ => config.threshold,
    }
}

fn check_threshold(score: u8, threshold: Option<u8>, args: &Args) -> Option<ExitCode> {
    let threshold = threshold?;
    debug!(score, threshold, "checking threshold");
    if score >= threshold {
        return None;
    }
    if !args.quiet && !args.json {
        eprintln!(
            "\n{}: Score {} is below threshold {}",
            "Failed".red().bold(),
            score,
            threshold
        );
    }
    Some(ExitCode::from(1))
}

fn split_outcomes(
    pages: &[PathBuf],
    outcomes: Vec<Result<PageResult>>,
    quiet: bool,
) -> (Vec<PageResult>, bool) {
    let mut results = Vec::with_capacity(outcomes.len());
    let mut had_errors = false;
    for (page, outcome) in pages.iter().zip(outcomes) {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                had_errors = true;
                report_failure(page, &e, quiet);
            }
        }
    }
    (results, had_errors)
}

fn report_failure(page: &Path, error: &anyhow::Error, quiet: bool) {
    warn!(file_path = %page.display(), error = %error, "analysis failed");
    if !quiet {
        eprintln!(
            "{}: Failed to analyze {}: {:#}",
            "Error".red(),
            page.display(),
            error
        );
    }
}

fn run_init(threshold: Option<u8>, site_url: Option<&str>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(cwd.as_path());
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let config = default_config(threshold, site_url);
    let json = serde_json::to_string_pretty(&config).context("Failed to encode config")?;
    std::fs::write(&config_path, format!("{}\n", json))
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}, siteUrl={}",
        "Done".green().bold(),
        config_path.display(),
        config.threshold.unwrap_or_default(),
        config.site_url.as_deref().unwrap_or_default()
    );
    Ok(ExitCode::SUCCESS)
}

fn collect_page_files(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        // an explicitly named file is analyzed whatever its extension
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if !entry.file_type().is_file() || !config.is_page(file_path) {
            continue;
        }
        if let Some(set) = ignore_set {
            if is_ignored(file_path, set) {
                debug!(file_path = %file_path.display(), "ignored by config");
                continue;
            }
        }
        files.push(file_path.to_path_buf());
    }

    // sort for consistent output
    files.sort();
    Ok(files)
}
