//! Console reporter with colored output

use crate::analyzer::checks::CheckStatus;
use crate::analyzer::engine::{AggregateStats, PageAudit};
use crate::analyzer::keywords::NORMALIZED_KEYWORD_LIMIT;
use crate::analyzer::scoring::ScoreCalculator;
use crate::{FieldCheck, PageResult, Report, ScoreTier};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

/// Raw keywords listed outside verbose mode
const RAW_KEYWORDS_SHOWN: usize = 15;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single analysis result
    pub fn report(&self, result: &PageResult) {
        print!("{}", self.render(result));
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[PageResult], stats: &AggregateStats) {
        for result in results {
            self.report(result);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, result: &PageResult) {
        println!("{}", self.render_quiet(result));
    }

    /// Report the four quick checks
    pub fn report_audit(&self, audit: &PageAudit) {
        print!("{}", self.render_audit(audit));
    }

    pub fn render_quiet(&self, result: &PageResult) -> String {
        let score = &result.report.score;
        format!(
            "{}: {} ({})",
            result.file_path.display(),
            score.value,
            self.colorize_tier(score.tier)
        )
    }

    pub fn render(&self, result: &PageResult) -> String {
        let report = &result.report;
        let mut out = String::new();

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.bold(&format!("🔎 SEO Analysis: {}", result.file_path.display()))
        );
        let _ = writeln!(out);
        self.write_score(&mut out, report);
        self.write_facts(&mut out, report);
        self.write_keywords(&mut out, report);
        self.write_deductions(&mut out, report);
        out
    }

    fn write_score(&self, out: &mut String, report: &Report) {
        let tier = report.score.tier;
        let _ = writeln!(
            out,
            "   Score: {} {}",
            self.create_score_bar(report.score.value, tier),
            self.colorize_tier(tier)
        );
        let _ = writeln!(
            out,
            "   {}",
            self.dimmed(ScoreCalculator::tier_description(tier))
        );
        let _ = writeln!(out);
    }

    fn write_facts(&self, out: &mut String, report: &Report) {
        let _ = writeln!(out, "   {}", self.bold("Page Elements:"));
        let _ = writeln!(out, "   Title:        {}", self.field_line(&report.title));
        let _ = writeln!(
            out,
            "   Description:  {}",
            self.field_line(&report.description)
        );

        let h = &report.headings;
        let _ = writeln!(
            out,
            "   Headings:     H1 {} · H2 {} · H3 {} · H4 {} · H5 {} · H6 {}",
            h.h1, h.h2, h.h3, h.h4, h.h5, h.h6
        );

        let i = &report.images;
        let _ = writeln!(
            out,
            "   Images:       {} total, {} with alt, {} empty alt, {} missing alt",
            i.total, i.with_alt, i.with_empty_alt, i.missing_alt
        );

        let l = &report.links;
        let _ = writeln!(
            out,
            "   Links:        {} total, {} internal, {} external",
            l.total, l.internal, l.external
        );

        let favicon = if report.favicon_exists {
            self.pass("found")
        } else {
            self.fail("missing")
        };
        let _ = writeln!(out, "   Favicon:      {}", favicon);
        let _ = writeln!(out);
    }

    fn field_line(&self, field: &FieldCheck) -> String {
        if !field.present {
            return self.fail("missing").to_string();
        }
        format!(
            "{} \"{}\" ({} chars, optimal {})",
            self.pass(""),
            field.value,
            field.length,
            field.optimal_range_label
        )
    }

    fn write_keywords(&self, out: &mut String, report: &Report) {
        if report.keywords.is_empty() {
            return;
        }

        let shown = if self.verbose {
            report.keywords.len()
        } else {
            RAW_KEYWORDS_SHOWN
        };
        let raw: Vec<String> = report
            .keywords
            .iter()
            .take(shown)
            .map(|k| format!("{} ({})", k.word, k.count))
            .collect();
        let normalized: Vec<String> = report
            .normalized_keywords()
            .iter()
            .map(|k| format!("{} ({})", k.word, k.count))
            .collect();

        let _ = writeln!(out, "   {}", self.bold("Top Keywords:"));
        let _ = writeln!(out, "   {}", raw.join(", "));
        let _ = writeln!(
            out,
            "   {}",
            self.bold(&format!(
                "Normalized (top {}):",
                NORMALIZED_KEYWORD_LIMIT
            ))
        );
        let _ = writeln!(out, "   {}", normalized.join(", "));
        let _ = writeln!(out);
    }

    fn write_deductions(&self, out: &mut String, report: &Report) {
        if report.deductions.is_empty() {
            return;
        }

        let _ = writeln!(out, "   {}", self.bold("Deductions:"));
        for deduction in &report.deductions {
            let points = format!("-{:>2}", deduction.points);
            let _ = writeln!(
                out,
                "   {} {} {}",
                self.paint(points.red()),
                self.dimmed(&format!("[{}]", deduction.rule)),
                deduction.message
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "   {}", self.bold("Recommendations:"));
        for rec in ScoreCalculator::recommendations(&report.deductions) {
            let _ = writeln!(out, "   {} {}", self.paint("→".cyan()), rec);
        }
        let _ = writeln!(out);
    }

    pub fn render_audit(&self, audit: &PageAudit) -> String {
        let a = &audit.audit;
        let mut out = String::new();

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.bold(&format!("🔎 SEO Quick Audit: {}", audit.file_path.display()))
        );
        let _ = writeln!(
            out,
            "   Score: {} / {} {}",
            a.passed,
            a.total,
            self.colorize_tier(a.tier)
        );
        for check in &a.checks {
            let icon = match check.status {
                CheckStatus::Pass => self.paint("✓".green()),
                CheckStatus::Notice => self.paint("⚠".yellow()),
                CheckStatus::Fail => self.paint("✗".red()),
            };
            let _ = writeln!(out, "   {} {}", icon, check.message);
        }
        let _ = writeln!(out);
        out
    }

    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let rule = "═".repeat(60);

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", self.bold("Summary"));
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "   Pages analyzed:   {}", stats.files_analyzed);
        let _ = writeln!(
            out,
            "   Average score:    {} ({})",
            stats.average_score.value,
            self.colorize_tier(stats.average_score.tier)
        );
        let _ = writeln!(out, "   Total deductions: {}", stats.total_deductions);
        let _ = writeln!(
            out,
            "   Images w/o alt:   {} of {}",
            stats.images_lacking_alt, stats.total_images
        );
        let _ = writeln!(
            out,
            "   Links:            {} internal, {} external",
            stats.internal_links, stats.external_links
        );
        let _ = writeln!(out);
        out
    }

    fn paint(&self, s: ColoredString) -> ColoredString {
        if self.use_colors {
            s
        } else {
            s.clear()
        }
    }

    fn bold(&self, s: &str) -> ColoredString {
        self.paint(s.bold())
    }

    fn dimmed(&self, s: &str) -> ColoredString {
        self.paint(s.dimmed())
    }

    fn pass(&self, label: &str) -> ColoredString {
        self.paint(format!("✓ {}", label).trim_end().green())
    }

    fn fail(&self, label: &str) -> ColoredString {
        self.paint(format!("✗ {}", label).red())
    }

    fn colorize_tier(&self, tier: ScoreTier) -> ColoredString {
        let s = tier.to_string();
        self.paint(match tier {
            ScoreTier::Good => s.green().bold(),
            ScoreTier::Warning => s.yellow(),
            ScoreTier::Bad => s.red().bold(),
        })
    }

    fn create_score_bar(&self, score: u8, tier: ScoreTier) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}%", "█".repeat(filled), "░".repeat(empty), score);

        if self.use_colors {
            match tier {
                ScoreTier::Good => bar.green().to_string(),
                ScoreTier::Warning => bar.yellow().to_string(),
                ScoreTier::Bad => bar.red().to_string(),
            }
        } else {
            bar
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
