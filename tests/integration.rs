//! Integration tests: the analysis pipeline through the public API and
//! against the pages in test-fixtures/site/

use seoscope::analyzer::extractor::classify_images;
use seoscope::analyzer::keywords::aggregate;
use seoscope::analyzer::{AnalysisEngine, ScoreCalculator};
use seoscope::{
    analyze, analyze_value, ContentInput, FieldCheck, HeadingCounts, ImageStats, KeywordEntry,
    Rule, ScoreTier,
};
use serde_json::json;
use std::path::Path;

const SITE_ROOT: &str = "test-fixtures/site";

fn analyze_fixture(path: &str) -> seoscope::PageResult {
    AnalysisEngine::new()
        .with_site_url("https://example.com")
        .with_site_root(SITE_ROOT)
        .analyze(Path::new(path), None)
        .unwrap_or_else(|e| panic!("analyze({}) failed: {}", path, e))
}

fn headings(h1: u32, h2: u32) -> HeadingCounts {
    HeadingCounts {
        h1,
        h2,
        ..HeadingCounts::default()
    }
}

// --- Rubric scenarios ---

#[test]
fn short_title_and_missing_description_score_65() {
    let deductions = ScoreCalculator::deductions(
        &FieldCheck::title("Hello World"),
        &FieldCheck::description(""),
        &ImageStats::default(),
        &headings(1, 2),
        true,
    );
    let score = ScoreCalculator::calculate(&deductions);

    let points: Vec<(Rule, u32)> = deductions.iter().map(|d| (d.rule, d.points)).collect();
    assert_eq!(
        points,
        vec![(Rule::TitleLength, 15), (Rule::DescriptionMissing, 20)]
    );
    assert_eq!(score.value, 65);
    assert_eq!(score.tier, ScoreTier::Warning);
}

#[test]
fn missing_title_and_favicon_score_55() {
    let images = ImageStats {
        total: 10,
        with_alt: 10,
        ..ImageStats::default()
    };
    let deductions = ScoreCalculator::deductions(
        &FieldCheck::title(""),
        &FieldCheck::description("d".repeat(140)),
        &images,
        &headings(1, 3),
        false,
    );
    let score = ScoreCalculator::calculate(&deductions);

    let points: Vec<(Rule, u32)> = deductions.iter().map(|d| (d.rule, d.points)).collect();
    assert_eq!(
        points,
        vec![(Rule::TitleMissing, 30), (Rule::FaviconMissing, 15)]
    );
    assert_eq!(score.value, 55);
    assert_eq!(score.tier, ScoreTier::Warning);
}

#[test]
fn image_alt_classification() {
    let stats = classify_images("<img src=x><img src=y alt=''><img src=z alt='cat'>");
    assert_eq!(
        stats,
        ImageStats {
            total: 3,
            with_alt: 1,
            with_empty_alt: 1,
            missing_alt: 1,
        }
    );
}

#[test]
fn plural_keywords_merge() {
    let raw = vec![
        KeywordEntry {
            word: "photos".to_string(),
            count: 5,
        },
        KeywordEntry {
            word: "photo".to_string(),
            count: 2,
        },
    ];
    let merged = aggregate(&raw, 15);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].word, "photo");
    assert_eq!(merged[0].count, 7);
}

#[test]
fn two_h1_tags_deduct_10() {
    let input = ContentInput::new(
        "<h1>One</h1>\n<h1>Two</h1>\n<h2>a</h2>\n<h2>b</h2>",
        "A title that is comfortably within the range",
    )
    .with_description("x".repeat(130))
    .with_favicon(true);
    let report = analyze(&input);

    assert_eq!(report.headings.h1, 2);
    assert_eq!(report.deductions.len(), 1);
    assert_eq!(report.deductions[0].rule, Rule::H1Count);
    assert_eq!(report.deductions[0].points, 10);
    assert_eq!(report.score.value, 90);
}

// --- Untyped requests ---

#[test]
fn analyze_value_matches_typed_analysis() {
    let value = json!({
        "html": "<h1>Guide</h1>\n<p>gardens gardening garden</p>",
        "title": "Hello World",
        "siteBaseUrl": "https://example.com",
        "faviconExists": true
    });
    let from_value = analyze_value(&value).unwrap();
    let typed = analyze(
        &ContentInput::new("<h1>Guide</h1>\n<p>gardens gardening garden</p>", "Hello World")
            .with_site_base_url("https://example.com")
            .with_favicon(true),
    );
    assert_eq!(from_value, typed);
}

#[test]
fn analyze_value_rejects_non_string_html() {
    let err = analyze_value(&json!({ "html": 5, "title": "t" })).unwrap_err();
    assert!(err.to_string().contains("html"), "{}", err);
}

// --- Fixture pages ---

#[test]
fn good_fixture_scores_100() {
    let r = analyze_fixture("test-fixtures/site/index.html");
    assert_eq!(r.report.score.value, 100, "{:?}", r.report.deductions);
    assert!(r.report.deductions.is_empty());
    assert_eq!(r.report.title.value, "A complete guide to growing tomatoes at home");
    assert_eq!(r.report.links.internal, 1);
    assert_eq!(r.report.links.external, 1);
}

#[test]
fn weak_fixture_collects_every_deduction() {
    let r = analyze_fixture("test-fixtures/site/weak.html");
    assert_eq!(r.report.score.value, 25);
    assert_eq!(r.report.score.tier, ScoreTier::Bad);

    let rules: Vec<Rule> = r.report.deductions.iter().map(|d| d.rule).collect();
    assert_eq!(
        rules,
        vec![
            Rule::TitleMissing,
            Rule::DescriptionLength,
            Rule::ImageAlt,
            Rule::H1Count,
            Rule::H2Count,
        ]
    );
    let normalized = r.report.normalized_keywords();
    assert_eq!(normalized[0].word, "photo");
    assert_eq!(normalized[0].count, 4);
}

#[test]
fn nested_fixture_reads_meta_in_any_attribute_order() {
    let r = analyze_fixture("test-fixtures/site/blog/post.html");
    assert!(r.report.description.within(&seoscope::DESCRIPTION_OPTIMAL_RANGE));
    // the site-root favicon.ico covers pages in subdirectories
    assert!(r.report.favicon_exists);
    assert_eq!(r.report.images.with_empty_alt, 1);
    assert_eq!(r.report.score.value, 75);
}

#[test]
fn directory_stats_aggregate_all_pages() {
    let results: Vec<_> = [
        "test-fixtures/site/index.html",
        "test-fixtures/site/weak.html",
        "test-fixtures/site/blog/post.html",
    ]
    .iter()
    .map(|p| analyze_fixture(p))
    .collect();

    let stats = AnalysisEngine::aggregate_stats(&results);
    assert_eq!(stats.files_analyzed, 3);
    assert_eq!(stats.average_score.value, 66);
    assert_eq!(stats.total_images, 3);
    assert_eq!(stats.images_lacking_alt, 2);
}

#[test]
fn bad_pages_score_lower_than_good_page() {
    let good = analyze_fixture("test-fixtures/site/index.html");
    let weak = analyze_fixture("test-fixtures/site/weak.html");
    let post = analyze_fixture("test-fixtures/site/blog/post.html");
    assert!(weak.report.score.value < post.report.score.value);
    assert!(post.report.score.value < good.report.score.value);
}
