//! Report assembly: the single entry point into the analysis pipeline

use super::extractor::{description_candidate, extract};
use super::keywords::analyze_keywords;
use super::scoring::ScoreCalculator;
use crate::{AnalyzeError, ContentInput, FieldCheck, Report};

/// Analyze one document.
///
/// The description check uses `excerpt_or_description` when it holds
/// something other than whitespace, otherwise the first characters of the
/// content stand in for it.
pub fn analyze(input: &ContentInput) -> Report {
    let extraction = extract(&input.html, &input.site_base_url);

    let title = FieldCheck::title(input.title.as_str());
    let description = match input.excerpt_or_description.as_deref() {
        Some(text) if !text.trim().is_empty() => FieldCheck::description(text),
        _ => FieldCheck::description(description_candidate(&input.html)),
    };

    let deductions = ScoreCalculator::deductions(
        &title,
        &description,
        &extraction.images,
        &extraction.headings,
        input.favicon_exists,
    );
    let score = ScoreCalculator::calculate(&deductions);

    Report {
        headings: extraction.headings,
        images: extraction.images,
        links: extraction.links,
        title,
        description,
        favicon_exists: input.favicon_exists,
        keywords: analyze_keywords(&input.html),
        score,
        deductions,
    }
}

/// Validate an untyped JSON request, then analyze it
pub fn analyze_value(value: &serde_json::Value) -> Result<Report, AnalyzeError> {
    let input = ContentInput::from_value(value)?;
    Ok(analyze(&input))
}
