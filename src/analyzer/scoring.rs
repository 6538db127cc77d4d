//! Score calculation for on-page SEO

use crate::{
    Deduction, FieldCheck, HeadingCounts, ImageStats, Rule, Score, ScoreTier,
    DESCRIPTION_OPTIMAL_RANGE, TITLE_OPTIMAL_RANGE,
};

/// Points each rubric rule can take away from 100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub title_missing: u32,
    pub title_length: u32,
    pub description_missing: u32,
    pub description_length: u32,
    /// Maximum, scaled by the share of images without alt text
    pub image_alt: u32,
    pub h1_count: u32,
    pub h2_count: u32,
    pub favicon_missing: u32,
}

impl ScoringWeights {
    pub const STANDARD: ScoringWeights = ScoringWeights {
        title_missing: 30,
        title_length: 15,
        description_missing: 20,
        description_length: 10,
        image_alt: 20,
        h1_count: 10,
        h2_count: 5,
        favicon_missing: 15,
    };
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Exactly this many H1 headings are expected
pub const EXPECTED_H1: u32 = 1;
/// At least this many H2 headings are expected
pub const MIN_H2: u32 = 2;

/// Calculator for the 100-point rubric
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Every rubric rule that applies, in rubric order.
    ///
    /// Rules that would deduct zero points are left out.
    pub fn deductions(
        title: &FieldCheck,
        description: &FieldCheck,
        images: &ImageStats,
        headings: &HeadingCounts,
        favicon_exists: bool,
    ) -> Vec<Deduction> {
        Self::deductions_with(
            &ScoringWeights::STANDARD,
            title,
            description,
            images,
            headings,
            favicon_exists,
        )
    }

    pub fn deductions_with(
        weights: &ScoringWeights,
        title: &FieldCheck,
        description: &FieldCheck,
        images: &ImageStats,
        headings: &HeadingCounts,
        favicon_exists: bool,
    ) -> Vec<Deduction> {
        let mut found = Vec::new();

        if !title.present {
            found.push(Deduction::new(
                Rule::TitleMissing,
                "Title is missing",
                weights.title_missing,
            ));
        } else if !title.within(&TITLE_OPTIMAL_RANGE) {
            found.push(Deduction::new(
                Rule::TitleLength,
                format!(
                    "Title is {} chars, outside the optimal {}",
                    title.length, title.optimal_range_label
                ),
                weights.title_length,
            ));
        }

        if !description.present {
            found.push(Deduction::new(
                Rule::DescriptionMissing,
                "Meta description is missing",
                weights.description_missing,
            ));
        } else if !description.within(&DESCRIPTION_OPTIMAL_RANGE) {
            found.push(Deduction::new(
                Rule::DescriptionLength,
                format!(
                    "Meta description is {} chars, outside the optimal {}",
                    description.length, description.optimal_range_label
                ),
                weights.description_length,
            ));
        }

        let image_points = image_alt_penalty(images, weights.image_alt);
        if image_points > 0 {
            found.push(Deduction::new(
                Rule::ImageAlt,
                format!(
                    "{} of {} images have no alt text",
                    images.lacking_alt(),
                    images.total
                ),
                image_points,
            ));
        }

        if headings.h1 != EXPECTED_H1 {
            found.push(Deduction::new(
                Rule::H1Count,
                format!("Expected exactly one H1 heading, found {}", headings.h1),
                weights.h1_count,
            ));
        }

        if headings.h2 < MIN_H2 {
            found.push(Deduction::new(
                Rule::H2Count,
                format!(
                    "Expected at least {} H2 headings, found {}",
                    MIN_H2, headings.h2
                ),
                weights.h2_count,
            ));
        }

        if !favicon_exists {
            found.push(Deduction::new(
                Rule::FaviconMissing,
                "Favicon is missing",
                weights.favicon_missing,
            ));
        }

        found
    }

    /// Final score from a list of deductions, floored at 0
    pub fn calculate(deductions: &[Deduction]) -> Score {
        let total: u32 = deductions.iter().map(|d| d.points).sum();
        let value = 100u32.saturating_sub(total);
        Score::new(value as u8)
    }

    /// Score a document's facts against the standard rubric
    pub fn score(
        title: &FieldCheck,
        description: &FieldCheck,
        images: &ImageStats,
        headings: &HeadingCounts,
        favicon_exists: bool,
    ) -> Score {
        Self::calculate(&Self::deductions(
            title,
            description,
            images,
            headings,
            favicon_exists,
        ))
    }

    /// Get a description of the tier
    pub fn tier_description(tier: ScoreTier) -> &'static str {
        match tier {
            ScoreTier::Good => "Good - the on-page basics are in place",
            ScoreTier::Warning => "Needs work - several on-page elements can be improved",
            ScoreTier::Bad => "Poor - important on-page elements are missing",
        }
    }

    /// One actionable recommendation per deduction
    pub fn recommendations(deductions: &[Deduction]) -> Vec<String> {
        let mut recs: Vec<String> = deductions
            .iter()
            .map(|d| {
                let rec = match d.rule {
                    Rule::TitleMissing => "Add a descriptive page title",
                    Rule::TitleLength => "Keep the title between 30 and 65 characters",
                    Rule::DescriptionMissing => {
                        "Write a meta description that summarizes the page"
                    }
                    Rule::DescriptionLength => {
                        "Keep the meta description between 120 and 160 characters"
                    }
                    Rule::ImageAlt => "Add descriptive alt text to every image",
                    Rule::H1Count => "Use exactly one H1 heading for the main topic",
                    Rule::H2Count => {
                        "Break the content into sections with at least two H2 headings"
                    }
                    Rule::FaviconMissing => "Add a favicon.ico to the site root",
                };
                rec.to_string()
            })
            .collect();

        if recs.is_empty() {
            recs.push("The page covers the on-page basics. Keep the content fresh.".to_string());
        }

        recs
    }
}

/// Share of images without alt text scaled to `max` points, rounded half up.
///
/// Integer arithmetic: `round(bad / total * max) == (2 * bad * max + total) / (2 * total)`.
fn image_alt_penalty(images: &ImageStats, max: u32) -> u32 {
    if images.total == 0 {
        return 0;
    }
    let bad = u64::from(images.lacking_alt().min(images.total));
    let total = u64::from(images.total);
    let max = u64::from(max);
    ((2 * bad * max + total) / (2 * total)) as u32
}
