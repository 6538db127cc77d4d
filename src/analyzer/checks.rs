//! Quick audit: four pass/fail checks worth one point each.
//!
//! This is a lighter view than the 100-point rubric and is reported on its
//! own; the two are never combined.

use super::extractor::{classify_images, count_headings};
use crate::{ContentInput, FieldCheck, ScoreTier};
use serde::{Deserialize, Serialize};

/// The four quick checks, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuickCheck {
    Title,
    MetaDescription,
    SingleH1,
    ImageAlt,
}

impl std::fmt::Display for QuickCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuickCheck::Title => write!(f, "Title"),
            QuickCheck::MetaDescription => write!(f, "Meta description"),
            QuickCheck::SingleH1 => write!(f, "H1"),
            QuickCheck::ImageAlt => write!(f, "Image alt"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    /// Point awarded, but worth a look
    Notice,
    Fail,
}

impl CheckStatus {
    pub fn earns_point(&self) -> bool {
        !matches!(self, CheckStatus::Fail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub check: QuickCheck,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckOutcome {
    fn new(check: QuickCheck, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            check,
            status,
            message: message.into(),
        }
    }
}

/// Result of the four quick checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAudit {
    pub checks: Vec<CheckOutcome>,
    pub passed: u32,
    pub total: u32,
    pub tier: ScoreTier,
}

impl QuickAudit {
    /// Passed checks as a 0-100 percentage
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.passed * 100 / self.total) as u8
    }
}

/// Run the quick checks.
///
/// Only the explicit description counts; there is no fallback to the page
/// content here. An image with `alt=""` has an alt attribute and passes.
pub fn quick_audit(input: &ContentInput) -> QuickAudit {
    let mut checks = Vec::with_capacity(4);

    if FieldCheck::title(input.title.as_str()).present {
        checks.push(CheckOutcome::new(
            QuickCheck::Title,
            CheckStatus::Pass,
            "Title exists",
        ));
    } else {
        checks.push(CheckOutcome::new(
            QuickCheck::Title,
            CheckStatus::Fail,
            "Title missing",
        ));
    }

    let has_description = input
        .excerpt_or_description
        .as_deref()
        .is_some_and(|d| FieldCheck::description(d).present);
    if has_description {
        checks.push(CheckOutcome::new(
            QuickCheck::MetaDescription,
            CheckStatus::Pass,
            "Meta description exists",
        ));
    } else {
        checks.push(CheckOutcome::new(
            QuickCheck::MetaDescription,
            CheckStatus::Fail,
            "Meta description missing",
        ));
    }

    let h1 = count_headings(&input.html).h1;
    if h1 == 1 {
        checks.push(CheckOutcome::new(
            QuickCheck::SingleH1,
            CheckStatus::Pass,
            "One H1 tag found",
        ));
    } else {
        checks.push(CheckOutcome::new(
            QuickCheck::SingleH1,
            CheckStatus::Fail,
            format!("{} H1 tags found (should be exactly 1)", h1),
        ));
    }

    let images = classify_images(&input.html);
    let image_check = if images.total == 0 {
        CheckOutcome::new(QuickCheck::ImageAlt, CheckStatus::Notice, "No images found")
    } else if images.missing_alt == 0 {
        CheckOutcome::new(
            QuickCheck::ImageAlt,
            CheckStatus::Pass,
            "All images have alt text",
        )
    } else {
        CheckOutcome::new(
            QuickCheck::ImageAlt,
            CheckStatus::Fail,
            format!("{} image(s) missing alt text", images.missing_alt),
        )
    };
    checks.push(image_check);

    let passed = checks.iter().filter(|c| c.status.earns_point()).count() as u32;
    let total = checks.len() as u32;
    let tier = ScoreTier::from_score((passed * 100 / total) as u8);

    QuickAudit {
        checks,
        passed,
        total,
        tier,
    }
}
