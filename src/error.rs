//! Error types for the analysis engine
//!
//! Only malformed requests are errors. Everything the engine finds inside a
//! document (no images, no headings, broken markup) is reported as data.

use thiserror::Error;

/// Errors raised before an analysis starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    /// A required field is missing or has the wrong type
    #[error("Invalid input: `{field}` {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },
}

impl AnalyzeError {
    pub(crate) fn missing(field: &'static str) -> Self {
        AnalyzeError::InvalidInput {
            field,
            reason: "is required",
        }
    }

    pub(crate) fn wrong_type(field: &'static str, expected: &'static str) -> Self {
        AnalyzeError::InvalidInput {
            field,
            reason: expected,
        }
    }
}

/// Result alias for engine entry points
pub type Result<T> = std::result::Result<T, AnalyzeError>;
