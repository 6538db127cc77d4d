//! Analyzer module - on-page SEO analysis pipeline

pub mod checks;
pub mod engine;
pub mod extractor;
pub mod keywords;
pub mod report;
pub mod scoring;

pub use checks::{quick_audit, QuickAudit};
pub use engine::{AggregateStats, AnalysisEngine, PageAudit};
pub use scoring::ScoreCalculator;
