#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Descriptive statistics and performance scoring over simulation results.
//!
//! The engine is best-effort: absent result sections are skipped, records
//! without the fields a statistic needs are dropped, and the only guaranteed
//! output is the four-entry performance metrics block.

/// Analysis engine.
pub mod engine;
/// CSV export fan-out.
pub mod export;

pub use engine::{
    analyze, AdoptionRate, AnalysisReport, ClientNeedsAnalysis, PerformanceMetrics,
    PriorityChange, ProductionTechAnalysis, SustainabilityAnalysis, TechnologyImprovement,
};
pub use export::save_analysis;
