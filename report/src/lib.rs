#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Chart building and HTML report assembly for simulation results.
//!
//! Charts are plain Plotly figure specs (`serde_json::Value` traces plus a
//! layout); the HTML assembler embeds them into one self-contained document
//! with a CDN-hosted plotly script tag. Every builder degrades to "no chart"
//! when its inputs are absent.

/// Plotly figure spec builders.
pub mod charts;
/// HTML report assembly.
pub mod html;

pub use charts::{all_figures, ChartStyle, Figure};
pub use html::ReportGenerator;
