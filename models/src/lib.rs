#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Domain model catalog for fertilizer industry trend scenarios.
//!
//! The catalog is deliberately small: a handful of validated base types
//! ([`Trend`], [`PercentageRange`], [`SimulationPeriod`]), a generic
//! [`TrendRecord`] entry that covers the long tail of near-identical
//! trend-collection sections, and three aggregates whose analysis-relevant
//! sections keep dedicated record types.

/// Validated base value types.
pub mod base;
/// Client need transformation aggregate.
pub mod client_needs;
/// Shared numeric helpers.
pub mod numeric;
/// Production technology and process innovation aggregate.
pub mod production;
/// Sustainability transition aggregate.
pub mod sustainability;

pub use base::{ModelError, PercentageRange, SimulationPeriod, Trend, TrendRecord};
pub use client_needs::{ClientNeedTransformation, ClientPriorityEvolution};
pub use production::{ProductionTechnologyAndProcessInnovation, ProductionTechnologyEvolution};
pub use sustainability::{FertilizerAdoption, SustainabilityTransition, TechnologyPenetration};
