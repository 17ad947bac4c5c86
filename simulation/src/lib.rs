#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms,
    missing_docs
)]

//! Fertisim simulation layer: loads scenarios, runs the (placeholder)
//! industry simulations, and aggregates the results.

/// Process-wide settings, constructed once and passed by reference.
#[path = "../settings.rs"]
pub mod settings;

/// Scenario configuration loading.
#[path = "../scenario.rs"]
pub mod scenario;

/// Simulation runner orchestration.
#[path = "../runner.rs"]
pub mod runner;

/// Simulation result types and persistence.
#[path = "../results.rs"]
pub mod results;

pub use results::{
    ClientNeedsOutcome, ProductionTechOutcome, RunMetadata, SimulationResults,
    SustainabilityOutcome,
};
pub use runner::{seeded_rng, SimulationRunner, SimulationRunnerBuilder};
pub use scenario::{list_scenarios, load_scenario, ScenarioConfig};
pub use settings::Settings;
