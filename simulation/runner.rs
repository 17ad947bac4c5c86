use anyhow::Result;
use fertisim_models::SimulationPeriod;
use fertisim_telemetry::Telemetry;
use indexmap::{indexmap, IndexMap};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde_json::json;
use uuid::Uuid;

use crate::{
    results::{
        ClientNeedsOutcome, ProductionTechOutcome, RunMetadata, SimulationResults,
        SustainabilityOutcome,
    },
    scenario::ScenarioConfig,
};

/// Result schema version stamped into run metadata.
const RESULT_VERSION: &str = "1.0.0";

/// Returns a reproducible RNG for the given seed.
#[must_use]
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Orchestrates one simulation run over a loaded scenario.
///
/// The three per-domain simulations are placeholders: each carries the
/// declared scenario records through unchanged and draws its scalar metrics
/// from fixed uniform ranges. The draws are seeded, so a given scenario and
/// seed always reproduce the same metrics.
// TODO: derive the stub metrics from the declared trend trajectories instead
// of sampling placeholder ranges.
pub struct SimulationRunner {
    config: ScenarioConfig,
    period: SimulationPeriod,
    seed: u64,
    telemetry: Option<Telemetry>,
}

impl SimulationRunner {
    /// Returns a builder over the given scenario configuration.
    #[must_use]
    pub fn builder(config: ScenarioConfig) -> SimulationRunnerBuilder {
        SimulationRunnerBuilder::new(config)
    }

    /// Simulated period for this run.
    #[must_use]
    pub const fn period(&self) -> SimulationPeriod {
        self.period
    }

    /// Runs the three simulations sequentially and aggregates the results.
    pub fn run(&self) -> Result<SimulationResults> {
        if let Some(tel) = &self.telemetry {
            let _ = tel.info(
                "simulation.start",
                json!({
                    "seed": self.seed,
                    "start_year": self.period.start_year,
                    "end_year": self.period.end_year,
                }),
            );
        }
        let mut rng = seeded_rng(self.seed);

        let sustainability = self.run_sustainability(&mut rng);
        self.log_stage("sustainability", &sustainability.metrics);
        let production_tech = self.run_production_tech(&mut rng);
        self.log_stage("production_tech", &production_tech.metrics);
        let client_needs = self.run_client_needs(&mut rng);
        self.log_stage("client_needs", &client_needs.metrics);

        let summary_metrics = Self::summarize(&sustainability, &production_tech, &client_needs);
        let metadata = RunMetadata {
            run_id: Uuid::new_v4(),
            simulation_timestamp: chrono::Utc::now(),
            simulation_period: self.period,
            version: RESULT_VERSION.into(),
        };
        if let Some(tel) = &self.telemetry {
            let _ = tel.info(
                "simulation.completed",
                json!({ "run_id": metadata.run_id, "summary": summary_metrics }),
            );
        }
        Ok(SimulationResults {
            sustainability: Some(sustainability),
            production_tech: Some(production_tech),
            client_needs: Some(client_needs),
            metadata: Some(metadata),
            summary_metrics,
        })
    }

    fn run_sustainability(&self, rng: &mut SmallRng) -> SustainabilityOutcome {
        let model = &self.config.sustainability;
        SustainabilityOutcome {
            fertilizer_adoption: model.fertilizer_adoption_curves.clone(),
            technology_penetration: model.controlled_release_tech_penetration.clone(),
            metrics: indexmap! {
                "carbon_footprint_reduction".to_string() => rng.gen_range(0.10..0.50),
                "sustainable_share".to_string() => rng.gen_range(0.20..0.80),
            },
        }
    }

    fn run_production_tech(&self, rng: &mut SmallRng) -> ProductionTechOutcome {
        let model = &self.config.production_technology;
        ProductionTechOutcome {
            technology_evolution: model.production_technology_evolution.clone(),
            metrics: indexmap! {
                "efficiency_gain".to_string() => rng.gen_range(0.05..0.30),
                "cost_reduction".to_string() => rng.gen_range(0.10..0.40),
            },
        }
    }

    fn run_client_needs(&self, rng: &mut SmallRng) -> ClientNeedsOutcome {
        let model = &self.config.client_needs;
        ClientNeedsOutcome {
            priority_evolution: model.client_priority_evolution.clone(),
            metrics: indexmap! {
                "sustainability_demand".to_string() => rng.gen_range(0.60..0.90),
                "digital_tool_adoption".to_string() => rng.gen_range(0.30..0.80),
            },
        }
    }

    fn summarize(
        sustainability: &SustainabilityOutcome,
        production_tech: &ProductionTechOutcome,
        client_needs: &ClientNeedsOutcome,
    ) -> IndexMap<String, f64> {
        let scaled = |metrics: &IndexMap<String, f64>, key: &str| {
            metrics.get(key).copied().unwrap_or(0.0) * 100.0
        };
        indexmap! {
            "overall_sustainability_score".to_string() =>
                scaled(&sustainability.metrics, "sustainable_share"),
            "production_efficiency_gain".to_string() =>
                scaled(&production_tech.metrics, "efficiency_gain"),
            "client_sustainability_demand".to_string() =>
                scaled(&client_needs.metrics, "sustainability_demand"),
        }
    }

    fn log_stage(&self, stage: &str, metrics: &IndexMap<String, f64>) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.info("simulation.stage", json!({ "stage": stage, "metrics": metrics }));
        }
    }
}

/// Builder for [`SimulationRunner`].
pub struct SimulationRunnerBuilder {
    config: ScenarioConfig,
    seed: u64,
    fallback_period: SimulationPeriod,
    telemetry: Option<Telemetry>,
}

impl SimulationRunnerBuilder {
    fn new(config: ScenarioConfig) -> Self {
        Self {
            config,
            seed: 42,
            fallback_period: SimulationPeriod::default(),
            telemetry: None,
        }
    }

    /// Seeds the placeholder metric draws.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the period used when the scenario declares no years.
    #[must_use]
    pub fn fallback_period(mut self, period: SimulationPeriod) -> Self {
        self.fallback_period = period;
        self
    }

    /// Attaches telemetry.
    #[must_use]
    pub fn telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Builds the runner, validating the resolved period.
    pub fn build(self) -> Result<SimulationRunner> {
        let period = SimulationPeriod::new(
            self.config
                .start_year
                .unwrap_or(self.fallback_period.start_year),
            self.config.end_year.unwrap_or(self.fallback_period.end_year),
        )?;
        Ok(SimulationRunner {
            config: self.config,
            period,
            seed: self.seed,
            telemetry: self.telemetry,
        })
    }
}
