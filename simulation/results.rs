use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use fertisim_models::{
    ClientPriorityEvolution, FertilizerAdoption, ProductionTechnologyEvolution, SimulationPeriod,
    TechnologyPenetration,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Run provenance stamped onto every result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Unique run id.
    pub run_id: Uuid,
    /// When the run executed, ISO-8601.
    pub simulation_timestamp: DateTime<Utc>,
    /// Simulated year span.
    pub simulation_period: SimulationPeriod,
    /// Result schema version.
    pub version: String,
}

/// Output of the sustainability transition simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityOutcome {
    /// Adoption bands carried through from the scenario inputs.
    #[serde(default)]
    pub fertilizer_adoption: Vec<FertilizerAdoption>,
    /// Technology penetration outlooks carried through from the inputs.
    #[serde(default)]
    pub technology_penetration: Vec<TechnologyPenetration>,
    /// Scalar metrics for this simulation.
    #[serde(default)]
    pub metrics: IndexMap<String, f64>,
}

/// Output of the production technology simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionTechOutcome {
    /// Technology evolution curves carried through from the inputs.
    #[serde(default)]
    pub technology_evolution: Vec<ProductionTechnologyEvolution>,
    /// Scalar metrics for this simulation.
    #[serde(default)]
    pub metrics: IndexMap<String, f64>,
}

/// Output of the client needs simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientNeedsOutcome {
    /// Priority evolutions carried through from the inputs.
    #[serde(default)]
    pub priority_evolution: Vec<ClientPriorityEvolution>,
    /// Scalar metrics for this simulation.
    #[serde(default)]
    pub metrics: IndexMap<String, f64>,
}

/// Combined output of one simulation run.
///
/// Every section is optional so partially populated (or entirely empty)
/// result sets stay loadable by downstream consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    /// Sustainability simulation output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability: Option<SustainabilityOutcome>,
    /// Production technology simulation output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_tech: Option<ProductionTechOutcome>,
    /// Client needs simulation output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_needs: Option<ClientNeedsOutcome>,
    /// Run provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RunMetadata>,
    /// Top-level percentages surfaced for dashboard display.
    #[serde(default)]
    pub summary_metrics: IndexMap<String, f64>,
}

impl SimulationResults {
    /// Persists the results as pretty JSON under
    /// `<output_dir>/<scenario>_<YYYYMMDD_HHMMSS>.json`.
    ///
    /// Timestamped filenames keep concurrent invocations from colliding.
    pub fn save(&self, output_dir: impl AsRef<Path>, scenario: &str) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating results directory {}", output_dir.display()))?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = output_dir.join(format!("{scenario}_{stamp}.json"));
        let json = serde_json::to_string_pretty(self).context("serializing results")?;
        fs::write(&path, json)
            .with_context(|| format!("writing results to {}", path.display()))?;
        Ok(path)
    }

    /// Loads previously persisted results.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading results {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing results {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fertisim_models::PercentageRange;
    use indexmap::indexmap;
    use tempfile::tempdir;

    fn sample_results() -> SimulationResults {
        SimulationResults {
            sustainability: Some(SustainabilityOutcome {
                fertilizer_adoption: vec![FertilizerAdoption {
                    fertilizer_type: "Orgánico".into(),
                    market_growth: PercentageRange::new(20.0, 40.0).unwrap(),
                    target_year: 2030,
                }],
                technology_penetration: Vec::new(),
                metrics: indexmap! { "sustainable_share".to_string() => 0.55 },
            }),
            production_tech: None,
            client_needs: None,
            metadata: Some(RunMetadata {
                run_id: Uuid::new_v4(),
                simulation_timestamp: Utc::now(),
                simulation_period: SimulationPeriod::default(),
                version: "1.0.0".into(),
            }),
            summary_metrics: indexmap! { "overall_sustainability_score".to_string() => 55.0 },
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let results = sample_results();
        let path = results.save(dir.path(), "baseline").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("baseline_"));
        assert!(name.ends_with(".json"));
        let loaded = SimulationResults::load(&path).unwrap();
        assert_eq!(loaded, results);
    }

    #[test]
    fn saved_json_preserves_non_ascii() {
        let dir = tempdir().unwrap();
        let path = sample_results().save(dir.path(), "baseline").unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Orgánico"));
        assert!(raw.contains("  \"sustainability\""));
    }

    #[test]
    fn full_precision_metrics_survive_persistence_bit_exact() {
        // Sampled metrics carry 17 significant digits; parsing must not
        // introduce ULP drift.
        let dir = tempdir().unwrap();
        let mut results = sample_results();
        results
            .sustainability
            .as_mut()
            .unwrap()
            .metrics
            .insert("efficiency_gain".to_string(), 0.123_891_243_108_098_25);
        let path = results.save(dir.path(), "precision").unwrap();
        let loaded = SimulationResults::load(&path).unwrap();
        let reloaded = loaded.sustainability.unwrap().metrics["efficiency_gain"];
        assert_eq!(reloaded.to_bits(), 0.123_891_243_108_098_25_f64.to_bits());
    }

    #[test]
    fn empty_json_object_loads_as_default_results() {
        let results: SimulationResults = serde_json::from_str("{}").unwrap();
        assert_eq!(results, SimulationResults::default());
    }

    #[test]
    fn absent_sections_are_not_serialized() {
        let json = serde_json::to_string(&SimulationResults::default()).unwrap();
        assert!(!json.contains("client_needs"));
        assert!(json.contains("summary_metrics"));
    }
}
