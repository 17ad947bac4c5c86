use std::fs;

use anyhow::{bail, Context, Result};
use fertisim_models::{
    ClientNeedTransformation, ModelError, ProductionTechnologyAndProcessInnovation,
    SimulationPeriod, SustainabilityTransition,
};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Scenario configuration parsed from `<scenario>.yaml`.
///
/// Every section is optional; missing sections fall back to empty aggregates
/// so sparse scenarios stay valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// First simulated year; defaults to the configured period when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
    /// Last simulated year; defaults to the configured period when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,
    /// Sustainability transition inputs.
    #[serde(default)]
    pub sustainability: SustainabilityTransition,
    /// Production technology inputs.
    #[serde(default)]
    pub production_technology: ProductionTechnologyAndProcessInnovation,
    /// Client need transformation inputs.
    #[serde(default)]
    pub client_needs: ClientNeedTransformation,
}

impl ScenarioConfig {
    /// Resolves the simulation period, falling back to settings defaults.
    pub fn period(&self, settings: &Settings) -> Result<SimulationPeriod, ModelError> {
        SimulationPeriod::new(
            self.start_year.unwrap_or(settings.default_start_year),
            self.end_year.unwrap_or(settings.default_end_year),
        )
    }
}

/// Loads a named scenario from the configured scenarios directory.
pub fn load_scenario(name: &str, settings: &Settings) -> Result<ScenarioConfig> {
    let path = settings.scenario_dir.join(format!("{name}.yaml"));
    if !path.exists() {
        bail!("scenario file not found: {}", path.display());
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("parsing scenario {}", path.display()))
}

/// Lists scenario names found in the scenarios directory, sorted.
///
/// A missing directory yields an empty list rather than an error.
#[must_use]
pub fn list_scenarios(settings: &Settings) -> Vec<String> {
    let Ok(entries) = fs::read_dir(&settings.scenario_dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "yaml"))
        .filter_map(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn settings_in(dir: &std::path::Path) -> Settings {
        Settings {
            scenario_dir: dir.join("scenarios"),
            ..Settings::default()
        }
    }

    #[test]
    fn missing_scenario_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_scenario("absent", &settings_in(dir.path())).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn sparse_yaml_scenario_parses() {
        let dir = tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::create_dir_all(&settings.scenario_dir).unwrap();
        fs::write(
            settings.scenario_dir.join("organic.yaml"),
            concat!(
                "start_year: 2026\n",
                "sustainability:\n",
                "  fertilizer_adoption_curves:\n",
                "    - fertilizer_type: Organic\n",
                "      market_growth:\n",
                "        min_percentage: 20\n",
                "        max_percentage: 40\n",
                "      target_year: 2030\n",
            ),
        )
        .unwrap();
        let config = load_scenario("organic", &settings).unwrap();
        assert_eq!(config.start_year, Some(2026));
        assert_eq!(config.sustainability.fertilizer_adoption_curves.len(), 1);
        assert!(config.client_needs.client_priority_evolution.is_empty());
        let period = config.period(&settings).unwrap();
        assert_eq!((period.start_year, period.end_year), (2026, 2040));
    }

    #[test]
    fn invalid_percentage_range_fails_at_parse_time() {
        let dir = tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::create_dir_all(&settings.scenario_dir).unwrap();
        fs::write(
            settings.scenario_dir.join("broken.yaml"),
            concat!(
                "sustainability:\n",
                "  fertilizer_adoption_curves:\n",
                "    - fertilizer_type: Organic\n",
                "      market_growth:\n",
                "        min_percentage: 80\n",
                "        max_percentage: 20\n",
                "      target_year: 2030\n",
            ),
        )
        .unwrap();
        assert!(load_scenario("broken", &settings).is_err());
    }

    #[test]
    fn list_scenarios_returns_sorted_stems() {
        let dir = tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::create_dir_all(&settings.scenario_dir).unwrap();
        fs::write(settings.scenario_dir.join("b.yaml"), "{}\n").unwrap();
        fs::write(settings.scenario_dir.join("a.yaml"), "{}\n").unwrap();
        fs::write(settings.scenario_dir.join("notes.txt"), "skip me").unwrap();
        assert_eq!(list_scenarios(&settings), vec!["a", "b"]);
    }

    #[test]
    fn list_scenarios_tolerates_missing_directory() {
        let dir = tempdir().unwrap();
        assert!(list_scenarios(&settings_in(dir.path())).is_empty());
    }
}
