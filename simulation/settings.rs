use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use fertisim_models::{ModelError, SimulationPeriod};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Process-wide configuration.
///
/// Constructed once at startup (defaults, optionally overlaid from a TOML
/// file) and passed by reference into the components that need it. There is
/// no global settings singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Application display name.
    pub app_name: String,
    /// Debug flag.
    pub debug: bool,
    /// Application version string.
    pub version: String,
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Raw input data directory.
    pub raw_data_dir: PathBuf,
    /// Processed data directory.
    pub processed_data_dir: PathBuf,
    /// Directory holding `<scenario>.yaml` files.
    pub scenario_dir: PathBuf,
    /// Root report directory.
    pub report_dir: PathBuf,
    /// Directory for persisted JSON results and analysis CSVs.
    pub results_dir: PathBuf,
    /// Directory for generated HTML reports.
    pub html_report_dir: PathBuf,
    /// Structured run log path.
    pub log_path: PathBuf,
    /// Default first simulated year.
    pub default_start_year: i32,
    /// Default last simulated year.
    pub default_end_year: i32,
    /// Default RNG seed for the placeholder simulations.
    pub default_seed: u64,
    /// Default simulation count. Declared for forward compatibility; the
    /// current placeholder simulations draw a single sample per metric.
    pub num_simulations: u32,
    /// Plot theme name embedded in chart layouts.
    pub plot_theme: String,
    /// Default chart width in pixels.
    pub plot_width: u32,
    /// Default chart height in pixels.
    pub plot_height: u32,
    /// External data source URLs. Placeholders; never fetched.
    pub external_data_sources: IndexMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Fertilizer Industry Simulation".into(),
            debug: false,
            version: "0.1.0".into(),
            data_dir: "data".into(),
            raw_data_dir: "data/raw".into(),
            processed_data_dir: "data/processed".into(),
            scenario_dir: "scenarios".into(),
            report_dir: "reports".into(),
            results_dir: "reports/results".into(),
            html_report_dir: "reports/html".into(),
            log_path: "reports/fertisim.log".into(),
            default_start_year: 2025,
            default_end_year: 2040,
            default_seed: 42,
            num_simulations: 1000,
            plot_theme: "plotly_white".into(),
            plot_width: 1200,
            plot_height: 600,
            external_data_sources: IndexMap::from_iter([
                (
                    "fertilizer_market_data".to_string(),
                    "https://example.com/api/fertilizer-market-data".to_string(),
                ),
                (
                    "sustainability_metrics".to_string(),
                    "https://example.com/api/sustainability-metrics".to_string(),
                ),
            ]),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file, falling back to defaults for any
    /// missing key.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings: Self =
            toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        settings.default_period()?;
        Ok(settings)
    }

    /// Default simulation period derived from the configured years.
    pub fn default_period(&self) -> Result<SimulationPeriod, ModelError> {
        SimulationPeriod::new(self.default_start_year, self.default_end_year)
    }

    /// Creates every directory the tool writes into.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            &self.raw_data_dir,
            &self.processed_data_dir,
            &self.scenario_dir,
            &self.results_dir,
            &self.html_report_dir,
        ] {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
        }
        Ok(())
    }
}
