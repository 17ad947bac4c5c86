use fertisim_simulation::{
    ClientNeedsOutcome, ProductionTechOutcome, SimulationResults, SustainabilityOutcome,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label used when a record declares no name for its category.
const UNKNOWN_LABEL: &str = "Unknown";

/// Average adoption rate for one fertilizer type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionRate {
    /// Fertilizer type the rate belongs to.
    pub fertilizer_type: String,
    /// Midpoint of the declared market-growth band.
    pub average_adoption_rate: f64,
}

/// Improvement over the simulation period for one technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyImprovement {
    /// Technology name.
    pub technology: String,
    /// Percent change from the first to the last trajectory value.
    pub improvement_percent: f64,
}

/// Start/end delta for one client priority area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityChange {
    /// Priority area the delta belongs to.
    pub priority_area: String,
    /// First trajectory value.
    pub start_value: f64,
    /// Last trajectory value.
    pub end_value: f64,
    /// `end_value - start_value`.
    pub change: f64,
}

/// Sustainability section of the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityAnalysis {
    /// Average adoption rate per fertilizer type.
    pub adoption_rates: Vec<AdoptionRate>,
    /// Stub metrics passed through unchanged.
    #[serde(default)]
    pub metrics: IndexMap<String, f64>,
}

/// Production technology section of the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionTechAnalysis {
    /// Improvement percent per technology.
    pub technology_improvements: Vec<TechnologyImprovement>,
    /// Stub metrics passed through unchanged.
    #[serde(default)]
    pub metrics: IndexMap<String, f64>,
}

/// Client needs section of the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientNeedsAnalysis {
    /// Start/end deltas per priority area.
    pub priority_changes: Vec<PriorityChange>,
    /// Stub metrics passed through unchanged.
    #[serde(default)]
    pub metrics: IndexMap<String, f64>,
}

/// The four derived performance scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// `sustainable_share * 100`, 0 when absent.
    pub sustainability_score: f64,
    /// Mean of the improvement percents, 0 when none.
    pub technology_advancement: f64,
    /// Mean of the priority end values (0-10 scale), 0 when none.
    pub client_satisfaction: f64,
    /// Weighted blend of the three scores, clamped to [0, 100].
    pub overall_score: f64,
}

/// Derived summary computed from one result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Present when the results carried a sustainability section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sustainability: Option<SustainabilityAnalysis>,
    /// Present when the results carried a production tech section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_tech: Option<ProductionTechAnalysis>,
    /// Present when the results carried a client needs section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_needs: Option<ClientNeedsAnalysis>,
    /// Always present.
    pub performance_metrics: PerformanceMetrics,
}

/// Analyzes simulation results into per-category statistics and the overall
/// performance metrics.
#[must_use]
pub fn analyze(results: &SimulationResults) -> AnalysisReport {
    let sustainability = results.sustainability.as_ref().map(analyze_sustainability);
    let production_tech = results.production_tech.as_ref().map(analyze_production_tech);
    let client_needs = results.client_needs.as_ref().map(analyze_client_needs);
    let performance_metrics = performance_metrics(
        sustainability.as_ref(),
        production_tech.as_ref(),
        client_needs.as_ref(),
    );
    AnalysisReport {
        sustainability,
        production_tech,
        client_needs,
        performance_metrics,
    }
}

fn analyze_sustainability(outcome: &SustainabilityOutcome) -> SustainabilityAnalysis {
    let adoption_rates = outcome
        .fertilizer_adoption
        .iter()
        .map(|adoption| AdoptionRate {
            fertilizer_type: adoption.fertilizer_type.clone(),
            average_adoption_rate: adoption.market_growth.midpoint(),
        })
        .collect();
    SustainabilityAnalysis {
        adoption_rates,
        metrics: outcome.metrics.clone(),
    }
}

fn analyze_production_tech(outcome: &ProductionTechOutcome) -> ProductionTechAnalysis {
    let technology_improvements = outcome
        .technology_evolution
        .iter()
        .filter_map(|tech| {
            let improvement_percent = tech
                .trajectory_or_curve
                .as_ref()
                .and_then(fertisim_models::Trend::improvement_percent)?;
            Some(TechnologyImprovement {
                technology: tech
                    .technology_name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_LABEL.into()),
                improvement_percent,
            })
        })
        .collect();
    ProductionTechAnalysis {
        technology_improvements,
        metrics: outcome.metrics.clone(),
    }
}

fn analyze_client_needs(outcome: &ClientNeedsOutcome) -> ClientNeedsAnalysis {
    let priority_changes = outcome
        .priority_evolution
        .iter()
        .filter_map(|priority| {
            let (start_value, end_value) = priority.evolution_trend.as_ref()?.endpoints()?;
            Some(PriorityChange {
                priority_area: priority
                    .priority_area
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_LABEL.into()),
                start_value,
                end_value,
                change: end_value - start_value,
            })
        })
        .collect();
    ClientNeedsAnalysis {
        priority_changes,
        metrics: outcome.metrics.clone(),
    }
}

fn performance_metrics(
    sustainability: Option<&SustainabilityAnalysis>,
    production_tech: Option<&ProductionTechAnalysis>,
    client_needs: Option<&ClientNeedsAnalysis>,
) -> PerformanceMetrics {
    let sustainability_score = sustainability
        .and_then(|section| section.metrics.get("sustainable_share"))
        .map_or(0.0, |share| share * 100.0);
    let technology_advancement = production_tech.map_or(0.0, |section| {
        mean(section.technology_improvements.iter().map(|imp| imp.improvement_percent))
    });
    let client_satisfaction = client_needs.map_or(0.0, |section| {
        mean(section.priority_changes.iter().map(|change| change.end_value))
    });
    let overall_score = (sustainability_score * 0.4
        + technology_advancement * 0.3
        + client_satisfaction * 10.0 * 0.3)
        .clamp(0.0, 100.0);
    PerformanceMetrics {
        sustainability_score,
        technology_advancement,
        client_satisfaction,
        overall_score,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0_u32;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}
