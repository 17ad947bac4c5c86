use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::base::{PercentageRange, Trend, TrendRecord};

/// Projected market growth band for one fertilizer type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerAdoption {
    /// Fertilizer type, e.g. Organic or Biological.
    pub fertilizer_type: String,
    /// Expected market growth band by the target year.
    pub market_growth: PercentageRange,
    /// Year by which the band applies.
    pub target_year: i32,
}

/// Penetration outlook for one production or application technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyPenetration {
    /// Technology name, e.g. Controlled-release or Precision application.
    pub technology_name: String,
    /// Segmentation axis, e.g. crop category or farm size.
    pub category: String,
    /// Adoption evolution, when tracked as a trajectory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adoption_rate: Option<Trend>,
    /// Penetration target band, when tracked as a range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penetration_forecast: Option<PercentageRange>,
}

/// Sustainability transition aggregate.
///
/// The sections the analysis engine inspects keep dedicated record types;
/// everything else (carbon footprint trajectories, circular economy models,
/// regulatory evolution, response strategies, investment flows, neutrality
/// pathways) deserializes into generic [`TrendRecord`] lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityTransition {
    /// Market-growth bands per fertilizer type.
    #[serde(default)]
    pub fertilizer_adoption_curves: Vec<FertilizerAdoption>,
    /// Controlled-release technology penetration outlooks.
    #[serde(default)]
    pub controlled_release_tech_penetration: Vec<TechnologyPenetration>,
    /// Precision application technology adoption outlooks.
    #[serde(default)]
    pub precision_application_tech_adoption: Vec<TechnologyPenetration>,
    /// Remaining catalog sections, keyed by section name.
    #[serde(flatten)]
    pub additional: IndexMap<String, Vec<TrendRecord>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_aggregate_deserializes_with_defaults() {
        let aggregate: SustainabilityTransition = serde_json::from_str(
            r#"{
                "fertilizer_adoption_curves": [{
                    "fertilizer_type": "Organic",
                    "market_growth": {"min_percentage": 20, "max_percentage": 40},
                    "target_year": 2030
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(aggregate.fertilizer_adoption_curves.len(), 1);
        assert!(aggregate.controlled_release_tech_penetration.is_empty());
        assert!(aggregate.additional.is_empty());
    }

    #[test]
    fn unknown_sections_land_in_additional() {
        let aggregate: SustainabilityTransition = serde_json::from_str(
            r#"{
                "carbon_neutrality_pathways": [{
                    "label": "Green ammonia production",
                    "trend": {
                        "name": "scaling",
                        "trajectory": [[2025, 0.05], [2040, 0.6]]
                    }
                }]
            }"#,
        )
        .unwrap();
        let pathways = &aggregate.additional["carbon_neutrality_pathways"];
        assert_eq!(pathways.len(), 1);
        assert_eq!(pathways[0].label, "Green ammonia production");
    }
}
