use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::base::{Trend, TrendRecord};

/// Cost, scaling, or efficiency evolution of one production technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionTechnologyEvolution {
    /// Technology name, e.g. Green ammonia or Bio-based fertilizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology_name: Option<String>,
    /// Tracked metric, e.g. cost reduction or efficiency improvement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
    /// Metric evolution over the simulation period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory_or_curve: Option<Trend>,
}

/// Production technology and process innovation aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionTechnologyAndProcessInnovation {
    /// Technology evolution curves the analysis engine inspects.
    #[serde(default)]
    pub production_technology_evolution: Vec<ProductionTechnologyEvolution>,
    /// Remaining catalog sections (raw material diversification, efficiency
    /// transformation, GHG pathways, capacity evolution), keyed by name.
    #[serde(flatten)]
    pub additional: IndexMap<String, Vec<TrendRecord>>,
}
