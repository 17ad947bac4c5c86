use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::base::{Trend, TrendRecord};

/// Evolution of one client priority area over the simulation period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPriorityEvolution {
    /// Priority area, e.g. Sustainability transformation or Digital integration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_area: Option<String>,
    /// How the priority evolves over time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution_trend: Option<Trend>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Client need transformation aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientNeedTransformation {
    /// Priority evolutions the analysis engine inspects.
    #[serde(default)]
    pub client_priority_evolution: Vec<ClientPriorityEvolution>,
    /// Remaining catalog sections (decision-maker shifts, problem framing,
    /// budget allocation, sector boundary blurring), keyed by name.
    #[serde(flatten)]
    pub additional: IndexMap<String, Vec<TrendRecord>>,
}
