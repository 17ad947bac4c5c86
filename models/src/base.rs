use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a model value violates a construction invariant.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// A percentage fell outside [0, 100].
    #[error("percentage {value} for `{field}` is outside [0, 100]")]
    PercentageOutOfBounds {
        /// Field carrying the offending value.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A percentage range had `min > max`.
    #[error("percentage range is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// A simulation period did not satisfy `start_year < end_year`.
    #[error("simulation period is invalid: start {start} must precede end {end}")]
    InvalidPeriod {
        /// Start year.
        start: i32,
        /// End year.
        end: i32,
    },
}

/// Inclusive year span covered by one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSimulationPeriod")]
pub struct SimulationPeriod {
    /// First simulated year.
    pub start_year: i32,
    /// Last simulated year.
    pub end_year: i32,
}

#[derive(Debug, Deserialize)]
struct RawSimulationPeriod {
    #[serde(default = "default_start_year")]
    start_year: i32,
    #[serde(default = "default_end_year")]
    end_year: i32,
}

const fn default_start_year() -> i32 {
    2025
}

const fn default_end_year() -> i32 {
    2040
}

impl SimulationPeriod {
    /// Creates a period, enforcing `start_year < end_year`.
    pub const fn new(start_year: i32, end_year: i32) -> Result<Self, ModelError> {
        if start_year >= end_year {
            return Err(ModelError::InvalidPeriod {
                start: start_year,
                end: end_year,
            });
        }
        Ok(Self {
            start_year,
            end_year,
        })
    }

    /// Years covered by the period, inclusive on both ends.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.end_year
    }
}

impl Default for SimulationPeriod {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
        }
    }
}

impl TryFrom<RawSimulationPeriod> for SimulationPeriod {
    type Error = ModelError;

    fn try_from(raw: RawSimulationPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.start_year, raw.end_year)
    }
}

/// Bounded percentage band, e.g. a projected market-growth range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPercentageRange")]
pub struct PercentageRange {
    /// Lower bound in [0, 100].
    pub min_percentage: f64,
    /// Upper bound in [0, 100].
    pub max_percentage: f64,
}

#[derive(Debug, Deserialize)]
struct RawPercentageRange {
    min_percentage: f64,
    max_percentage: f64,
}

impl PercentageRange {
    /// Creates a range, enforcing bounds and `min <= max`.
    pub fn new(min_percentage: f64, max_percentage: f64) -> Result<Self, ModelError> {
        for (field, value) in [
            ("min_percentage", min_percentage),
            ("max_percentage", max_percentage),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ModelError::PercentageOutOfBounds { field, value });
            }
        }
        if min_percentage > max_percentage {
            return Err(ModelError::InvertedRange {
                min: min_percentage,
                max: max_percentage,
            });
        }
        Ok(Self {
            min_percentage,
            max_percentage,
        })
    }

    /// Midpoint of the band; used as the average adoption rate.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.min_percentage + self.max_percentage) / 2.0
    }
}

impl TryFrom<RawPercentageRange> for PercentageRange {
    type Error = ModelError;

    fn try_from(raw: RawPercentageRange) -> Result<Self, Self::Error> {
        Self::new(raw.min_percentage, raw.max_percentage)
    }
}

/// Named metric with an optional ordered `(year, value)` trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Metric name.
    pub name: String,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Observations sorted ascending by year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<Vec<(i32, f64)>>,
}

impl Trend {
    /// First and last trajectory values, when at least two exist.
    #[must_use]
    pub fn endpoints(&self) -> Option<(f64, f64)> {
        let trajectory = self.trajectory.as_ref()?;
        if trajectory.len() < 2 {
            return None;
        }
        Some((trajectory.first()?.1, trajectory.last()?.1))
    }

    /// Percent change from first to last value.
    ///
    /// Returns 0 when the first value is 0 so short-circuiting trajectories
    /// never divide by zero, and `None` when fewer than two observations
    /// exist.
    #[must_use]
    pub fn improvement_percent(&self) -> Option<f64> {
        let (first, last) = self.endpoints()?;
        if first == 0.0 {
            Some(0.0)
        } else {
            Some((last - first) / first.abs() * 100.0)
        }
    }
}

/// Generic entry of a named-trend collection.
///
/// Replaces the long tail of near-identical per-domain schemas: every section
/// the analysis does not inspect is a list of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    /// Category label, e.g. a region, strategy type, or budget area.
    pub label: String,
    /// Metric evolution, when the entry tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    /// Percentage band, when the entry targets one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<PercentageRange>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
