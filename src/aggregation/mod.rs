use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StatsError;

/// Count-bounded window of recent observations for one key
pub mod sliding_window;
/// Insertion-ordered mapping from observation key to window
pub mod store;
/// Record to observation routing
pub mod router;
/// Multi-operation computation and row merging
pub mod evaluator;
/// Configuration types for aggregation
pub mod config;

pub use config::{AggregationConfig, MissingMetricPolicy};
pub use evaluator::{format_value, Aggregator, MergedRow, OperationResult};
pub use router::{Observation, ObservationRouter, RoutingMode};
pub use sliding_window::SlidingWindow;
pub use store::{StatsStore, StoreStatistics};

/// Summary operations that can be computed over a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Sum of the values in the window
    Sum,
    /// Arithmetic mean of the values in the window
    Average,
    /// Middle value of the sorted window
    Median,
    /// Number of values in the window
    Count,
    /// Smallest value in the window
    Min,
    /// Largest value in the window
    Max,
}

impl Operation {
    /// Every supported operation, in the order they are documented
    pub const ALL: [Operation; 6] = [
        Operation::Sum,
        Operation::Average,
        Operation::Median,
        Operation::Count,
        Operation::Min,
        Operation::Max,
    ];

    /// Lowercase name as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Sum => "sum",
            Operation::Average => "average",
            Operation::Median => "median",
            Operation::Count => "count",
            Operation::Min => "min",
            Operation::Max => "max",
        }
    }

    /// Column header label
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Evaluate this operation over a window. `None` means undefined, which
    /// only happens for an empty window.
    pub fn apply(&self, window: &SlidingWindow) -> Option<f64> {
        match self {
            Operation::Sum => Some(window.sum()),
            Operation::Average => window.average(),
            Operation::Median => window.median(),
            Operation::Count => Some(window.count() as f64),
            Operation::Min => window.min(),
            Operation::Max => window.max(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s.trim())
            .ok_or_else(|| {
                StatsError::Configuration(format!(
                    "invalid operation name '{}'. Must be one of {:?}",
                    s,
                    Operation::ALL.map(|op| op.as_str())
                ))
            })
    }
}

/// Composite identity of one accumulator: (decomposition value, metric name)
///
/// `decomposition` is `None` when no decomposition field is configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObservationKey {
    /// Value of the decomposition field, `"unknown"` when it was missing
    pub decomposition: Option<String>,
    /// Configured metric path, or the observed value in count mode
    pub metric: String,
}

impl ObservationKey {
    /// Create a key
    pub fn new(decomposition: Option<String>, metric: impl Into<String>) -> Self {
        Self {
            decomposition,
            metric: metric.into(),
        }
    }

    /// Create a key with no decomposition
    pub fn undecomposed(metric: impl Into<String>) -> Self {
        Self::new(None, metric)
    }
}

impl fmt::Display for ObservationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.decomposition {
            Some(decomp) => write!(f, "{}/{}", decomp, self.metric),
            None => f.write_str(&self.metric),
        }
    }
}
