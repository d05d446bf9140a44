use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{AggregationConfig, MissingMetricPolicy};
use super::{ObservationKey, Operation};
use crate::event::{value_as_number, value_label, FieldPath, Selector};

/// Decomposition value used when the configured field is absent
pub const UNKNOWN_DECOMPOSITION: &str = "unknown";

/// How a metric value becomes an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// Key by metric path, observe the numeric value
    Magnitude,
    /// Key by the observed value itself, observe `1`
    ValueCount,
}

impl RoutingMode {
    /// Value counting applies only when `count` is the sole operation;
    /// combined with other operations, `count` tallies window length.
    pub fn for_operations(operations: &[Operation]) -> Self {
        match operations {
            [Operation::Count] => RoutingMode::ValueCount,
            _ => RoutingMode::Magnitude,
        }
    }
}

/// A single (key, value) datum destined for the store
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Accumulator identity
    pub key: ObservationKey,
    /// Value to push into the key's window
    pub value: f64,
}

/// Maps records to observations according to the configured metrics
#[derive(Debug, Clone)]
pub struct ObservationRouter {
    metrics: Vec<FieldPath>,
    decomposition: Option<FieldPath>,
    mode: RoutingMode,
    missing_metric: MissingMetricPolicy,
}

impl ObservationRouter {
    /// Build a router from aggregation configuration
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            metrics: config.metrics.clone(),
            decomposition: config.decomposition.clone(),
            mode: config.routing_mode(),
            missing_metric: config.missing_metric,
        }
    }

    /// Active routing mode
    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    /// Derive every observation a record contributes, in metric order
    pub fn route<S: Selector + ?Sized>(&self, record: &S) -> Vec<Observation> {
        let mut observations = Vec::with_capacity(self.metrics.len());

        for metric in &self.metrics {
            let raw = record.select(metric);

            let (name, value) = match (self.mode, raw) {
                (RoutingMode::ValueCount, Some(raw)) => (value_label(raw), 1.0),
                (RoutingMode::ValueCount, None) => continue,
                (RoutingMode::Magnitude, Some(raw)) => match value_as_number(raw) {
                    Some(number) => (metric.as_str().to_string(), number),
                    None => {
                        debug!("Skipping non-numeric value for metric {}: {}", metric, raw);
                        continue;
                    }
                },
                (RoutingMode::Magnitude, None) => match self.missing_metric {
                    MissingMetricPolicy::Skip => continue,
                    MissingMetricPolicy::ZeroFill => (metric.as_str().to_string(), 0.0),
                },
            };

            observations.push(Observation {
                key: ObservationKey::new(self.decomposition_value(record), name),
                value,
            });
        }

        observations
    }

    fn decomposition_value<S: Selector + ?Sized>(&self, record: &S) -> Option<String> {
        self.decomposition.as_ref().map(|field| {
            record
                .select(field)
                .map(value_label)
                .unwrap_or_else(|| UNKNOWN_DECOMPOSITION.to_string())
        })
    }
}
