use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use super::router::RoutingMode;
use super::Operation;
use crate::error::{Result, StatsError};
use crate::event::FieldPath;

/// What to do when a configured metric is absent from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMetricPolicy {
    /// Observe nothing; sparse metrics leave gaps
    #[default]
    Skip,
    /// Observe a zero so every record contributes
    ZeroFill,
}

/// Configuration for routing and aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Metric field paths, in column order
    pub metrics: Vec<FieldPath>,
    /// Field used to partition metrics (if any)
    pub decomposition: Option<FieldPath>,
    /// Requested operations, in column order
    pub operations: Vec<Operation>,
    /// Maximum number of values kept per key
    pub window_size: Option<NonZeroUsize>,
    /// Handling of metrics absent from a record
    pub missing_metric: MissingMetricPolicy,
}

impl AggregationConfig {
    /// Create a configuration tracking `metrics` with `operations`
    pub fn new(metrics: Vec<FieldPath>, operations: Vec<Operation>) -> Self {
        Self {
            metrics,
            decomposition: None,
            operations,
            window_size: None,
            missing_metric: MissingMetricPolicy::Skip,
        }
    }

    /// Partition observations by `field`
    pub fn with_decomposition(mut self, field: FieldPath) -> Self {
        self.decomposition = Some(field);
        self
    }

    /// Bound every key's window to `size` values
    pub fn with_window_size(mut self, size: NonZeroUsize) -> Self {
        self.window_size = Some(size);
        self
    }

    /// Set the missing-metric policy
    pub fn with_missing_metric(mut self, policy: MissingMetricPolicy) -> Self {
        self.missing_metric = policy;
        self
    }

    /// How records are turned into observations for these operations
    pub fn routing_mode(&self) -> RoutingMode {
        RoutingMode::for_operations(&self.operations)
    }

    /// Check required fields and collapse duplicate metrics and operations,
    /// keeping the first occurrence
    pub fn validate(mut self) -> Result<Self> {
        if self.metrics.is_empty() {
            return Err(StatsError::Configuration(
                "list of metrics required (-m, --metrics)".to_string(),
            ));
        }
        if self.operations.is_empty() {
            return Err(StatsError::Configuration(
                "operation required (-o, --operations)".to_string(),
            ));
        }

        dedup_in_order(&mut self.metrics);
        dedup_in_order(&mut self.operations);
        Ok(self)
    }
}

fn dedup_in_order<T: PartialEq>(items: &mut Vec<T>) {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    *items = kept;
}
