use serde::Serialize;

use super::store::StatsStore;
use super::{ObservationKey, Operation};

/// Placeholder rendered for an undefined result
pub const UNDEFINED_CELL: &str = "-";

/// One operation's results, positionally aligned with a key snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    /// The operation that produced these results
    pub operation: Operation,
    /// Result per key, `None` where undefined
    pub values: Vec<Option<f64>>,
}

/// One output row: a key followed by one result per requested operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    /// Decomposition value, `None` when decomposition is not configured
    pub decomposition: Option<String>,
    /// Metric name
    pub metric: String,
    /// Results in requested-operation order
    pub values: Vec<Option<f64>>,
}

impl MergedRow {
    /// Display cells: decomposition, metric, then each formatted result
    pub fn cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(2 + self.values.len());
        cells.push(self.decomposition.clone().unwrap_or_default());
        cells.push(self.metric.clone());
        cells.extend(self.values.iter().copied().map(format_value));
        cells
    }
}

/// Round to zero decimal places for display, half away from zero
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let rounded = v.round();
            // avoid printing "-0"
            let rounded = if rounded == 0.0 { 0.0 } else { rounded };
            format!("{:.0}", rounded)
        }
        Some(v) => v.to_string(),
        None => UNDEFINED_CELL.to_string(),
    }
}

/// Computes several operations over a store and merges them into rows
#[derive(Debug, Clone)]
pub struct Aggregator {
    operations: Vec<Operation>,
}

impl Aggregator {
    /// Create an aggregator for `operations`, in column order
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Requested operations
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Compute every operation over one key snapshot and merge by position
    pub fn compute(&self, store: &StatsStore) -> Vec<MergedRow> {
        let keys: Vec<&ObservationKey> = store.keys().collect();

        let results: Vec<OperationResult> = self
            .operations
            .iter()
            .map(|op| Self::operation_result(store, &keys, *op))
            .collect();

        keys.iter()
            .enumerate()
            .map(|(position, key)| MergedRow {
                decomposition: key.decomposition.clone(),
                metric: key.metric.clone(),
                values: results.iter().map(|result| result.values[position]).collect(),
            })
            .collect()
    }

    /// Evaluate one operation against a fixed key list
    pub fn operation_result(
        store: &StatsStore,
        keys: &[&ObservationKey],
        operation: Operation,
    ) -> OperationResult {
        let values = keys
            .iter()
            .map(|key| store.window(key).and_then(|window| operation.apply(window)))
            .collect();

        OperationResult { operation, values }
    }
}
