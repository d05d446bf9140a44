use serde::Serialize;
use std::collections::HashMap;
use std::num::NonZeroUsize;

use super::sliding_window::SlidingWindow;
use super::ObservationKey;

/// Per-key windowed statistics, iterated in first-seen key order
///
/// Keys are never evicted; each key's window is bounded independently by the
/// configured window size.
#[derive(Debug, Clone, Default)]
pub struct StatsStore {
    window_size: Option<NonZeroUsize>,
    index: HashMap<ObservationKey, usize>,
    entries: Vec<(ObservationKey, SlidingWindow)>,
}

/// Statistics about the store's memory footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StoreStatistics {
    /// Number of distinct keys tracked
    pub keys: usize,
    /// Values currently held across all windows
    pub retained_values: usize,
    /// Values ever observed, including evicted ones
    pub total_observations: u64,
}

impl StatsStore {
    /// Create a store whose windows hold at most `window_size` values each
    pub fn new(window_size: Option<NonZeroUsize>) -> Self {
        Self {
            window_size,
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Record one value for `key`, creating its window on first sight
    pub fn observe(&mut self, key: ObservationKey, value: f64) {
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].1.push(value);
            return;
        }

        let mut window = SlidingWindow::new(self.window_size);
        window.push(value);
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, window));
    }

    /// Tracked keys in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &ObservationKey> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Keys paired with their windows, in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&ObservationKey, &SlidingWindow)> + '_ {
        self.entries.iter().map(|(key, window)| (key, window))
    }

    /// The window for `key`, if it has been observed
    pub fn window(&self, key: &ObservationKey) -> Option<&SlidingWindow> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Sum over the key's window
    pub fn sum(&self, key: &ObservationKey) -> Option<f64> {
        self.window(key).map(SlidingWindow::sum)
    }

    /// Average over the key's window
    pub fn average(&self, key: &ObservationKey) -> Option<f64> {
        self.window(key).and_then(SlidingWindow::average)
    }

    /// Median over the key's window
    pub fn median(&self, key: &ObservationKey) -> Option<f64> {
        self.window(key).and_then(SlidingWindow::median)
    }

    /// Number of values in the key's window, 0 for an unknown key
    pub fn count(&self, key: &ObservationKey) -> usize {
        self.window(key).map_or(0, SlidingWindow::count)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been observed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured per-key window size
    pub fn window_size(&self) -> Option<NonZeroUsize> {
        self.window_size
    }

    /// Snapshot of the store's size
    pub fn statistics(&self) -> StoreStatistics {
        self.entries
            .iter()
            .fold(StoreStatistics::default(), |mut stats, (_, window)| {
                stats.keys += 1;
                stats.retained_values += window.len();
                stats.total_observations += window.observations();
                stats
            })
    }
}
