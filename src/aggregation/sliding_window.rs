use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Upper bound on eager allocation for bounded windows
const PREALLOCATE_LIMIT: usize = 64;

/// Count-bounded sliding window of observed values
///
/// With a capacity of `N` the window keeps the most recent `N` values and
/// evicts from the front. Without a capacity it only grows.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingWindow {
    /// Maximum number of retained values
    capacity: Option<NonZeroUsize>,
    /// Values in arrival order
    entries: VecDeque<f64>,
    /// Total values ever pushed, including evicted ones
    observed: u64,
}

impl SlidingWindow {
    /// Create a window with an optional capacity
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(
                capacity.map_or(0, |cap| cap.get().min(PREALLOCATE_LIMIT)),
            ),
            observed: 0,
        }
    }

    /// Create a window that never evicts
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Create a window holding at most `capacity` values
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self::new(Some(capacity))
    }

    /// Append a value, returning the evicted value when the window was full
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.entries.push_back(value);
        self.observed += 1;

        match self.capacity {
            Some(cap) if self.entries.len() > cap.get() => self.entries.pop_front(),
            _ => None,
        }
    }

    /// Sum of the retained values
    pub fn sum(&self) -> f64 {
        self.entries.iter().sum()
    }

    /// Mean of the retained values, `None` for an empty window
    pub fn average(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.sum() / self.entries.len() as f64)
    }

    /// Median of the retained values, `None` for an empty window
    ///
    /// Sorts a copy; arrival order is preserved.
    pub fn median(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }

        let mut sorted: Vec<f64> = self.entries.iter().copied().collect();
        sorted.sort_by(f64::total_cmp);

        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    /// Number of retained values
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Smallest retained value
    pub fn min(&self) -> Option<f64> {
        self.entries.iter().copied().reduce(f64::min)
    }

    /// Largest retained value
    pub fn max(&self) -> Option<f64> {
        self.entries.iter().copied().reduce(f64::max)
    }

    /// Retained values in arrival order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().copied()
    }

    /// Number of retained values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window holds no values
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total values ever pushed, including evicted ones
    pub fn observations(&self) -> u64 {
        self.observed
    }

    /// Configured capacity
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_of(values: &[f64], capacity: Option<usize>) -> SlidingWindow {
        let mut window = SlidingWindow::new(capacity.and_then(NonZeroUsize::new));
        for v in values {
            window.push(*v);
        }
        window
    }

    #[test]
    fn test_sliding_window_basic() {
        let window = window_of(&[1.0, 2.0, 3.0], None);

        assert_eq!(window.sum(), 6.0);
        assert_eq!(window.count(), 3);
        assert_eq!(window.average(), Some(2.0));
        assert_eq!(window.observations(), 3);
    }

    #[test]
    fn test_sliding_window_eviction() {
        let mut window = window_of(&[1.0, 2.0, 3.0], Some(3));

        assert_eq!(window.push(4.0), Some(1.0));
        assert_eq!(window.push(5.0), Some(2.0));

        assert_eq!(window.count(), 3);
        assert_eq!(window.sum(), 12.0);
        assert_eq!(window.values().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
        assert_eq!(window.observations(), 5);
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut window = SlidingWindow::unbounded();
        for i in 0..1000 {
            assert_eq!(window.push(i as f64), None);
        }
        assert_eq!(window.len(), 1000);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(window_of(&[1.0, 2.0, 3.0], None).median(), Some(2.0));
        assert_eq!(window_of(&[1.0, 2.0, 3.0, 4.0], None).median(), Some(2.5));
        assert_eq!(window_of(&[7.0], None).median(), Some(7.0));
    }

    #[test]
    fn test_median_preserves_arrival_order() {
        let window = window_of(&[9.0, 1.0, 5.0], None);

        assert_eq!(window.median(), Some(5.0));
        assert_eq!(window.values().collect::<Vec<_>>(), vec![9.0, 1.0, 5.0]);
    }

    #[test]
    fn test_empty_window_is_undefined() {
        let window = SlidingWindow::unbounded();

        assert!(window.is_empty());
        assert_eq!(window.sum(), 0.0);
        assert_eq!(window.count(), 0);
        assert_eq!(window.average(), None);
        assert_eq!(window.median(), None);
        assert_eq!(window.min(), None);
        assert_eq!(window.max(), None);
    }

    #[test]
    fn test_min_max() {
        let window = window_of(&[3.0, -2.0, 8.5, 0.0], None);
        assert_eq!(window.min(), Some(-2.0));
        assert_eq!(window.max(), Some(8.5));
    }

    #[test]
    fn test_capacity_of_one() {
        let window = window_of(&[1.0, 2.0, 3.0], Some(1));
        assert_eq!(window.values().collect::<Vec<_>>(), vec![3.0]);
        assert_eq!(window.median(), Some(3.0));
    }
}
