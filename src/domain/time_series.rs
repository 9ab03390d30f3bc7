// Bounded time-series store backing chart cards
use serde::Serialize;

pub const DEFAULT_MAX_POINTS: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ChartSample {
    pub timestamp: u64,
    pub value: f64,
}

impl ChartSample {
    pub fn new(timestamp: u64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Fixed-capacity circular buffer of samples, oldest first.
///
/// The arena is allocated once; `head` points at the oldest sample and
/// appends past capacity overwrite it (strict FIFO eviction).
#[derive(Debug, Clone)]
pub struct TimeSeriesStore {
    slots: Vec<ChartSample>,
    head: usize,
    len: usize,
}

impl TimeSeriesStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![ChartSample::default(); capacity],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add one sample, evicting the oldest when full.
    pub fn append(&mut self, timestamp: u64, value: f64) {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }

        let sample = ChartSample::new(timestamp, value);
        if self.len < capacity {
            let tail = (self.head + self.len) % capacity;
            self.slots[tail] = sample;
            self.len += 1;
        } else {
            self.slots[self.head] = sample;
            self.head = (self.head + 1) % capacity;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartSample> + '_ {
        let capacity = self.capacity();
        (0..self.len).map(move |offset| &self.slots[(self.head + offset) % capacity])
    }

    /// Current samples, oldest to newest.
    pub fn samples(&self) -> Vec<ChartSample> {
        self.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<&ChartSample> {
        self.iter().last()
    }
}

impl Default for TimeSeriesStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_POINTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retains_most_recent_samples() {
        for capacity in [0usize, 1, 3, 20] {
            for appends in 0..(capacity * 2 + 3) {
                let mut store = TimeSeriesStore::with_capacity(capacity);
                for i in 0..appends {
                    store.append(i as u64, i as f64);
                }

                let expected_len = appends.min(capacity);
                let samples = store.samples();
                assert_eq!(samples.len(), expected_len);

                let first_kept = appends - expected_len;
                let timestamps: Vec<u64> = samples.iter().map(|s| s.timestamp).collect();
                let expected: Vec<u64> = (first_kept..appends).map(|i| i as u64).collect();
                assert_eq!(timestamps, expected, "capacity {capacity}, appends {appends}");
            }
        }
    }

    #[test]
    fn test_eviction_wraps_around() {
        let mut store = TimeSeriesStore::with_capacity(3);
        store.append(10, 1.0);
        store.append(20, 2.0);
        store.append(30, 3.0);
        store.append(40, 4.0);
        store.append(50, 5.0);

        assert_eq!(
            store.samples(),
            vec![
                ChartSample::new(30, 3.0),
                ChartSample::new(40, 4.0),
                ChartSample::new(50, 5.0),
            ]
        );
        assert_eq!(store.latest(), Some(&ChartSample::new(50, 5.0)));
        assert_eq!(store.capacity(), 3);
    }

    #[test]
    fn test_default_capacity() {
        let store = TimeSeriesStore::default();
        assert_eq!(store.capacity(), DEFAULT_MAX_POINTS);
        assert!(store.is_empty());
        assert_eq!(store.latest(), None);
    }
}
