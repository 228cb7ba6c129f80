//! Bounded history of height estimates with a running mean.

use std::collections::VecDeque;

/// FIFO window of height samples, oldest evicted first
#[derive(Debug, Clone)]
pub struct HeightHistory {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl HeightHistory {
    /// Create an empty history holding at most `capacity` samples
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Window size must be greater than 0");
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest when full, and return the new mean
    pub fn push(&mut self, height: f64) -> f64 {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(height);

        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Arithmetic mean of the window
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    /// Summary statistics of the window
    #[must_use]
    pub fn stats(&self) -> Option<HeightStats> {
        let mean = self.mean()?;
        let n = self.samples.len() as f64;

        let variance = self.samples.iter().map(|h| (h - mean).powi(2)).sum::<f64>() / n;
        let min = self.samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(HeightStats {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            samples: self.samples.len(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.samples.iter()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Statistical summary of a height window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightStats {
    /// Mean height in metres
    pub mean: f64,
    /// Population standard deviation in metres
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Number of samples in the window
    pub samples: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean() {
        let mut history = HeightHistory::new(3);
        assert_eq!(history.mean(), None);

        assert_eq!(history.push(1.0), 1.0);
        assert_eq!(history.push(2.0), 1.5);
        assert_eq!(history.push(3.0), 2.0);

        // Window is full, oldest value should be dropped
        assert_eq!(history.push(4.0), 3.0);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_capacity_ten_evicts_oldest() {
        let mut history = HeightHistory::new(10);
        for i in 1..=11 {
            history.push(f64::from(i));
        }

        assert_eq!(history.len(), 10);
        assert_eq!(history.iter().next(), Some(&2.0));
        // mean of 2..=11
        assert_eq!(history.mean(), Some(6.5));
    }

    #[test]
    fn test_stats() {
        let mut history = HeightHistory::new(5);
        for h in [1.0, 2.0, 3.0, 4.0, 5.0] {
            history.push(h);
        }

        let stats = history.stats().unwrap();
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.samples, 5);
        assert!((stats.std_dev - std::f64::consts::SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_clear() {
        let mut history = HeightHistory::new(2);
        history.push(1.7);
        history.clear();
        assert!(history.is_empty());
        assert!(history.stats().is_none());
    }

    #[test]
    #[should_panic(expected = "Window size must be greater than 0")]
    fn test_zero_capacity() {
        let _ = HeightHistory::new(0);
    }
}
