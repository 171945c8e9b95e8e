//! Fixed-capacity circular history buffer.
//!
//! The analysis state keeps several trailing histories (sub-bass energy,
//! pump envelope, RMS level) with different lengths. They all share this
//! ring: O(1) push that overwrites the oldest value, and windowed
//! statistics computed with index arithmetic instead of materializing
//! subarrays.

/// Ring buffer over `f32` values, zero-filled at creation.
///
/// Starting full of zeros matches the engine's warm-up behavior: early
/// averages are pulled toward silence until real data cycles through.
pub struct History {
    values: Vec<f32>,
    /// Index of the next write (= index of the oldest value).
    head: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![0.0; capacity],
            head: 0,
        }
    }

    /// Overwrite the oldest value with `value`.
    pub fn push(&mut self, value: f32) {
        self.values[self.head] = value;
        self.head = (self.head + 1) % self.values.len();
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Mean over the entire ring.
    pub fn mean(&self) -> f32 {
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    /// Mean over the `count` most recent values.
    pub fn recent_mean(&self, count: usize) -> f32 {
        let len = self.values.len();
        let count = count.min(len);
        let mut sum = 0.0;
        for i in 0..count {
            let idx = (self.head + len - 1 - i) % len;
            sum += self.values[idx];
        }
        sum / count as f32
    }

    /// Population variance over the `count` most recent values.
    pub fn recent_variance(&self, count: usize) -> f32 {
        let len = self.values.len();
        let count = count.min(len);
        let mean = self.recent_mean(count);
        let mut variance = 0.0;
        for i in 0..count {
            let idx = (self.head + len - 1 - i) % len;
            let delta = self.values[idx] - mean;
            variance += delta * delta;
        }
        variance / count as f32
    }

    /// Copy of the ring ordered oldest to newest.
    pub fn snapshot(&self) -> Vec<f32> {
        let len = self.values.len();
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            out.push(self.values[(self.head + i) % len]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_overwrites_oldest() {
        let mut history = History::new(4);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            history.push(v);
        }
        assert_eq!(history.snapshot(), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn recent_mean_ignores_older_values() {
        let mut history = History::new(8);
        for v in [10.0, 10.0, 10.0, 10.0, 2.0, 2.0, 2.0, 2.0] {
            history.push(v);
        }
        assert_eq!(history.recent_mean(4), 2.0);
        assert_eq!(history.mean(), 6.0);
    }

    #[test]
    fn variance_of_constant_window_is_zero() {
        let mut history = History::new(8);
        for _ in 0..8 {
            history.push(0.7);
        }
        assert_eq!(history.recent_variance(4), 0.0);
    }

    #[test]
    fn variance_wraps_around_head() {
        let mut history = History::new(4);
        for v in [0.0, 0.0, 1.0, -1.0, 1.0, -1.0] {
            history.push(v);
        }
        // Window is [1, -1, 1, -1]: mean 0, variance 1.
        assert!((history.recent_variance(4) - 1.0).abs() < 1e-6);
    }
}
