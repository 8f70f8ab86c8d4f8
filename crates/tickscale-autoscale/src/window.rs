//! Moving window of observed execution times.

use std::collections::VecDeque;

/// The last N execution-time samples of a function, in milliseconds.
#[derive(Debug, Clone)]
pub struct ExecutionWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl ExecutionWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a sample, evicting the oldest once the window is full.
    pub fn record(&mut self, execution_time_ms: f64) {
        self.samples.push_back(execution_time_ms);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Arithmetic mean of the window, or `None` if no samples yet.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
