//! Rolling residual statistics.
//!
//! A fixed-capacity window that keeps a running sum and sum of squares so the
//! mean and variance are available in constant time. Both aggregates use
//! compensated summation and are rebuilt from the window once every
//! `capacity` evictions, so an evicted outlier cannot leave residue behind.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Neumaier running sum; `value()` carries the low-order bits lost to
/// cancellation.
#[derive(Debug, Clone, Copy, Default)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Fixed-capacity rolling window over detector residuals.
///
/// Invariant: `sum == Σ window` and `sum_sq == Σ window²` (up to floating
/// point error), and `window.len() <= capacity`.
#[derive(Debug, Clone)]
pub struct ResidualTracker {
    window: VecDeque<f64>,
    capacity: usize,
    sum: CompensatedSum,
    sum_sq: CompensatedSum,
    evictions: usize,
}

impl ResidualTracker {
    /// Create an empty tracker. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            sum: CompensatedSum::default(),
            sum_sq: CompensatedSum::default(),
            evictions: 0,
        }
    }

    /// Append a residual, evicting the oldest value when full.
    ///
    /// Amortized O(1): the aggregates are recomputed from the window once
    /// per `capacity` evictions.
    pub fn push(&mut self, residual: f64) {
        if self.window.len() == self.capacity {
            if let Some(oldest) = self.window.pop_front() {
                self.sum.add(-oldest);
                self.sum_sq.add(-oldest * oldest);
                self.evictions += 1;
            }
            if self.evictions >= self.capacity {
                self.rebuild();
            }
        }

        self.window.push_back(residual);
        self.sum.add(residual);
        self.sum_sq.add(residual * residual);
    }

    fn rebuild(&mut self) {
        self.sum = CompensatedSum::default();
        self.sum_sq = CompensatedSum::default();
        for &v in &self.window {
            self.sum.add(v);
            self.sum_sq.add(v * v);
        }
        self.evictions = 0;
    }

    pub fn count(&self) -> usize {
        self.window.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Mean of the current window, 0 when empty.
    pub fn mean(&self) -> f64 {
        match self.window.len() {
            0 => 0.0,
            n => self.sum.value() / n as f64,
        }
    }

    /// Population variance of the current window, clamped to be non-negative.
    pub fn variance(&self) -> f64 {
        let n = self.window.len();
        if n == 0 {
            return 0.0;
        }
        let mean = self.sum.value() / n as f64;
        (self.sum_sq.value() / n as f64 - mean * mean).max(0.0)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Drop every value and reset the aggregates.
    pub fn clear(&mut self) {
        self.window.clear();
        self.sum = CompensatedSum::default();
        self.sum_sq = CompensatedSum::default();
        self.evictions = 0;
    }

    /// Snapshot of the current window statistics.
    pub fn statistics(&self) -> ResidualStatistics {
        ResidualStatistics {
            mean: self.mean(),
            std: self.std_dev(),
            count: self.count(),
        }
    }

    /// Values currently held, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.window.iter().copied()
    }
}

/// Summary of the residual window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResidualStatistics {
    pub mean: f64,
    pub std: f64,
    pub count: usize,
}
