//! Statistical anomaly detection for vibration data.
//!
//! The detector combines three signals:
//!
//! - a linear baseline of expected vibration given speed and load
//! - the z-score of the current residual against a rolling window
//! - an absolute hard limit that statistical smoothing cannot suppress

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DetectorConfig;
use crate::stats::{ResidualStatistics, ResidualTracker};

/// Lower bound on the standard deviation used for the z-score.
const STD_EPSILON: f64 = 1e-6;

/// Score floor applied when the hard vibration limit is exceeded.
const HARD_LIMIT_FLOOR: f64 = 0.8;

/// Intermediate values of a single detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Expected vibration from the linear baseline.
    pub expected: f64,

    /// Measured minus expected.
    pub residual: f64,

    /// Z-score of the residual (0 while history is insufficient).
    pub zscore: f64,

    /// Saturated z-score contribution in [0, 1].
    pub zscore_component: f64,

    /// Saturated relative-deviation contribution in [0, 1].
    pub ratio_component: f64,

    /// Whether the absolute vibration limit forced the score up.
    pub hard_limit_exceeded: bool,

    /// Final anomaly score in [0, 1].
    pub score: f64,
}

/// Anomaly detector owning one rolling residual window.
///
/// `detect` mutates the window, so repeated calls with identical input do
/// not necessarily return identical scores.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: DetectorConfig,
    tracker: ResidualTracker,
}

impl AnomalyDetector {
    /// Create a detector with an empty window.
    pub fn new(config: DetectorConfig) -> Self {
        let tracker = ResidualTracker::new(config.window_size);
        Self { config, tracker }
    }

    /// Create a detector whose configuration is overlaid from a model file.
    ///
    /// A missing or malformed file leaves `config` unchanged.
    pub fn with_model_file(config: DetectorConfig, path: impl AsRef<Path>) -> Self {
        Self::new(config.with_model_file(path))
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Expected vibration for the given operating conditions.
    pub fn expected(&self, omega: f64, load: f64) -> f64 {
        self.config.coefficients.expected(omega, load)
    }

    /// Score a vibration measurement in [0, 1].
    pub fn detect(&mut self, vib_rms: f64, omega: f64, load: f64) -> f64 {
        self.detect_detailed(vib_rms, omega, load).score
    }

    /// Score a vibration measurement and return every intermediate value.
    ///
    /// A reading with a non-finite input is not added to the window. Its
    /// score is 0, or the hard-limit floor when `vib_rms` is `+inf`.
    pub fn detect_detailed(&mut self, vib_rms: f64, omega: f64, load: f64) -> Detection {
        let expected = self.expected(omega, load);
        let residual = vib_rms - expected;

        if !(vib_rms.is_finite() && omega.is_finite() && load.is_finite()) {
            warn!(vib_rms, omega, load, "Non-finite reading, residual window unchanged");
            let hard_limit_exceeded = vib_rms > self.config.hard_limit();
            return Detection {
                expected,
                residual,
                zscore: 0.0,
                zscore_component: 0.0,
                ratio_component: 0.0,
                hard_limit_exceeded,
                score: if hard_limit_exceeded { HARD_LIMIT_FLOOR } else { 0.0 },
            };
        }

        self.tracker.push(residual);

        let zscore = self.zscore(residual);
        let zscore_component = (zscore / self.config.zscore_threshold.max(0.1)).min(1.0);
        let ratio_component = (residual.abs() / expected.max(0.5)).min(1.0);

        let mut score = (0.5 * ratio_component + 0.5 * zscore_component).min(1.0);

        let hard_limit_exceeded = vib_rms > self.config.hard_limit();
        if hard_limit_exceeded {
            score = score.max(HARD_LIMIT_FLOOR);
        }

        debug!(vib_rms, expected, residual, zscore, score, "Anomaly detection");

        Detection {
            expected,
            residual,
            zscore,
            zscore_component,
            ratio_component,
            hard_limit_exceeded,
            score,
        }
    }

    fn zscore(&self, residual: f64) -> f64 {
        let required = self.config.min_samples.max(2);
        if self.tracker.count() < required {
            return 0.0;
        }

        let std = self.tracker.std_dev().max(STD_EPSILON);
        (residual - self.tracker.mean()).abs() / std
    }

    /// Current residual window statistics.
    pub fn statistics(&self) -> ResidualStatistics {
        self.tracker.statistics()
    }

    /// Number of residuals currently held.
    pub fn sample_count(&self) -> usize {
        self.tracker.count()
    }

    /// Forget all history; equivalent to a fresh detector with the same config.
    pub fn reset(&mut self) {
        self.tracker.clear();
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
