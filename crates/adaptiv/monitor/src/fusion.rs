//! Health fusion.
//!
//! Fuses the statistical anomaly score with the physics residual into a
//! single health index and confidence:
//!
//! ```text
//! confidence   = 1 - min(1, w_ml * anomaly + w_physics * residual)
//! health_index = floor(100 * confidence)
//! ```
//!
//! The weights are not required to sum to one. When they sum above one the
//! confidence saturates to zero before both signals reach their maximum.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MonitorError, MonitorResult};

/// Weights applied to the two fused signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    /// Weight of the anomaly score.
    pub ml_weight: f64,

    /// Weight of the physics residual.
    pub physics_weight: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            ml_weight: 0.6,
            physics_weight: 0.4,
        }
    }
}

impl FusionWeights {
    pub fn validate(&self) -> MonitorResult<()> {
        let in_range = |w: f64| (0.0..=1.0).contains(&w);
        if in_range(self.ml_weight) && in_range(self.physics_weight) {
            Ok(())
        } else {
            Err(MonitorError::InvalidWeights {
                ml_weight: self.ml_weight,
                physics_weight: self.physics_weight,
            })
        }
    }
}

/// Result of a fusion computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthResult {
    /// Overall health, 0-100.
    pub health_index: u8,

    /// Confidence in [0, 1], rounded to 3 decimals.
    pub health_confidence: f64,

    /// Clamped anomaly score, rounded to 3 decimals.
    pub anomaly_score: f64,

    /// Clamped physics residual, rounded to 3 decimals.
    pub physics_residual: f64,
}

/// Fuses anomaly and physics signals into health metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthFusion {
    weights: FusionWeights,
}

impl HealthFusion {
    /// Create a fusion engine; both weights must lie in [0, 1].
    pub fn new(ml_weight: f64, physics_weight: f64) -> MonitorResult<Self> {
        Self::from_weights(FusionWeights {
            ml_weight,
            physics_weight,
        })
    }

    pub fn from_weights(weights: FusionWeights) -> MonitorResult<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> FusionWeights {
        self.weights
    }

    /// Label describing the fusion method and its weights.
    pub fn fusion_method(&self) -> String {
        format!(
            "weighted_v1(ml={}, physics={})",
            self.weights.ml_weight, self.weights.physics_weight
        )
    }

    /// Compute fused health metrics. Inputs are clamped to [0, 1].
    pub fn compute(&self, anomaly_score: f64, physics_residual: f64) -> HealthResult {
        let a = clamp_unit(anomaly_score);
        let r = clamp_unit(physics_residual);

        let load = self.weights.ml_weight * a + self.weights.physics_weight * r;
        let confidence = 1.0 - load.min(1.0);
        let health_index = (100.0 * confidence).floor() as u8;

        debug!(anomaly = a, residual = r, confidence, health_index, "Fused health");

        HealthResult {
            health_index,
            health_confidence: round3(confidence),
            anomaly_score: round3(a),
            physics_residual: round3(r),
        }
    }

    /// Compute health after blending each signal with the mean of its history.
    ///
    /// Signals with no history pass through unblended.
    pub fn compute_with_history(
        &self,
        current_anomaly: f64,
        current_residual: f64,
        history_anomaly: Option<&[f64]>,
        history_residual: Option<&[f64]>,
        history_weight: f64,
    ) -> HealthResult {
        let anomaly = blend(current_anomaly, history_anomaly, history_weight);
        let residual = blend(current_residual, history_residual, history_weight);
        self.compute(anomaly, residual)
    }
}

impl Default for HealthFusion {
    fn default() -> Self {
        Self {
            weights: FusionWeights::default(),
        }
    }
}

/// Compute health with the default weights.
pub fn compute_health(anomaly_score: f64, physics_residual: f64) -> HealthResult {
    HealthFusion::default().compute(anomaly_score, physics_residual)
}

fn blend(current: f64, history: Option<&[f64]>, weight: f64) -> f64 {
    match history {
        Some(values) if !values.is_empty() => {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            (1.0 - weight) * current + weight * mean
        }
        _ => current,
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
