//! Anomaly detector configuration.
//!
//! Defines the linear vibration baseline, detection thresholds, and the JSON
//! model file format used to override them per deployment.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MonitorError, MonitorResult};

/// Linear baseline coefficients for expected vibration.
///
/// `expected = base + k1 * omega + k2 * load`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearCoefficients {
    pub base: f64,
    pub k1: f64,
    pub k2: f64,
}

impl Default for LinearCoefficients {
    fn default() -> Self {
        Self {
            base: 0.5,
            k1: 0.001,
            k2: 0.002,
        }
    }
}

impl LinearCoefficients {
    /// Expected vibration RMS for the given operating conditions.
    pub fn expected(&self, omega: f64, load: f64) -> f64 {
        self.base + self.k1 * omega + self.k2 * load
    }
}

/// How detector state is shared between assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationMode {
    /// One residual window per asset.
    #[default]
    PerAsset,

    /// A single residual window shared by every asset.
    Shared,
}

/// Configuration for the detector registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Per-asset or shared residual windows.
    pub isolation: IsolationMode,
}

/// Configuration for anomaly detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Absolute vibration threshold [mm/s].
    pub threshold_vib_rms: f64,

    /// Multiplier applied to `threshold_vib_rms` for the hard override.
    pub threshold_factor: f64,

    /// Z-score at which the statistical component saturates.
    pub zscore_threshold: f64,

    /// Residuals required before the z-score contributes.
    pub min_samples: usize,

    /// Capacity of the rolling residual window.
    pub window_size: usize,

    /// Baseline coefficients.
    pub coefficients: LinearCoefficients,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold_vib_rms: 3.0,
            threshold_factor: 2.0,
            zscore_threshold: 3.0,
            min_samples: 20,
            window_size: 200,
            coefficients: LinearCoefficients::default(),
        }
    }
}

impl DetectorConfig {
    /// Vibration above which the score is floored at 0.8.
    pub fn hard_limit(&self) -> f64 {
        self.threshold_vib_rms * self.threshold_factor
    }

    /// Overlay values from a model file, failing without partial updates.
    pub fn try_with_model_file(&self, path: impl AsRef<Path>) -> MonitorResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| MonitorError::ModelFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let model: ModelFile = serde_json::from_str(&raw).map_err(|e| MonitorError::ModelFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(model.apply(self.clone()))
    }

    /// Overlay values from a model file, keeping `self` when it is missing
    /// or malformed.
    pub fn with_model_file(&self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Model file not found, using defaults");
            return self.clone();
        }

        match self.try_with_model_file(path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded anomaly detector model");
                config
            }
            Err(e) => {
                warn!(error = %e, "Failed to load model file, using defaults");
                self.clone()
            }
        }
    }
}

/// On-disk calibration file.
///
/// ```json
/// {
///   "thresholds": {"vib_rms": 3.0, "factor": 2.0, "zscore": 3.0,
///                  "min_samples": 20, "window_size": 200},
///   "coefficients": {"base": 0.5, "k1": 0.001, "k2": 0.002}
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelFile {
    pub thresholds: ModelThresholds,
    pub coefficients: ModelCoefficients,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelThresholds {
    pub vib_rms: Option<f64>,
    pub factor: Option<f64>,
    pub zscore: Option<f64>,
    pub min_samples: Option<usize>,
    pub window_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelCoefficients {
    pub base: Option<f64>,
    pub k1: Option<f64>,
    pub k2: Option<f64>,
}

impl ModelFile {
    fn apply(self, mut config: DetectorConfig) -> DetectorConfig {
        let t = self.thresholds;
        let c = self.coefficients;

        config.threshold_vib_rms = t.vib_rms.unwrap_or(config.threshold_vib_rms);
        config.threshold_factor = t.factor.unwrap_or(config.threshold_factor);
        config.zscore_threshold = t.zscore.unwrap_or(config.zscore_threshold);
        config.min_samples = t.min_samples.unwrap_or(config.min_samples);
        config.window_size = t.window_size.unwrap_or(config.window_size);

        config.coefficients = LinearCoefficients {
            base: c.base.unwrap_or(config.coefficients.base),
            k1: c.k1.unwrap_or(config.coefficients.k1),
            k2: c.k2.unwrap_or(config.coefficients.k2),
        };

        config
    }
}
