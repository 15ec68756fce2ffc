//! Error types for adaptiv-monitor crate.
//!
//! Defines model file, fusion, and simulation errors.

use std::path::PathBuf;

use adaptiv_types::AssetId;
use thiserror::Error;

/// Errors that can occur during health monitoring operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Fusion weights outside [0, 1].
    #[error("fusion weights must be in [0, 1]: ml={ml_weight}, physics={physics_weight}")]
    InvalidWeights { ml_weight: f64, physics_weight: f64 },

    /// Detector model file could not be read or parsed.
    #[error("failed to load model file {path}: {reason}")]
    ModelFile { path: PathBuf, reason: String },

    /// Physics simulation did not produce a usable expectation.
    #[error("simulation failed for asset {asset_id}: {reason}")]
    SimulationFailed { asset_id: AssetId, reason: String },
}

/// Result type for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;
