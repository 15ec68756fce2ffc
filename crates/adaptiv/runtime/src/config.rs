//! Service configuration
//!
//! Layered as: built-in defaults, then an optional file, then `ADAPTIV_`
//! environment variables. Nested keys use `__`, e.g.
//! `ADAPTIV_FUSION__ML_WEIGHT=0.7` or `ADAPTIV_DETECTOR__WINDOW_SIZE=500`.

use std::path::PathBuf;

use adaptiv_audit::DEFAULT_CAPACITY;
use adaptiv_monitor::{DetectorConfig, FallbackPhysicsModel, FusionWeights, RegistryConfig};
use serde::{Deserialize, Serialize};

use crate::error::RuntimeResult;

/// Top-level service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Anomaly detector thresholds and baseline
    pub detector: DetectorConfig,

    /// Optional JSON calibration file overlaid on `detector`
    pub model_path: Option<PathBuf>,

    /// Detector sharing between assets
    pub registry: RegistryConfig,

    /// Fusion weights
    pub fusion: FusionWeights,

    /// Closed-form physics model used when no simulation is attached
    pub physics: FallbackPhysicsModel,

    /// Capability rules
    pub policy: PolicyConfig,

    /// Audit trail
    pub audit: AuditConfig,

    /// Logging
    pub logging: LoggingConfig,
}

/// Policy configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// YAML rule file; the built-in table is used when unset
    pub rules_file: Option<PathBuf>,
}

/// Audit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Maximum number of entries kept
    pub capacity: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from defaults, an optional file, and the environment
    pub fn load(path: Option<&str>) -> RuntimeResult<Self> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&ServiceConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with ADAPTIV_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("ADAPTIV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}
