//! # Adaptiv Monitor - Hybrid Health Assessment
//!
//! This crate turns vibration telemetry into a health index by fusing a
//! statistical anomaly score with a physics-based residual.
//!
//! ## Overview
//!
//! Two independent signals feed every assessment:
//!
//! - **Anomaly score**: how unusual the measurement is against a linear
//!   baseline and the asset's own recent residual history
//! - **Physics residual**: how far the measurement sits from what a physics
//!   model of the bearing predicts for the same operating point
//!
//! [`HealthFusion`] combines them into a 0-100 health index and confidence.
//!
//! ## Key Components
//!
//! - [`AnomalyDetector`]: Rolling-window anomaly scoring for one asset
//! - [`DetectorRegistry`]: Per-asset detectors behind a concurrent map
//! - [`HealthFusion`]: Weighted fusion of both signals
//! - [`SimulationProvider`]: Source of physics expectations
//! - [`Explanation`]: Human-readable rationale for an assessment
//!
//! ## Example
//!
//! ```rust
//! use adaptiv_monitor::{physics_residual, DetectorRegistry, FallbackPhysicsModel, HealthFusion};
//! use adaptiv_types::AssetId;
//!
//! let registry = DetectorRegistry::default();
//! let fusion = HealthFusion::default();
//! let physics = FallbackPhysicsModel::default();
//!
//! let asset = AssetId::new("milling-01");
//! let anomaly = registry.detect(&asset, 1.8, 100.0, 500.0);
//! let expected = physics.expected(100.0, 500.0, 0.0);
//! let residual = physics_residual(1.8, expected.vib_rms_expected);
//!
//! let result = fusion.compute(anomaly, residual);
//! assert!(result.health_index <= 100);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod detector;
pub mod error;
pub mod explain;
pub mod fusion;
pub mod physics;
pub mod registry;
pub mod stats;

pub use config::{DetectorConfig, IsolationMode, LinearCoefficients, ModelFile, RegistryConfig};
pub use detector::{AnomalyDetector, Detection};
pub use error::{MonitorError, MonitorResult};
pub use explain::{confidence_interval, decision_rationale, DetectedPattern, Explanation};
pub use fusion::{compute_health, FusionWeights, HealthFusion, HealthResult};
pub use physics::{physics_residual, FallbackPhysicsModel, PhysicsExpectation, SimulationProvider};
pub use registry::DetectorRegistry;
pub use stats::{ResidualStatistics, ResidualTracker};
