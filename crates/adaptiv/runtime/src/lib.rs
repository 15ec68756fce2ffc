//! # Adaptiv Runtime
//!
//! Orchestrates the health assessment and capability pipeline.
//!
//! A [`CapabilityPipeline`] is built from a [`ServiceConfig`] and processes
//! one [`SensorReading`](adaptiv_types::SensorReading) at a time:
//!
//! 1. Score the vibration against the asset's own history
//! 2. Compare the measurement with the physics expectation
//! 3. Fuse both into a health index with an explanation
//! 4. Evaluate capability rules against the health index
//! 5. Mirror and audit the resulting capability writes
//!
//! ## Example
//!
//! ```rust
//! use adaptiv_runtime::{CapabilityPipeline, ServiceConfig};
//! use adaptiv_types::SensorReading;
//!
//! let pipeline = CapabilityPipeline::from_config(&ServiceConfig::default()).unwrap();
//! let outcome = pipeline.process(&SensorReading::new("milling-01", 1.6));
//! assert_eq!(outcome.assessment.health.health_index, 100);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod telemetry;

pub use config::{AuditConfig, LoggingConfig, PolicyConfig, ServiceConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use pipeline::{Assessment, CapabilityPipeline, ElementWrite, HealthWriteSet, PipelineOutcome};
pub use telemetry::init_tracing;
