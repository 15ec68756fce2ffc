//! Adaptiv Types - Core types for asset health and capability state
//!
//! Adaptiv turns raw vibration telemetry into a fused health score and uses
//! that score to drive changes to a machine's advertised manufacturing
//! capability.
//!
//! ## Architectural Boundaries
//!
//! - **adaptiv-monitor** owns: anomaly detection, health fusion, physics fallback
//! - **adaptiv-policy** owns: capability rules and their evaluation
//! - **adaptiv-audit** owns: the bounded trail of applied capability writes
//! - **External registry** owns: the live capability state of every asset
//!
//! ## Key Concepts
//!
//! - **SensorReading**: one vibration sample with its operating conditions
//! - **CapabilityAttribute**: an independently writable capability property
//! - **AssuranceState**: categorical trust level of a capability
//! - **CapabilityState**: a local view of an asset's advertised capability

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod capability;
pub mod ids;
pub mod paths;
pub mod reading;

// Re-export main types
pub use capability::{
    AssuranceState, CapabilityAttribute, CapabilityState, CapabilityValueError, UnknownAttribute,
};
pub use ids::AssetId;
pub use paths::{
    capability_submodel_id, health_submodel_id, simulation_submodel_id, HealthElement,
    SUBMODEL_PREFIX,
};
pub use reading::SensorReading;
