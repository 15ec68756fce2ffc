//! Capability pipeline
//!
//! Wires the monitor, policy, and audit crates together:
//!
//! ```text
//! SensorReading -> detector -> anomaly ┐
//!               -> simulation -> residual ┴-> fusion -> health -> policy -> actions -> audit
//! ```
//!
//! The pipeline never talks to the asset registry. It keeps a local mirror
//! of the capability values it has written so audit entries can carry the
//! value each write replaced.

use std::sync::Arc;

use adaptiv_audit::{AuditEntry, AuditRecorder};
use adaptiv_monitor::{
    physics_residual, DetectorRegistry, Explanation, FallbackPhysicsModel, HealthFusion,
    HealthResult, SimulationProvider,
};
use adaptiv_policy::{PolicyAction, PolicyEngine};
use adaptiv_types::{
    capability_submodel_id, health_submodel_id, simulation_submodel_id, AssetId, CapabilityState,
    HealthElement, SensorReading,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::ServiceConfig;
use crate::error::RuntimeResult;

/// Result of assessing one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub asset_id: AssetId,

    #[serde(flatten)]
    pub health: HealthResult,

    /// Expected vibration used for the physics residual
    pub vib_rms_expected: f64,

    #[serde(flatten)]
    pub explanation: Explanation,

    pub timestamp: DateTime<Utc>,
}

impl Assessment {
    /// Health submodel writes for this assessment, in write order
    pub fn health_writes(&self) -> HealthWriteSet {
        let health = &self.health;
        let explanation = &self.explanation;
        let writes = [
            (HealthElement::HealthIndex, health.health_index.to_string()),
            (HealthElement::HealthConfidence, health.health_confidence.to_string()),
            (HealthElement::AnomalyScore, health.anomaly_score.to_string()),
            (HealthElement::PhysicsResidual, health.physics_residual.to_string()),
            (HealthElement::LastUpdate, self.timestamp.to_rfc3339()),
            (HealthElement::DecisionRationale, explanation.decision_rationale.clone()),
            (HealthElement::DetectedPattern, explanation.detected_pattern.to_string()),
            (HealthElement::FusionMethod, explanation.fusion_method.clone()),
            (HealthElement::ConfidenceInterval, explanation.confidence_interval.clone()),
        ];

        HealthWriteSet {
            submodel_id: health_submodel_id(&self.asset_id),
            writes: writes
                .into_iter()
                .map(|(element, value)| ElementWrite {
                    path: element.path().to_string(),
                    value,
                })
                .collect(),
        }
    }
}

/// One element write against a submodel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementWrite {
    pub path: String,
    pub value: String,
}

/// Health submodel writes produced by one assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthWriteSet {
    pub submodel_id: String,
    pub writes: Vec<ElementWrite>,
}

/// Assessment plus the capability writes it triggered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub assessment: Assessment,
    pub actions: Vec<PolicyAction>,
}

/// End-to-end health and capability pipeline
pub struct CapabilityPipeline {
    detectors: DetectorRegistry,
    fusion: HealthFusion,
    simulator: Arc<dyn SimulationProvider>,
    policy: PolicyEngine,
    audit: AuditRecorder,
    capabilities: DashMap<AssetId, CapabilityState>,
}

impl CapabilityPipeline {
    /// Build every component from configuration.
    ///
    /// Invalid fusion weights are fatal. Missing or malformed model and rule
    /// files fall back to built-in defaults.
    pub fn from_config(config: &ServiceConfig) -> RuntimeResult<Self> {
        let detector_config = match &config.model_path {
            Some(path) => config.detector.with_model_file(path),
            None => config.detector.clone(),
        };

        let fusion = HealthFusion::from_weights(config.fusion)?;

        let policy = match &config.policy.rules_file {
            Some(path) => PolicyEngine::load_from_file(path),
            None => PolicyEngine::new(),
        };

        info!(
            ml_weight = config.fusion.ml_weight,
            physics_weight = config.fusion.physics_weight,
            rules = policy.len(),
            audit_capacity = config.audit.capacity,
            "Capability pipeline configured"
        );

        Ok(Self::new(
            DetectorRegistry::new(detector_config, config.registry),
            fusion,
            Arc::new(config.physics),
            policy,
            AuditRecorder::new(config.audit.capacity),
        ))
    }

    pub fn new(
        detectors: DetectorRegistry,
        fusion: HealthFusion,
        simulator: Arc<dyn SimulationProvider>,
        policy: PolicyEngine,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            detectors,
            fusion,
            simulator,
            policy,
            audit,
            capabilities: DashMap::new(),
        }
    }

    /// Replace the simulation provider
    pub fn with_simulator(mut self, simulator: Arc<dyn SimulationProvider>) -> Self {
        self.simulator = simulator;
        self
    }

    pub fn detectors(&self) -> &DetectorRegistry {
        &self.detectors
    }

    pub fn fusion(&self) -> &HealthFusion {
        &self.fusion
    }

    pub fn policy(&self) -> &PolicyEngine {
        &self.policy
    }

    pub fn audit(&self) -> &AuditRecorder {
        &self.audit
    }

    /// Score a reading and fuse it into a health assessment
    pub fn assess(&self, reading: &SensorReading) -> Assessment {
        let asset_id = &reading.asset_id;
        info!(asset_id = %asset_id, "Assessing health");

        let anomaly = self
            .detectors
            .detect(asset_id, reading.vib_rms, reading.omega, reading.load);

        let vib_rms_expected = match self.simulator.simulate(
            asset_id,
            reading.omega,
            reading.load,
            reading.wear,
        ) {
            Ok(expectation) => expectation.vib_rms_expected,
            Err(e) => {
                warn!(
                    asset_id = %asset_id,
                    submodel = %simulation_submodel_id(asset_id),
                    simulator = self.simulator.name(),
                    error = %e,
                    "Simulation failed, using measured value as expected"
                );
                reading.vib_rms
            }
        };

        let residual = physics_residual(reading.vib_rms, vib_rms_expected);
        let health = self.fusion.compute(anomaly, residual);
        let explanation = Explanation::new(&self.fusion, anomaly, residual, &health);

        debug!(
            asset_id = %asset_id,
            anomaly,
            residual,
            health_index = health.health_index,
            pattern = %explanation.detected_pattern,
            "Assessment complete"
        );

        Assessment {
            asset_id: asset_id.clone(),
            health,
            vib_rms_expected,
            explanation,
            timestamp: Utc::now(),
        }
    }

    /// Actions the policy prescribes for a health index
    pub fn evaluate(&self, health_index: u8) -> Vec<PolicyAction> {
        self.policy.evaluate(health_index)
    }

    /// Evaluate the policy and apply its actions to the capability mirror.
    ///
    /// Each successful write is audited. A write the mirror rejects is
    /// logged and skipped; the remaining actions are still applied. Returns
    /// the actions that were applied.
    pub fn evaluate_and_apply(&self, asset_id: &AssetId, health_index: u8) -> Vec<PolicyAction> {
        let actions = self.policy.evaluate(health_index);
        if actions.is_empty() {
            debug!(asset_id = %asset_id, health_index, "No policy actions");
            return actions;
        }

        info!(asset_id = %asset_id, count = actions.len(), "Applying capability changes");
        self.record_applied(asset_id, health_index, &actions)
    }

    /// Record actions that were applied to the registry by the caller.
    ///
    /// Returns the subset the mirror accepted.
    pub fn record_applied(
        &self,
        asset_id: &AssetId,
        health_index: u8,
        actions: &[PolicyAction],
    ) -> Vec<PolicyAction> {
        let mut applied = Vec::with_capacity(actions.len());
        let submodel = capability_submodel_id(asset_id);
        let mut state = self.capabilities.entry(asset_id.clone()).or_default();
        let was_dispatchable = state.assurance_state.map_or(true, |s| s.is_dispatchable());

        for action in actions {
            match state.set_path(&action.path, &action.value) {
                Ok(old_value) => {
                    info!(
                        asset_id = %asset_id,
                        submodel = %submodel,
                        path = %action.path,
                        value = %action.value,
                        was = ?old_value,
                        "Patched capability"
                    );
                    self.audit.record(AuditEntry::policy_patch(
                        asset_id.clone(),
                        &action.path,
                        old_value,
                        &action.value,
                        health_index,
                    ));
                    applied.push(action.clone());
                }
                Err(e) => {
                    error!(
                        asset_id = %asset_id,
                        path = %action.path,
                        error = %e,
                        "Failed to apply action"
                    );
                }
            }
        }

        if let Some(assurance) = state.assurance_state {
            if was_dispatchable && !assurance.is_dispatchable() {
                warn!(asset_id = %asset_id, health_index, "Capability withdrawn from dispatch");
            }
        }

        applied
    }

    /// Operator override of one capability element. Returns the previous value.
    pub fn manual_patch(
        &self,
        asset_id: &AssetId,
        path: &str,
        value: &str,
    ) -> RuntimeResult<Option<String>> {
        let mut state = self.capabilities.entry(asset_id.clone()).or_default();
        let old_value = state.set_path(path, value)?;

        info!(asset_id = %asset_id, path, value, "Manual capability override");
        self.audit.record(AuditEntry::manual_patch(
            asset_id.clone(),
            path,
            old_value.clone(),
            value,
        ));

        Ok(old_value)
    }

    /// Assess a reading and apply the resulting capability changes
    pub fn process(&self, reading: &SensorReading) -> PipelineOutcome {
        let assessment = self.assess(reading);
        let actions = self.evaluate_and_apply(&reading.asset_id, assessment.health.health_index);
        PipelineOutcome {
            assessment,
            actions,
        }
    }

    /// Mirrored capability state of an asset
    pub fn capability(&self, asset_id: &AssetId) -> Option<CapabilityState> {
        self.capabilities.get(asset_id).map(|s| s.value().clone())
    }
}

impl Default for CapabilityPipeline {
    fn default() -> Self {
        Self::new(
            DetectorRegistry::default(),
            HealthFusion::default(),
            Arc::new(FallbackPhysicsModel::default()),
            PolicyEngine::new(),
            AuditRecorder::default(),
        )
    }
}
