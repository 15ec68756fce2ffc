//! End-to-end pipeline behaviour

use std::io::Write;
use std::sync::Arc;

use adaptiv_audit::AuditAction;
use adaptiv_monitor::{
    DetectedPattern, MonitorError, MonitorResult, PhysicsExpectation, SimulationProvider,
};
use adaptiv_policy::PolicyAction;
use adaptiv_runtime::{CapabilityPipeline, RuntimeError, ServiceConfig};
use adaptiv_types::{AssetId, AssuranceState, CapabilityAttribute, HealthElement, SensorReading};

struct FailingSimulator;

impl SimulationProvider for FailingSimulator {
    fn simulate(
        &self,
        asset_id: &AssetId,
        _omega: f64,
        _load: f64,
        _wear: f64,
    ) -> MonitorResult<PhysicsExpectation> {
        Err(MonitorError::SimulationFailed {
            asset_id: asset_id.clone(),
            reason: "no model".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn pipeline() -> CapabilityPipeline {
    CapabilityPipeline::from_config(&ServiceConfig::default()).unwrap()
}

#[test]
fn healthy_reading_assures_capability() {
    let pipeline = pipeline();
    let asset = AssetId::new("milling-01");

    let outcome = pipeline.process(&SensorReading::new(asset.clone(), 1.6));
    let assessment = &outcome.assessment;

    assert_eq!(assessment.health.health_index, 100);
    assert_eq!(assessment.health.health_confidence, 1.0);
    assert_eq!(assessment.explanation.detected_pattern, DetectedPattern::Normal);
    assert_eq!(assessment.explanation.confidence_interval, "±0.0%");
    assert!((assessment.vib_rms_expected - 1.6).abs() < 1e-9);

    assert_eq!(outcome.actions.len(), 4);
    let state = pipeline.capability(&asset).unwrap();
    assert_eq!(state.assurance_state, Some(AssuranceState::Assured));
    assert_eq!(state.surface_finish_grade.as_deref(), Some("A"));

    let audit = pipeline.audit().query(Some(&asset), 100);
    assert_eq!(audit.len(), 4);
    assert!(audit.iter().all(|e| e.action == AuditAction::Patch));
    assert!(audit.iter().all(|e| e.reason == "Health index = 100"));
    assert!(audit.iter().all(|e| e.old_value.is_none()));
}

#[test]
fn degradation_withdraws_capability_and_audits_previous_value() {
    let pipeline = pipeline();
    let asset = AssetId::new("milling-01");
    pipeline.process(&SensorReading::new(asset.clone(), 1.6));

    // ratio 1.4 / 1.6 on both signals, no z-score history yet
    let outcome = pipeline.process(&SensorReading::new(asset.clone(), 3.0));
    assert_eq!(outcome.assessment.health.health_index, 38);
    assert_eq!(
        outcome.assessment.explanation.decision_rationale,
        "ML model detected minor anomalies in vibration. \
         Physics model shows significant deviation from expected (possible wear). \
         Asset requires attention - capability may be compromised."
    );

    let state = pipeline.capability(&asset).unwrap();
    assert_eq!(state.assurance_state, Some(AssuranceState::NotAvailable));
    assert_eq!(state.tolerance_class.as_deref(), Some("±0.05mm"));

    let latest = pipeline.audit().query(Some(&asset), 4);
    let assurance = latest
        .iter()
        .find(|e| e.path == CapabilityAttribute::AssuranceState.path())
        .unwrap();
    assert_eq!(assurance.old_value.as_deref(), Some("assured"));
    assert_eq!(assurance.new_value, "notAvailable");
    assert_eq!(assurance.reason, "Health index = 38");
}

#[test]
fn assets_do_not_share_detector_history() {
    let pipeline = pipeline();
    let noisy = AssetId::new("noisy");
    for v in [6.0, 0.5, 5.0, 0.4, 7.0] {
        pipeline.assess(&SensorReading::new(noisy.clone(), v));
    }

    let quiet = pipeline.assess(&SensorReading::new("quiet", 1.6));
    assert_eq!(quiet.health.health_index, 100);
    assert_eq!(pipeline.detectors().len(), 2);
}

#[test]
fn failed_simulation_uses_measured_value() {
    let pipeline = pipeline().with_simulator(Arc::new(FailingSimulator));
    let assessment = pipeline.assess(&SensorReading::new("milling-01", 3.0));

    assert_eq!(assessment.vib_rms_expected, 3.0);
    assert_eq!(assessment.health.physics_residual, 0.0);
}

#[test]
fn invalid_fusion_weights_are_fatal() {
    let mut config = ServiceConfig::default();
    config.fusion.ml_weight = 1.5;

    assert!(matches!(
        CapabilityPipeline::from_config(&config),
        Err(RuntimeError::Monitor(MonitorError::InvalidWeights { .. }))
    ));
}

#[test]
fn rules_file_is_loaded_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"
rules:
  - when: "health >= 0"
    actions:
      - path: "Capabilities/ProcessCapability:Milling/SurfaceFinishGrade"
        value: "B"
"#
    )
    .unwrap();

    let mut config = ServiceConfig::default();
    config.policy.rules_file = Some(path);
    let pipeline = CapabilityPipeline::from_config(&config).unwrap();

    assert_eq!(
        pipeline.evaluate(100),
        vec![PolicyAction::new(
            CapabilityAttribute::SurfaceFinishGrade.path(),
            "B"
        )]
    );
}

#[test]
fn manual_patch_is_audited() {
    let pipeline = pipeline();
    let asset = AssetId::new("milling-01");
    let path = CapabilityAttribute::EnergyCostPerPart.path();

    assert_eq!(pipeline.manual_patch(&asset, path, "0.9").unwrap(), None);
    assert_eq!(
        pipeline.manual_patch(&asset, path, "1.1").unwrap().as_deref(),
        Some("0.9")
    );

    let entries = pipeline.audit().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].action, AuditAction::ManualPatch);
    assert_eq!(entries[1].reason, "Manual admin override");

    assert!(pipeline.manual_patch(&asset, "Unknown/Element", "x").is_err());
    assert!(pipeline.manual_patch(&asset, path, "cheap").is_err());
    assert_eq!(pipeline.audit().len(), 2);
}

#[test]
fn rejected_action_does_not_block_the_rest() {
    let pipeline = pipeline();
    let asset = AssetId::new("milling-01");
    let actions = vec![
        PolicyAction::new(CapabilityAttribute::AssuranceState.path(), "sometimes"),
        PolicyAction::new(CapabilityAttribute::SurfaceFinishGrade.path(), "B"),
    ];

    let applied = pipeline.record_applied(&asset, 85, &actions);
    assert_eq!(applied, vec![actions[1].clone()]);
    assert_eq!(pipeline.audit().len(), 1);
}

#[test]
fn assessment_serializes_flat() {
    let pipeline = pipeline();
    let assessment = pipeline.assess(&SensorReading::new("milling-01", 1.6));
    let json = serde_json::to_value(&assessment).unwrap();

    assert_eq!(json["asset_id"], "milling-01");
    assert_eq!(json["health_index"], 100);
    assert_eq!(json["detected_pattern"], "normal");
    assert_eq!(json["fusion_method"], "weighted_v1(ml=0.6, physics=0.4)");
}

#[test]
fn health_writes_cover_every_element() {
    let pipeline = pipeline();
    let assessment = pipeline.assess(&SensorReading::new("milling-01", 1.6));
    let set = assessment.health_writes();

    assert_eq!(set.submodel_id, "urn:adaptivx:submodel:health:milling-01");

    let value = |element: HealthElement| {
        set.writes
            .iter()
            .find(|w| w.path == element.path())
            .map(|w| w.value.as_str())
    };
    assert_eq!(set.writes.len(), 9);
    assert_eq!(set.writes[0].path, "HealthIndex");
    assert_eq!(value(HealthElement::HealthIndex), Some("100"));
    assert_eq!(value(HealthElement::HealthConfidence), Some("1"));
    assert_eq!(value(HealthElement::AnomalyScore), Some("0"));
    assert_eq!(value(HealthElement::DetectedPattern), Some("normal"));
    assert_eq!(value(HealthElement::ConfidenceInterval), Some("±0.0%"));
    assert_eq!(
        value(HealthElement::FusionMethod),
        Some("weighted_v1(ml=0.6, physics=0.4)")
    );
    assert_eq!(
        value(HealthElement::LastUpdate).map(str::to_string),
        Some(assessment.timestamp.to_rfc3339())
    );
    assert!(set
        .writes
        .iter()
        .any(|w| w.path == "ExplainabilityBundle.DecisionRationale"));
}
