//! Submodel identifiers and health element paths

use std::fmt;

use crate::AssetId;

/// Prefix shared by every Adaptiv submodel identifier.
pub const SUBMODEL_PREFIX: &str = "urn:adaptivx:submodel";

pub fn health_submodel_id(asset_id: &AssetId) -> String {
    format!("{SUBMODEL_PREFIX}:health:{asset_id}")
}

pub fn capability_submodel_id(asset_id: &AssetId) -> String {
    format!("{SUBMODEL_PREFIX}:capability:{asset_id}")
}

pub fn simulation_submodel_id(asset_id: &AssetId) -> String {
    format!("{SUBMODEL_PREFIX}:simulationmodels:{asset_id}")
}

/// Element of the health submodel written after each assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthElement {
    HealthIndex,
    HealthConfidence,
    AnomalyScore,
    PhysicsResidual,
    LastUpdate,
    DecisionRationale,
    DetectedPattern,
    FusionMethod,
    ConfidenceInterval,
}

impl HealthElement {
    pub fn path(&self) -> &'static str {
        match self {
            HealthElement::HealthIndex => "HealthIndex",
            HealthElement::HealthConfidence => "HealthConfidence",
            HealthElement::AnomalyScore => "AnomalyScore",
            HealthElement::PhysicsResidual => "PhysicsResidual",
            HealthElement::LastUpdate => "LastUpdate",
            HealthElement::DecisionRationale => "ExplainabilityBundle.DecisionRationale",
            HealthElement::DetectedPattern => "ExplainabilityBundle.DetectedPattern",
            HealthElement::FusionMethod => "ExplainabilityBundle.FusionMethod",
            HealthElement::ConfidenceInterval => "ExplainabilityBundle.ConfidenceInterval",
        }
    }
}

impl fmt::Display for HealthElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submodel_ids() {
        let asset = AssetId::new("milling-01");
        assert_eq!(
            health_submodel_id(&asset),
            "urn:adaptivx:submodel:health:milling-01"
        );
        assert_eq!(
            capability_submodel_id(&asset),
            "urn:adaptivx:submodel:capability:milling-01"
        );
        assert_eq!(
            simulation_submodel_id(&asset),
            "urn:adaptivx:submodel:simulationmodels:milling-01"
        );
    }

    #[test]
    fn test_explainability_elements_are_nested() {
        assert_eq!(
            HealthElement::DecisionRationale.path(),
            "ExplainabilityBundle.DecisionRationale"
        );
        assert_eq!(HealthElement::HealthIndex.to_string(), "HealthIndex");
    }
}
