//! Explainability for health assessments.
//!
//! Turns the fused signals into the short human-readable bundle stored next
//! to the health index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fusion::{HealthFusion, HealthResult};

/// Categorical label derived from the anomaly score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedPattern {
    Normal,
    MinorAnomaly,
    MajorAnomaly,
}

impl DetectedPattern {
    pub fn from_anomaly(anomaly_score: f64) -> Self {
        if anomaly_score < 0.2 {
            DetectedPattern::Normal
        } else if anomaly_score < 0.5 {
            DetectedPattern::MinorAnomaly
        } else {
            DetectedPattern::MajorAnomaly
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedPattern::Normal => "normal",
            DetectedPattern::MinorAnomaly => "minor_anomaly",
            DetectedPattern::MajorAnomaly => "major_anomaly",
        }
    }
}

impl fmt::Display for DetectedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explanation attached to an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub decision_rationale: String,
    pub detected_pattern: DetectedPattern,
    pub fusion_method: String,
    pub confidence_interval: String,
}

impl Explanation {
    /// Build the explanation for a fused result.
    pub fn new(
        fusion: &HealthFusion,
        anomaly_score: f64,
        physics_residual: f64,
        result: &HealthResult,
    ) -> Self {
        Self {
            decision_rationale: decision_rationale(anomaly_score, physics_residual, result),
            detected_pattern: DetectedPattern::from_anomaly(anomaly_score),
            fusion_method: fusion.fusion_method(),
            confidence_interval: confidence_interval(result.health_confidence),
        }
    }
}

/// Three-sentence rationale covering the statistical signal, the physics
/// signal, and the resulting asset condition.
pub fn decision_rationale(
    anomaly_score: f64,
    physics_residual: f64,
    result: &HealthResult,
) -> String {
    let ml = if anomaly_score < 0.2 {
        "ML model detected normal vibration patterns"
    } else if anomaly_score < 0.5 {
        "ML model detected minor anomalies in vibration"
    } else {
        "ML model detected significant anomalies in vibration"
    };

    let physics = if physics_residual < 0.2 {
        "Physics model confirms expected behavior"
    } else if physics_residual < 0.5 {
        "Physics model shows moderate deviation from expected"
    } else {
        "Physics model shows significant deviation from expected (possible wear)"
    };

    let condition = match result.health_index {
        90.. => "Asset is in healthy condition",
        80..=89 => "Asset shows early signs of degradation",
        _ => "Asset requires attention - capability may be compromised",
    };

    format!("{ml}. {physics}. {condition}.")
}

/// Symmetric margin string derived from the confidence, e.g. `±12.0%`.
pub fn confidence_interval(confidence: f64) -> String {
    let margin = ((1.0 - confidence) * 100.0).clamp(0.0, 100.0);
    format!("±{margin:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(health_index: u8) -> HealthResult {
        HealthResult {
            health_index,
            health_confidence: health_index as f64 / 100.0,
            anomaly_score: 0.0,
            physics_residual: 0.0,
        }
    }

    #[test]
    fn test_detected_pattern_cut_points() {
        assert_eq!(DetectedPattern::from_anomaly(0.0), DetectedPattern::Normal);
        assert_eq!(DetectedPattern::from_anomaly(0.19), DetectedPattern::Normal);
        assert_eq!(DetectedPattern::from_anomaly(0.2), DetectedPattern::MinorAnomaly);
        assert_eq!(DetectedPattern::from_anomaly(0.5), DetectedPattern::MajorAnomaly);
        assert_eq!(DetectedPattern::MinorAnomaly.to_string(), "minor_anomaly");
    }

    #[test]
    fn test_healthy_rationale() {
        assert_eq!(
            decision_rationale(0.05, 0.1, &result(96)),
            "ML model detected normal vibration patterns. \
             Physics model confirms expected behavior. \
             Asset is in healthy condition."
        );
    }

    #[test]
    fn test_degraded_rationale() {
        assert_eq!(
            decision_rationale(0.3, 0.3, &result(82)),
            "ML model detected minor anomalies in vibration. \
             Physics model shows moderate deviation from expected. \
             Asset shows early signs of degradation."
        );
        assert_eq!(
            decision_rationale(0.9, 0.7, &result(20)),
            "ML model detected significant anomalies in vibration. \
             Physics model shows significant deviation from expected (possible wear). \
             Asset requires attention - capability may be compromised."
        );
    }

    #[test]
    fn test_confidence_interval() {
        assert_eq!(confidence_interval(1.0), "±0.0%");
        assert_eq!(confidence_interval(0.875), "±12.5%");
        assert_eq!(confidence_interval(0.0), "±100.0%");
        assert_eq!(confidence_interval(1.5), "±0.0%");
    }

    #[test]
    fn test_explanation_bundle() {
        let fusion = HealthFusion::default();
        let fused = fusion.compute(0.6, 0.1);
        let explanation = Explanation::new(&fusion, 0.6, 0.1, &fused);

        assert_eq!(explanation.detected_pattern, DetectedPattern::MajorAnomaly);
        assert_eq!(explanation.fusion_method, "weighted_v1(ml=0.6, physics=0.4)");
        assert!(explanation.decision_rationale.ends_with("compromised."));
    }
}
