//! Built-in rule table used when no rule file is available

use adaptiv_types::CapabilityAttribute;

use crate::rule::{PolicyAction, PolicyRule};

fn action(attribute: CapabilityAttribute, value: &str) -> PolicyAction {
    PolicyAction::new(attribute.path(), value)
}

/// Three tiers: severe degradation, moderate degradation, healthy.
pub fn default_rules() -> Vec<PolicyRule> {
    use CapabilityAttribute::*;

    vec![
        PolicyRule::new(
            "health < 80",
            10,
            vec![
                action(AssuranceState, "notAvailable"),
                action(SurfaceFinishGrade, "C"),
                action(ToleranceClass, "±0.05mm"),
                action(EnergyCostPerPart, "1.25"),
            ],
        ),
        PolicyRule::new(
            "health < 90",
            5,
            vec![
                action(AssuranceState, "offered"),
                action(SurfaceFinishGrade, "B"),
                action(EnergyCostPerPart, "1.0"),
            ],
        ),
        PolicyRule::new(
            "health >= 90",
            1,
            vec![
                action(AssuranceState, "assured"),
                action(SurfaceFinishGrade, "A"),
                action(ToleranceClass, "±0.02mm"),
                action(EnergyCostPerPart, "0.85"),
            ],
        ),
    ]
}
