//! Rule conditions
//!
//! Conditions compare the health index against an integer threshold:
//! `health < 90`, `HEALTH>=80`, `health == 100`. Text is parsed once when a
//! rule is built so evaluation never re-parses strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

const SUBJECT: &str = "health";

/// Comparison operator of a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
}

impl ComparisonOp {
    /// Two-character operators come first so `<=` is never read as `<`.
    const PARSE_ORDER: [ComparisonOp; 5] = [
        ComparisonOp::Le,
        ComparisonOp::Ge,
        ComparisonOp::Eq,
        ComparisonOp::Lt,
        ComparisonOp::Gt,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Eq => "==",
        }
    }

    pub fn apply(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            ComparisonOp::Lt => lhs < rhs,
            ComparisonOp::Le => lhs <= rhs,
            ComparisonOp::Gt => lhs > rhs,
            ComparisonOp::Ge => lhs >= rhs,
            ComparisonOp::Eq => lhs == rhs,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Parsed `health <op> <threshold>` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub op: ComparisonOp,
    pub threshold: i64,
}

impl Condition {
    pub fn new(op: ComparisonOp, threshold: i64) -> Self {
        Self { op, threshold }
    }

    /// Whether the health index satisfies this condition
    pub fn matches(&self, health_index: i64) -> bool {
        self.op.apply(health_index, self.threshold)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", SUBJECT, self.op, self.threshold)
    }
}

impl FromStr for Condition {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| PolicyError::InvalidCondition {
            condition: s.to_string(),
            reason: reason.to_string(),
        };

        let normalized = s.trim().to_lowercase();
        let rest = normalized
            .strip_prefix(SUBJECT)
            .ok_or_else(|| invalid("expected 'health' on the left-hand side"))?
            .trim_start();

        let (op, operand) = ComparisonOp::PARSE_ORDER
            .iter()
            .find_map(|op| rest.strip_prefix(op.symbol()).map(|operand| (*op, operand)))
            .ok_or_else(|| invalid("expected one of <, <=, >, >=, =="))?;

        let threshold = operand
            .trim()
            .parse::<i64>()
            .map_err(|e| invalid(&format!("threshold is not an integer: {e}")))?;

        Ok(Self { op, threshold })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_all_operators() {
        let cases = [
            ("health < 90", ComparisonOp::Lt, 90),
            ("health <= 80", ComparisonOp::Le, 80),
            ("health > 10", ComparisonOp::Gt, 10),
            ("health >= 90", ComparisonOp::Ge, 90),
            ("health == 100", ComparisonOp::Eq, 100),
        ];
        for (text, op, threshold) in cases {
            assert_eq!(text.parse::<Condition>().unwrap(), Condition::new(op, threshold));
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_spacing() {
        let c: Condition = "  HEALTH<=80 ".parse().unwrap();
        assert_eq!(c, Condition::new(ComparisonOp::Le, 80));

        let c: Condition = "Health >=   -5".parse().unwrap();
        assert_eq!(c, Condition::new(ComparisonOp::Ge, -5));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in ["", "health", "health ~ 90", "health < ninety", "temp < 90", "health = 90"] {
            assert!(
                matches!(text.parse::<Condition>(), Err(PolicyError::InvalidCondition { .. })),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        let c = Condition::new(ComparisonOp::Ge, 90);
        assert_eq!(c.to_string(), "health >= 90");
        assert_eq!(c.to_string().parse::<Condition>().unwrap(), c);
    }

    #[test]
    fn test_boundaries() {
        let lt: Condition = "health < 90".parse().unwrap();
        assert!(lt.matches(89));
        assert!(!lt.matches(90));

        let eq: Condition = "health == 100".parse().unwrap();
        assert!(eq.matches(100));
        assert!(!eq.matches(99));
    }

    proptest! {
        #[test]
        fn matches_agrees_with_integer_comparison(health in 0i64..=100, threshold in -10i64..=110) {
            let lt: Condition = format!("health < {threshold}").parse().unwrap();
            let ge: Condition = format!("health >= {threshold}").parse().unwrap();
            prop_assert_eq!(lt.matches(health), health < threshold);
            prop_assert_eq!(ge.matches(health), health >= threshold);
            prop_assert_ne!(lt.matches(health), ge.matches(health));
        }
    }
}
