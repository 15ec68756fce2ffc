//! Policy rules, actions, and the YAML rule document

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::condition::Condition;
use crate::error::{PolicyError, Result};

/// Write of one capability element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyAction {
    /// Capability element path
    pub path: String,

    /// New value, always textual
    pub value: String,
}

impl PolicyAction {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// A condition, its priority, and the actions it triggers
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRule {
    /// Condition exactly as written
    condition_text: String,

    /// Parsed condition; `None` when the text did not parse
    condition: Option<Condition>,

    /// Higher priorities are evaluated first
    priority: i32,

    /// Writes applied when the rule matches, in order
    actions: Vec<PolicyAction>,
}

impl PolicyRule {
    /// Build a rule. An unparseable condition is logged and the rule will
    /// never match.
    pub fn new(condition: impl Into<String>, priority: i32, actions: Vec<PolicyAction>) -> Self {
        let condition_text = condition.into();
        let condition = match condition_text.parse::<Condition>() {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(condition = %condition_text, error = %e, "Rule condition will never match");
                None
            }
        };

        Self {
            condition_text,
            condition,
            priority,
            actions,
        }
    }

    pub fn condition_text(&self) -> &str {
        &self.condition_text
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn actions(&self) -> &[PolicyAction] {
        &self.actions
    }

    pub fn matches(&self, health_index: i64) -> bool {
        self.condition
            .map(|c| c.matches(health_index))
            .unwrap_or(false)
    }

    pub fn view(&self) -> RuleView {
        RuleView {
            condition: self.condition_text.clone(),
            priority: self.priority,
            actions: self.actions.clone(),
        }
    }
}

/// Serializable snapshot of a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleView {
    pub condition: String,
    pub priority: i32,
    pub actions: Vec<PolicyAction>,
}

/// Top-level YAML rule document
///
/// ```yaml
/// rules:
///   - when: "health < 90"
///     priority: 5
///     actions:
///       - path: "Capabilities/ProcessCapability:Milling/SurfaceFinishGrade"
///         value: "B"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RuleDocument {
    pub rules: Vec<RuleSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RuleSpec {
    #[serde(default)]
    pub when: String,

    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ActionSpec {
    pub path: String,
    pub value: serde_yaml::Value,
}

impl RuleDocument {
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| PolicyError::Yaml {
            reason: e.to_string(),
        })
    }

    pub fn into_rules(self) -> Result<Vec<PolicyRule>> {
        self.rules
            .into_iter()
            .map(|spec| {
                let actions = spec
                    .actions
                    .into_iter()
                    .map(|a| {
                        let value = scalar_to_string(&a.path, &a.value)?;
                        Ok(PolicyAction {
                            path: a.path,
                            value,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(PolicyRule::new(spec.when, spec.priority, actions))
            })
            .collect()
    }
}

fn scalar_to_string(path: &str, value: &serde_yaml::Value) -> Result<String> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Tagged(tagged) => scalar_to_string(path, &tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err(PolicyError::InvalidActionValue {
            path: path.to_string(),
            reason: "expected a scalar".to_string(),
        }),
    }
}
