//! Policy engine
//!
//! Holds the rule table sorted by descending priority and maps a health
//! index to the actions of the first matching rule.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::defaults::default_rules;
use crate::error::{PolicyError, Result};
use crate::rule::{PolicyAction, PolicyRule, RuleDocument, RuleView};

/// Evaluates health values against capability rules
#[derive(Debug)]
pub struct PolicyEngine {
    /// Rules, highest priority first
    rules: RwLock<Vec<PolicyRule>>,

    /// File the rules were loaded from, if any
    source: Option<PathBuf>,
}

impl PolicyEngine {
    /// Create an engine with the built-in rule table
    pub fn new() -> Self {
        info!("Loaded default policy rules");
        Self::from_rules(default_rules())
    }

    /// Create an engine from explicit rules; ties keep their given order
    pub fn from_rules(rules: Vec<PolicyRule>) -> Self {
        Self {
            rules: RwLock::new(sorted(rules)),
            source: None,
        }
    }

    /// Parse a YAML rule document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let rules = RuleDocument::parse(yaml)?.into_rules()?;
        Ok(Self::from_rules(rules))
    }

    /// Load rules from a YAML file, failing on any error
    pub fn try_load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rules = read_rules(path)?;
        info!(path = %path.display(), count = rules.len(), "Loaded policy rules");

        Ok(Self {
            rules: RwLock::new(sorted(rules)),
            source: Some(path.to_path_buf()),
        })
    }

    /// Load rules from a YAML file, falling back to the built-in table when
    /// the file is missing or malformed
    pub fn load_from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Policy file not found, using defaults");
            return Self::with_source(default_rules(), path);
        }

        match read_rules(path) {
            Ok(rules) => {
                info!(path = %path.display(), count = rules.len(), "Loaded policy rules");
                Self::with_source(rules, path)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load policy file, using defaults");
                Self::with_source(default_rules(), path)
            }
        }
    }

    fn with_source(rules: Vec<PolicyRule>, path: &Path) -> Self {
        Self {
            rules: RwLock::new(sorted(rules)),
            source: Some(path.to_path_buf()),
        }
    }

    /// Re-read the source file. On failure the current rules stay in place.
    pub fn reload(&self) -> Result<usize> {
        let path = self.source.as_deref().ok_or(PolicyError::NoSource)?;
        let rules = sorted(read_rules(path)?);
        let count = rules.len();

        *self.rules.write() = rules;
        info!(path = %path.display(), count, "Reloaded policy rules");
        Ok(count)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Actions of the highest-priority rule matching the health index
    pub fn evaluate(&self, health_index: u8) -> Vec<PolicyAction> {
        let rules = self.rules.read();
        match rules.iter().find(|r| r.matches(health_index as i64)) {
            Some(rule) => {
                debug!(health_index, condition = rule.condition_text(), "Rule matched");
                rule.actions().to_vec()
            }
            None => {
                debug!(health_index, "No rule matched");
                Vec::new()
            }
        }
    }

    /// The rule `evaluate` would apply, if any
    pub fn matching_rule(&self, health_index: u8) -> Option<RuleView> {
        self.rules
            .read()
            .iter()
            .find(|r| r.matches(health_index as i64))
            .map(PolicyRule::view)
    }

    /// All rules in evaluation order
    pub fn get_rules(&self) -> Vec<RuleView> {
        self.rules.read().iter().map(PolicyRule::view).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl Default for PolicyEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn read_rules(path: &Path) -> Result<Vec<PolicyRule>> {
    let raw = std::fs::read_to_string(path).map_err(|e| PolicyError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    RuleDocument::parse(&raw)?.into_rules()
}

fn sorted(mut rules: Vec<PolicyRule>) -> Vec<PolicyRule> {
    // Stable, so equal priorities keep document order
    rules.sort_by(|a, b| b.priority().cmp(&a.priority()));
    rules
}
