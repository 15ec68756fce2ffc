//! # Adaptiv Policy
//!
//! Maps a fused health index to capability changes.
//!
//! ## Overview
//!
//! Rules pair a condition on the health index with an ordered list of
//! capability writes. Rules are evaluated highest priority first and the
//! first match wins:
//!
//! - **health < 80** (priority 10): capability withdrawn, coarse tolerances
//! - **health < 90** (priority 5): capability offered with relaxed finish
//! - **health >= 90** (priority 1): capability assured at full quality
//!
//! Deployments override the table with a YAML rule file.
//!
//! ## Example
//!
//! ```rust
//! use adaptiv_policy::PolicyEngine;
//!
//! let engine = PolicyEngine::new();
//! let actions = engine.evaluate(85);
//! assert!(actions.iter().any(|a| a.value == "offered"));
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod condition;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod rule;

pub use condition::{ComparisonOp, Condition};
pub use defaults::default_rules;
pub use engine::PolicyEngine;
pub use error::{PolicyError, Result};
pub use rule::{PolicyAction, PolicyRule, RuleView};
