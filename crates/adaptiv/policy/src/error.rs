//! Error types for policy loading and parsing

use std::path::PathBuf;

use thiserror::Error;

/// Policy errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    /// Rule file could not be read
    #[error("Failed to read policy file {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    /// Rule document is not valid YAML or has the wrong shape
    #[error("Invalid policy document: {reason}")]
    Yaml { reason: String },

    /// Condition does not follow `health <op> <integer>`
    #[error("Invalid condition '{condition}': {reason}")]
    InvalidCondition { condition: String, reason: String },

    /// Action value is not a scalar
    #[error("Invalid value for action on {path}: {reason}")]
    InvalidActionValue { path: String, reason: String },

    /// Reload requested on an engine with no backing file
    #[error("Policy engine has no source file to reload")]
    NoSource,
}

/// Result type for policy operations
pub type Result<T> = std::result::Result<T, PolicyError>;
