//! Audit errors

use thiserror::Error;

/// Errors raised while building audit entries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditError {
    /// A required builder field was not set
    #[error("Audit entry is missing required field: {0}")]
    MissingField(&'static str),
}

/// Result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;
