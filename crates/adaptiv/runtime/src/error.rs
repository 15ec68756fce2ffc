//! Error types for the runtime pipeline

use adaptiv_monitor::MonitorError;
use adaptiv_policy::PolicyError;
use adaptiv_types::CapabilityValueError;
use thiserror::Error;

/// Errors raised while building or driving the pipeline
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Service configuration could not be assembled
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Monitor component rejected its configuration
    #[error(transparent)]
    Monitor(#[from] MonitorError),

    /// Policy rules could not be loaded
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// A capability write was rejected
    #[error(transparent)]
    Capability(#[from] CapabilityValueError),

    /// Tracing subscriber could not be installed
    #[error("Failed to initialise tracing: {0}")]
    Tracing(String),
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
