//! Error types for the snapshot layer

use thiserror::Error;

/// Errors surfaced by a [`RecordSource`](crate::source::RecordSource)
#[derive(Debug, Error)]
pub enum SourceError {
    /// The orchestrator API rejected or failed the request
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// The source could not be reached or produced no answer
    #[error("Record source unavailable: {0}")]
    Unavailable(String),
}

/// Errors loading [`SnapshotConfig`](crate::config::SnapshotConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid label selector '{0}': expected key=value")]
    InvalidSelector(String),
}

/// Errors parsing a resource quantity string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,

    #[error("invalid numeric part '{0}'")]
    InvalidNumber(String),

    #[error("unknown suffix '{0}'")]
    UnknownSuffix(String),

    #[error("quantity '{0}' out of range")]
    Overflow(String),
}
