//! Error types for the monitoring engine

use thiserror::Error;

/// Errors produced by the monitoring engine
#[derive(Error, Debug)]
pub enum ModelShiftError {
    /// A window snapshot failed validation (empty, or a feature collapsed
    /// to zero usable points after non-finite filtering)
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Baseline and live windows share no features
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A required window has no usable samples
    #[error("Empty window: {0}")]
    EmptyWindow(String),

    /// A prediction-probability sequence is empty
    #[error("Empty prediction set: {0}")]
    EmptyPredictionSet(String),

    /// No features were left to evaluate after alignment
    #[error("Empty feature set: {0}")]
    EmptyFeatureSet(String),

    /// Another monitoring run is already in flight
    #[error("Concurrent run rejected: a run is already in progress")]
    ConcurrentRunRejected,

    /// Invalid monitoring configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// IO error (archive persistence)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (archive persistence, record serialization)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, ModelShiftError>;
