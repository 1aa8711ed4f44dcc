//! Error types for pixel engine operations.

use thiserror::Error;

/// Error type for pixel engine operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The operation observed a cancellation request and stopped.
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_yaml::Error),
}

/// Result type for pixel engine operations.
pub type OpsResult<T> = Result<T, OpsError>;
