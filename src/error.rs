//! Error types for nlpmodels.

use thiserror::Error;

/// Error type for model construction and evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// A vector argument does not match the model's declared dimensions.
    #[error("dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Invalid construction or update parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The model has no proximable term or constraint set for this operation.
    #[error("{op} is not implemented for {model}")]
    NotImplemented { op: &'static str, model: String },

    /// Status name outside the fixed enumeration.
    #[error("unknown solver status: {0}")]
    UnknownStatus(String),

    /// Failure reported by an external model backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for nlpmodels operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Fail with [`ModelError::DimensionMismatch`] unless `got == expected`.
#[inline]
pub(crate) fn check_dim(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch {
            what,
            expected,
            got,
        })
    }
}
