//! Error types.

use thiserror::Error;

/// Errors raised while building instances or configuring solvers.
///
/// Solving itself never fails: infeasible instances yield a value of 0
/// with an empty configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KopError {
    /// Instance data is malformed (mismatched lengths, bad literals,
    /// unparsable numbers).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// Solver parameters are out of range or unknown.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result alias for fallible crate operations.
pub type Result<T> = std::result::Result<T, KopError>;
