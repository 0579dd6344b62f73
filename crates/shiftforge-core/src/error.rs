//! Error types for ShiftForge

use thiserror::Error;

/// Main error type for ShiftForge operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShiftForgeError {
    /// Malformed or inconsistent roster/requirement data; solving never starts
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Hard constraints admit no assignment at all (detected before branching)
    #[error("Infeasible: {0}")]
    Infeasible(String),

    /// A derived-variable invariant broke; always a programming defect
    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShiftForgeError {
    /// Shorthand for an [`ShiftForgeError::InvalidInput`] error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias for ShiftForge operations
pub type Result<T> = std::result::Result<T, ShiftForgeError>;
