//! Error types returned by specification evaluation.

use thiserror::Error;

/// Error produced while evaluating a specification tree.
///
/// Leaves create these; composite nodes hand them back to the caller
/// untouched. Whenever an evaluation returns `Err`, there is no meaningful
/// boolean result.
#[derive(Error, Debug)]
pub enum SpecError {
    /// A guarded subtree observed a cancelled token
    #[error("Evaluation cancelled")]
    Cancelled,

    /// The candidate is not the shape the leaf expects
    #[error("Candidate mismatch: expected {expected}, found {found}")]
    CandidateMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Domain-specific failure reported by a leaf
    #[error("Predicate failed: {0}")]
    Failed(String),

    /// Any other leaf error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpecError {
    /// Shorthand for [`SpecError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        SpecError::Failed(message.into())
    }

    /// Returns the error code string for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            SpecError::Cancelled => "CANCELLED",
            SpecError::CandidateMismatch { .. } => "CANDIDATE_MISMATCH",
            SpecError::Failed(_) => "PREDICATE_FAILED",
            SpecError::Other(_) => "PREDICATE_ERROR",
        }
    }

    /// True if this error came from a cancellation checkpoint.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SpecError::Cancelled)
    }
}

/// Result type alias using SpecError
pub type SpecResult<T> = Result<T, SpecError>;
