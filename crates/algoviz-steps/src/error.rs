//! Error types for algoviz-steps.

use thiserror::Error;

use crate::selection::AlgorithmKind;

/// Result type for selection and validation.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Reasons a run cannot be prepared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Binary search was selected on a sequence that is not ascending.
    #[error("{algorithm} requires the array to be sorted in ascending order")]
    NotSorted { algorithm: AlgorithmKind },

    /// A search was selected without a usable target.
    #[error("{algorithm} needs a numeric search target")]
    MissingTarget { algorithm: AlgorithmKind },

    /// The algorithm name was not recognised.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),
}
