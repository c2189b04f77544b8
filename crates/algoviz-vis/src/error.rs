//! Error types for algoviz-vis.

use thiserror::Error;

use crate::playback::Phase;

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while controlling playback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The run could not be prepared (missing target, unsorted input, ...).
    #[error(transparent)]
    Selection(#[from] algoviz_steps::SelectionError),

    /// The controller is in the wrong phase for the requested control.
    #[error("invalid playback phase: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: Phase,
    },
}

impl Error {
    pub(crate) fn invalid_state(expected: &'static str, actual: Phase) -> Self {
        Error::InvalidState { expected, actual }
    }
}
