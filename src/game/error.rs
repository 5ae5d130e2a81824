//! Game engine error types.

use derive_more::{Display, Error, From};

use crate::store::StoreError;

/// Errors surfaced by engine operations.
///
/// Missing references (unknown session, no active group) are deliberately
/// not errors: those operations log a warning and report a skipped outcome.
#[derive(Debug, Clone, Display, Error, From)]
pub enum GameError {
    /// Input rejected before any state change.
    #[display("Validation error: {_0}")]
    #[from(ignore)]
    Validation(#[error(not(source))] String),

    /// Underlying store failure.
    #[display("{_0}")]
    Store(StoreError),
}

impl GameError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
