//! Shared error types for the services crate.

use thiserror::Error;

use assess_core::model::Position;
use assess_core::scoring::ScoringError;
use storage::repository::StorageError;

/// Errors emitted by assessment sessions and the assessment loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("option {index} is out of range for a question with {len} options")]
    InvalidOption { index: usize, len: usize },
    #[error("assessment already completed")]
    AlreadyCompleted,
    #[error("assessment is not completed yet")]
    NotCompleted,
    #[error("position {position:?} does not exist in the catalog")]
    OutOfRange { position: Position },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LanguageService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LanguageServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
