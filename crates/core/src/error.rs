use thiserror::Error;

use crate::i18n::LanguageError;
use crate::model::{CatalogError, ResultError};
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error(transparent)]
    Language(#[from] LanguageError),
}
