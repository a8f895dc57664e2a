use async_trait::async_trait;
use assess_core::Language;
use assess_core::model::AssessmentResult;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored assessment result with its row id.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentResultRow {
    pub id: i64,
    pub result: AssessmentResult,
}

impl AssessmentResultRow {
    #[must_use]
    pub fn new(id: i64, result: AssessmentResult) -> Self {
        Self { id, result }
    }
}

/// Receiver of finished assessments.
#[async_trait]
pub trait AssessmentResultRepository: Send + Sync {
    /// Append a finished result and return its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, result: &AssessmentResult) -> Result<i64, StorageError>;

    /// Fetch a result by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_result(&self, id: i64) -> Result<AssessmentResult, StorageError>;

    /// Most recent results first, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if rows cannot be read or decoded.
    async fn list_results(&self, limit: u32) -> Result<Vec<AssessmentResultRow>, StorageError>;

    /// The most recently completed result, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if rows cannot be read or decoded.
    async fn latest_result(&self) -> Result<Option<AssessmentResultRow>, StorageError> {
        Ok(self.list_results(1).await?.into_iter().next())
    }
}

/// Persisted UI language choice.
#[async_trait]
pub trait LanguagePreferenceRepository: Send + Sync {
    /// Load the saved language, if one was ever stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn get_language(&self) -> Result<Option<Language>, StorageError>;

    /// Save the language choice, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn save_language(&self, language: Language) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    results: Arc<Mutex<Vec<AssessmentResult>>>,
    language: Arc<Mutex<Option<Language>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn index_for(id: i64) -> Option<usize> {
    usize::try_from(id).ok()?.checked_sub(1)
}

#[async_trait]
impl AssessmentResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &AssessmentResult) -> Result<i64, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(result.clone());
        i64::try_from(guard.len()).map_err(|_| StorageError::Serialization("id overflow".into()))
    }

    async fn get_result(&self, id: i64) -> Result<AssessmentResult, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        index_for(id)
            .and_then(|idx| guard.get(idx))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<AssessmentResultRow>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = Vec::with_capacity(guard.len());
        for (idx, result) in guard.iter().enumerate() {
            let id = i64::try_from(idx + 1)
                .map_err(|_| StorageError::Serialization("id overflow".into()))?;
            rows.push(AssessmentResultRow::new(id, result.clone()));
        }
        rows.sort_by(|a, b| {
            b.result
                .completed_at()
                .cmp(&a.result.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

#[async_trait]
impl LanguagePreferenceRepository for InMemoryRepository {
    async fn get_language(&self) -> Result<Option<Language>, StorageError> {
        let guard = self
            .language
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_language(&self, language: Language) -> Result<(), StorageError> {
        let mut guard = self
            .language
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(language);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub results: Arc<dyn AssessmentResultRepository>,
    pub language: Arc<dyn LanguagePreferenceRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let results: Arc<dyn AssessmentResultRepository> = Arc::new(repo.clone());
        let language: Arc<dyn LanguagePreferenceRepository> = Arc::new(repo);
        Self { results, language }
    }
}
