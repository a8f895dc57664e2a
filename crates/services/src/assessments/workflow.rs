use std::sync::Arc;

use assess_core::model::QuestionCatalog;
use storage::repository::{AssessmentResultRepository, AssessmentResultRow};
use tracing::{info, warn};

use super::state::{AssessmentSession, RecordedAnswer};
use crate::Clock;
use crate::error::AssessmentError;

/// Result of answering a single question through the loop service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentAnswerResult {
    pub recorded: RecordedAnswer,
    pub is_complete: bool,
    pub result_id: Option<i64>,
}

/// Orchestrates session start, answering, and the one-time result hand-off.
#[derive(Clone)]
pub struct AssessmentLoopService {
    clock: Clock,
    catalog: Arc<QuestionCatalog>,
    results: Arc<dyn AssessmentResultRepository>,
}

impl AssessmentLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<QuestionCatalog>,
        results: Arc<dyn AssessmentResultRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            results,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Start a fresh session over the configured catalog.
    #[must_use]
    pub fn start_session(&self) -> AssessmentSession {
        AssessmentSession::new(Arc::clone(&self.catalog), self.clock.now())
    }

    /// Answer the current question; on completion hand the result to the repository.
    ///
    /// If the hand-off fails the answer stays recorded and the session stays
    /// complete; call [`Self::finalize_result`] to retry.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError` for contract violations or persistence failures.
    pub async fn answer_current(
        &self,
        session: &mut AssessmentSession,
        option_index: usize,
    ) -> Result<AssessmentAnswerResult, AssessmentError> {
        let recorded = session.record_answer(option_index, self.clock.now())?;

        if session.is_complete() && session.result_id().is_none() {
            self.hand_off(session).await?;
        }

        Ok(AssessmentAnswerResult {
            recorded,
            is_complete: session.is_complete(),
            result_id: session.result_id(),
        })
    }

    /// Retry the result hand-off after a completed session.
    ///
    /// Returns the existing id if the result was already stored.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::NotCompleted` if the session is still in progress.
    /// Returns `AssessmentError::Storage` if persistence fails.
    pub async fn finalize_result(
        &self,
        session: &mut AssessmentSession,
    ) -> Result<i64, AssessmentError> {
        if let Some(id) = session.result_id() {
            return Ok(id);
        }
        if !session.is_complete() {
            return Err(AssessmentError::NotCompleted);
        }
        self.hand_off(session).await
    }

    /// The most recently stored result, if any.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Storage` if the repository cannot be read.
    pub async fn latest_result(&self) -> Result<Option<AssessmentResultRow>, AssessmentError> {
        Ok(self.results.latest_result().await?)
    }

    async fn hand_off(&self, session: &mut AssessmentSession) -> Result<i64, AssessmentError> {
        let result = session.result().ok_or(AssessmentError::NotCompleted)?;
        let stored = self.results.append_result(result).await;
        match stored {
            Ok(id) => {
                info!(result_id = id, "assessment result stored");
                session.set_result_id(id);
                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, "failed to store assessment result");
                Err(err.into())
            }
        }
    }
}
