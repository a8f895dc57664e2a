use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use assess_core::model::{
    AnswerLog, AssessmentResult, Position, Question, QuestionCatalog, Section, SectionKey,
};
use assess_core::scoring;
use tracing::{debug, info};

use super::progress::AssessmentProgress;
use crate::error::AssessmentError;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a session. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentStatus {
    InProgress,
    Completed,
}

/// Outcome of a single `record_answer` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAnswer {
    pub section: SectionKey,
    pub position: Position,
    pub score: u32,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory walk through a question catalog.
///
/// Presents questions strictly in catalog order, records one score per
/// answered question and supports one-step back-navigation that undoes the
/// answer of the question being re-presented. Answering the last question
/// scores the log and makes the result available.
pub struct AssessmentSession {
    catalog: Arc<QuestionCatalog>,
    position: Position,
    answers: AnswerLog,
    started_at: DateTime<Utc>,
    result: Option<AssessmentResult>,
    result_id: Option<i64>,
}

impl AssessmentSession {
    /// Start a fresh session at the first question with an empty log.
    ///
    /// `started_at` should come from the services layer clock.
    #[must_use]
    pub fn new(catalog: Arc<QuestionCatalog>, started_at: DateTime<Utc>) -> Self {
        let position = catalog.first_position();
        Self {
            catalog,
            position,
            answers: AnswerLog::new(),
            started_at,
            result: None,
            result_id: None,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerLog {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.result.as_ref().map(AssessmentResult::completed_at)
    }

    #[must_use]
    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }

    /// Id assigned by the result repository once the result was handed off.
    #[must_use]
    pub fn result_id(&self) -> Option<i64> {
        self.result_id
    }

    #[must_use]
    pub fn status(&self) -> AssessmentStatus {
        if self.result.is_some() {
            AssessmentStatus::Completed
        } else {
            AssessmentStatus::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Section and question at the current position.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::AlreadyCompleted` once the session finished,
    /// or `AssessmentError::OutOfRange` if the position is not in the catalog.
    pub fn current_question(&self) -> Result<(&Section, &Question), AssessmentError> {
        if self.is_complete() {
            return Err(AssessmentError::AlreadyCompleted);
        }
        self.catalog
            .get(self.position)
            .ok_or(AssessmentError::OutOfRange {
                position: self.position,
            })
    }

    /// Record the chosen option for the current question and advance.
    ///
    /// Recording and advancing happen in one step; on error nothing changes.
    /// Answering the final question scores the session with
    /// `completed_at = answered_at`.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::AlreadyCompleted` after completion,
    /// `AssessmentError::InvalidOption` for an out-of-range option and
    /// `AssessmentError::Scoring` if the log cannot be scored.
    pub fn record_answer(
        &mut self,
        option_index: usize,
        answered_at: DateTime<Utc>,
    ) -> Result<RecordedAnswer, AssessmentError> {
        let (section, question) = self.current_question()?;
        let score = question
            .score_for(option_index)
            .ok_or(AssessmentError::InvalidOption {
                index: option_index,
                len: question.option_count(),
            })?;
        let key = section.key().clone();
        let answered = self.position;
        let next = self.catalog.next_position(answered);

        self.answers.push(&key, score);
        debug!(section = %key, question = answered.question, score, "answer recorded");

        match next {
            Some(next) => self.position = next,
            None => self.complete(&key, answered_at)?,
        }

        Ok(RecordedAnswer {
            section: key,
            position: answered,
            score,
            is_complete: self.is_complete(),
        })
    }

    fn complete(
        &mut self,
        last_section: &SectionKey,
        completed_at: DateTime<Utc>,
    ) -> Result<(), AssessmentError> {
        match scoring::score(&self.catalog, &self.answers, completed_at) {
            Ok(result) => {
                info!(
                    overall = result.overall_score(),
                    level = %result.overall_level(),
                    "assessment completed"
                );
                self.result = Some(result);
                Ok(())
            }
            Err(err) => {
                self.answers.pop(last_section);
                Err(err.into())
            }
        }
    }

    /// Step back one question, undoing the answer given to it.
    ///
    /// Returns `Ok(false)` without changes at the first question or once the
    /// session is complete.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::OutOfRange` if the log holds no answer for the
    /// question being returned to.
    pub fn go_back(&mut self) -> Result<bool, AssessmentError> {
        if self.is_complete() || self.position.is_start() {
            return Ok(false);
        }
        let Some(previous) = self.catalog.previous_position(self.position) else {
            return Ok(false);
        };
        let key = self
            .catalog
            .section(previous.section)
            .map(|s| s.key().clone())
            .ok_or(AssessmentError::OutOfRange { position: previous })?;

        if self.answers.pop(&key).is_none() {
            return Err(AssessmentError::OutOfRange { position: previous });
        }
        self.position = previous;
        debug!(section = %key, question = previous.question, "stepped back");
        Ok(true)
    }

    /// Share of questions answered, in [0, 1].
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        self.progress().fraction()
    }

    #[must_use]
    pub fn progress(&self) -> AssessmentProgress {
        let total = self.catalog.total_questions();
        let answered = self.answers.len().min(total);
        AssessmentProgress {
            total,
            answered,
            remaining: total - answered,
            is_complete: self.is_complete(),
        }
    }

    /// Consume the session, keeping only the result if it finished.
    #[must_use]
    pub fn into_result(self) -> Option<AssessmentResult> {
        self.result
    }

    pub(crate) fn set_result_id(&mut self, id: i64) {
        self.result_id = Some(id);
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("sections", &self.catalog.section_count())
            .field("position", &self.position)
            .field("answered", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at())
            .field("result_id", &self.result_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use assess_core::model::{CatalogDraft, Level, QuestionDraft, SectionDraft};
    use assess_core::time::fixed_now;

    fn likert(prompt: &str) -> QuestionDraft {
        QuestionDraft {
            prompt: prompt.to_owned(),
            options: vec!["high".into(), "mid".into(), "low".into()],
            scores: vec![3, 2, 1],
        }
    }

    fn build_catalog(shape: &[(&str, u32, usize)]) -> Arc<QuestionCatalog> {
        let sections = shape
            .iter()
            .map(|(key, weight, questions)| SectionDraft {
                key: (*key).to_owned(),
                weight: *weight,
                questions: (0..*questions).map(|i| likert(&format!("{key} {i}"))).collect(),
            })
            .collect();
        Arc::new(CatalogDraft { sections }.validate().unwrap())
    }

    fn two_by_two() -> AssessmentSession {
        AssessmentSession::new(build_catalog(&[("a", 1, 2), ("b", 2, 2)]), fixed_now())
    }

    fn key(s: &str) -> SectionKey {
        SectionKey::new(s).unwrap()
    }

    #[test]
    fn starts_at_first_question_with_empty_log() {
        let session = two_by_two();
        assert_eq!(session.position(), Position::new(0, 0));
        assert!(session.answers().is_empty());
        assert_eq!(session.status(), AssessmentStatus::InProgress);
        assert_eq!(session.progress_fraction(), 0.0);
        let (section, question) = session.current_question().unwrap();
        assert_eq!(section.key().as_str(), "a");
        assert_eq!(question.prompt(), "a 0");
    }

    #[test]
    fn answers_advance_within_and_across_sections() {
        let mut session = two_by_two();

        let first = session.record_answer(0, fixed_now()).unwrap();
        assert_eq!(first.position, Position::new(0, 0));
        assert_eq!(first.score, 3);
        assert_eq!(session.position(), Position::new(0, 1));

        session.record_answer(1, fixed_now()).unwrap();
        assert_eq!(session.position(), Position::new(1, 0));
        assert_eq!(session.answers().answers(&key("a")), &[3, 2]);
        assert!(session.answers().answers(&key("b")).is_empty());
    }

    #[test]
    fn weighted_scenario_completes_with_expected_scores() {
        let mut session = two_by_two();
        for option in [0, 0, 2, 2] {
            session.record_answer(option, fixed_now()).unwrap();
        }

        assert_eq!(session.status(), AssessmentStatus::Completed);
        let result = session.result().unwrap();
        let a = result.section(&key("a")).unwrap();
        let b = result.section(&key("b")).unwrap();
        assert_eq!(a.score(), 100.0);
        assert_eq!(a.level(), Level::Advanced);
        assert_eq!(b.level(), Level::Beginner);
        assert_eq!(format!("{:.2}", b.score()), "33.33");
        assert_eq!(format!("{:.2}", result.overall_score()), "55.56");
        assert_eq!(session.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn single_question_catalog_completes_immediately() {
        let mut session =
            AssessmentSession::new(build_catalog(&[("only", 1, 1)]), fixed_now());
        let recorded = session.record_answer(0, fixed_now()).unwrap();

        assert!(recorded.is_complete);
        let result = session.into_result().unwrap();
        assert_eq!(result.section_results()[0].score(), 100.0);
        assert_eq!(result.section_results()[0].level(), Level::Advanced);
    }

    #[test]
    fn invalid_option_is_rejected_without_changes() {
        let mut session = two_by_two();
        session.record_answer(0, fixed_now()).unwrap();
        let before = session.answers().clone();

        let err = session.record_answer(3, fixed_now()).unwrap_err();
        assert!(matches!(err, AssessmentError::InvalidOption { index: 3, len: 3 }));
        assert_eq!(session.answers(), &before);
        assert_eq!(session.position(), Position::new(0, 1));
    }

    #[test]
    fn answering_after_completion_fails_and_mutates_nothing() {
        let mut session = two_by_two();
        for _ in 0..4 {
            session.record_answer(1, fixed_now()).unwrap();
        }
        let answers = session.answers().clone();
        let position = session.position();

        for option in [0, 1, 99] {
            let err = session.record_answer(option, fixed_now()).unwrap_err();
            assert!(matches!(err, AssessmentError::AlreadyCompleted));
        }
        assert_eq!(session.answers(), &answers);
        assert_eq!(session.position(), position);
        assert!(matches!(
            session.current_question(),
            Err(AssessmentError::AlreadyCompleted)
        ));
    }

    #[test]
    fn go_back_at_start_is_a_no_op() {
        let mut session = two_by_two();
        assert!(!session.go_back().unwrap());
        assert_eq!(session.position(), Position::new(0, 0));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn go_back_within_section_undoes_last_answer() {
        let mut session = two_by_two();
        session.record_answer(2, fixed_now()).unwrap();
        assert!(session.go_back().unwrap());
        assert_eq!(session.position(), Position::new(0, 0));
        assert!(session.answers().answers(&key("a")).is_empty());
    }

    #[test]
    fn go_back_across_sections_undoes_previous_sections_last_answer() {
        let mut session = two_by_two();
        session.record_answer(0, fixed_now()).unwrap();
        session.record_answer(1, fixed_now()).unwrap();
        assert_eq!(session.position(), Position::new(1, 0));

        assert!(session.go_back().unwrap());
        assert_eq!(session.position(), Position::new(0, 1));
        assert_eq!(session.answers().answers(&key("a")), &[3]);
    }

    #[test]
    fn go_back_then_same_answer_restores_log() {
        let mut session = two_by_two();
        for option in [0, 1, 2] {
            session.record_answer(option, fixed_now()).unwrap();
        }
        let before = session.answers().clone();
        let position = session.position();

        session.go_back().unwrap();
        session.record_answer(2, fixed_now()).unwrap();
        assert_eq!(session.answers(), &before);
        assert_eq!(session.position(), position);

        // Crossing a section boundary behaves the same way.
        session.go_back().unwrap();
        session.go_back().unwrap();
        session.record_answer(1, fixed_now()).unwrap();
        session.record_answer(2, fixed_now()).unwrap();
        assert_eq!(session.answers(), &before);
    }

    #[test]
    fn go_back_after_completion_does_nothing() {
        let mut session =
            AssessmentSession::new(build_catalog(&[("only", 1, 1)]), fixed_now());
        session.record_answer(0, fixed_now()).unwrap();
        assert!(!session.go_back().unwrap());
        assert!(session.is_complete());
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn progress_is_monotonic_and_reaches_one() {
        let catalog = Arc::new(QuestionCatalog::digital_readiness().unwrap());
        let mut session = AssessmentSession::new(catalog, fixed_now());
        let mut last = session.progress_fraction();

        while !session.is_complete() {
            session.record_answer(1, fixed_now()).unwrap();
            let now = session.progress_fraction();
            assert!(now > last);
            assert!((0.0..=1.0).contains(&now));
            last = now;
        }
        assert_eq!(session.progress_fraction(), 1.0);
        assert_eq!(session.progress().remaining, 0);
    }

    #[test]
    fn progress_decreases_only_through_go_back() {
        let mut session = two_by_two();
        session.record_answer(0, fixed_now()).unwrap();
        session.record_answer(0, fixed_now()).unwrap();
        assert_eq!(session.progress_fraction(), 0.5);
        session.go_back().unwrap();
        assert_eq!(session.progress_fraction(), 0.25);
    }
}
