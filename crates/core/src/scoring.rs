//! Weighted readiness scoring.
//!
//! Each section is scored as `100 * sum(answers) / (questions * max score)`,
//! classified into a `Level`, and combined into an overall score weighted by
//! the section weights.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    AnswerLog, AssessmentResult, QuestionCatalog, ResultError, Section, SectionKey, SectionResult,
};

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScoringError {
    #[error("answers recorded for unknown section {0}")]
    UnknownSection(SectionKey),

    #[error("section {section} has {answered} answers but only {questions} questions")]
    TooManyAnswers {
        section: SectionKey,
        answered: usize,
        questions: usize,
    },

    #[error("section {section} recorded score {score} above the maximum {max}")]
    ScoreOutOfRange {
        section: SectionKey,
        score: u32,
        max: u32,
    },

    #[error(transparent)]
    Result(#[from] ResultError),
}

/// Percentage score of a single section.
///
/// Missing answers count as zero, so partial logs yield a lower bound.
///
/// # Errors
///
/// Returns `ScoringError` if the log holds more answers than the section has
/// questions or a score above the section maximum.
pub fn section_percentage(section: &Section, answers: &AnswerLog) -> Result<f64, ScoringError> {
    let recorded = answers.answers(section.key());
    if recorded.len() > section.question_count() {
        return Err(ScoringError::TooManyAnswers {
            section: section.key().clone(),
            answered: recorded.len(),
            questions: section.question_count(),
        });
    }
    let max = section.max_score_per_question();
    if let Some(&score) = recorded.iter().find(|&&s| s > max) {
        return Err(ScoringError::ScoreOutOfRange {
            section: section.key().clone(),
            score,
            max,
        });
    }

    let actual = answers.total(section.key());
    #[allow(clippy::cast_precision_loss)]
    let percentage = (100.0 * actual as f64) / section.max_possible() as f64;
    Ok(percentage)
}

/// Score every section of `catalog` and build the final result.
///
/// # Errors
///
/// Returns `ScoringError` if the answer log does not fit the catalog.
pub fn score(
    catalog: &QuestionCatalog,
    answers: &AnswerLog,
    completed_at: DateTime<Utc>,
) -> Result<AssessmentResult, ScoringError> {
    if let Some(unknown) = answers
        .sections()
        .find(|key| catalog.section_by_key(key).is_none())
    {
        return Err(ScoringError::UnknownSection(unknown.clone()));
    }

    let mut section_results = Vec::with_capacity(catalog.section_count());
    for section in catalog.sections() {
        let percentage = section_percentage(section, answers)?;
        section_results.push(SectionResult::new(
            section.key().clone(),
            percentage,
            section.weight(),
        )?);
    }

    Ok(AssessmentResult::from_sections(section_results, completed_at)?)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
