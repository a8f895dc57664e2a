use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{ParseKeyError, SectionKey};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog must contain at least one section")]
    NoSections,

    #[error(transparent)]
    InvalidKey(#[from] ParseKeyError),

    #[error("duplicate section key: {0}")]
    DuplicateSection(SectionKey),

    #[error("section {0} must have a weight > 0")]
    ZeroWeight(SectionKey),

    #[error("section {0} must contain at least one question")]
    EmptySection(SectionKey),

    #[error("question {question} in section {section} has an empty prompt")]
    EmptyPrompt { section: SectionKey, question: usize },

    #[error("question {question} in section {section} needs at least 2 options, got {len}")]
    TooFewOptions {
        section: SectionKey,
        question: usize,
        len: usize,
    },

    #[error(
        "question {question} in section {section} has {options} options but {scores} scores"
    )]
    ScoreCountMismatch {
        section: SectionKey,
        question: usize,
        options: usize,
        scores: usize,
    },

    #[error("section {0} has no positive score to normalize against")]
    ZeroMaxScore(SectionKey),
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Unvalidated catalog shape, as supplied by configuration.
///
/// `{ sections: [{ key, weight, questions: [{ prompt, options, scores }] }] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDraft {
    pub sections: Vec<SectionDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDraft {
    pub key: String,
    pub weight: u32,
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub prompt: String,
    pub options: Vec<String>,
    pub scores: Vec<u32>,
}

impl CatalogDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft into an immutable `QuestionCatalog`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for the first structural violation found.
    pub fn validate(self) -> Result<QuestionCatalog, CatalogError> {
        if self.sections.is_empty() {
            return Err(CatalogError::NoSections);
        }

        let mut seen = HashSet::new();
        let mut sections = Vec::with_capacity(self.sections.len());
        for draft in self.sections {
            let section = draft.validate()?;
            if !seen.insert(section.key.clone()) {
                return Err(CatalogError::DuplicateSection(section.key));
            }
            sections.push(section);
        }

        Ok(QuestionCatalog { sections })
    }
}

impl SectionDraft {
    fn validate(self) -> Result<Section, CatalogError> {
        let key = SectionKey::new(self.key)?;
        if self.weight == 0 {
            return Err(CatalogError::ZeroWeight(key));
        }
        if self.questions.is_empty() {
            return Err(CatalogError::EmptySection(key));
        }

        let mut questions = Vec::with_capacity(self.questions.len());
        for (idx, q) in self.questions.into_iter().enumerate() {
            let prompt = q.prompt.trim().to_owned();
            if prompt.is_empty() {
                return Err(CatalogError::EmptyPrompt {
                    section: key,
                    question: idx,
                });
            }
            if q.options.len() < 2 {
                return Err(CatalogError::TooFewOptions {
                    section: key,
                    question: idx,
                    len: q.options.len(),
                });
            }
            if q.options.len() != q.scores.len() {
                return Err(CatalogError::ScoreCountMismatch {
                    section: key,
                    question: idx,
                    options: q.options.len(),
                    scores: q.scores.len(),
                });
            }
            questions.push(Question {
                prompt,
                options: q.options,
                scores: q.scores,
            });
        }

        let max_score = questions
            .iter()
            .filter_map(Question::max_score)
            .max()
            .unwrap_or(0);
        if max_score == 0 {
            return Err(CatalogError::ZeroMaxScore(key));
        }

        Ok(Section {
            key,
            weight: self.weight,
            questions,
            max_score,
        })
    }
}

//
// ─── CATALOG TYPES ─────────────────────────────────────────────────────────────
//

/// A single multiple-choice prompt with one score per option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    scores: Vec<u32>,
}

impl Question {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Score awarded for the option at `index`, if it exists.
    #[must_use]
    pub fn score_for(&self, index: usize) -> Option<u32> {
        self.scores.get(index).copied()
    }

    fn max_score(&self) -> Option<u32> {
        self.scores.iter().copied().max()
    }
}

/// A weighted group of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    key: SectionKey,
    weight: u32,
    questions: Vec<Question>,
    #[serde(skip)]
    max_score: u32,
}

impl Section {
    #[must_use]
    pub fn key(&self) -> &SectionKey {
        &self.key
    }

    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Highest score any question in this section can award.
    #[must_use]
    pub fn max_score_per_question(&self) -> u32 {
        self.max_score
    }

    /// Upper bound of the summed answers for this section.
    #[must_use]
    pub fn max_possible(&self) -> u64 {
        u64::from(self.max_score) * self.questions.len() as u64
    }

    /// Translation key of the section title.
    #[must_use]
    pub fn title_key(&self) -> String {
        format!("assessment.section.{}", self.key)
    }
}

/// Position of the question currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub section: usize,
    pub question: usize,
}

impl Position {
    #[must_use]
    pub fn new(section: usize, question: usize) -> Self {
        Self { section, question }
    }

    #[must_use]
    pub fn is_start(&self) -> bool {
        self.section == 0 && self.question == 0
    }
}

/// Immutable, validated set of sections.
///
/// Guarantees at least one section, each with at least one question, each
/// question with at least two scored options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionCatalog {
    sections: Vec<Section>,
}

impl QuestionCatalog {
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    #[must_use]
    pub fn section_by_key(&self, key: &SectionKey) -> Option<&Section> {
        self.sections.iter().find(|s| &s.key == key)
    }

    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.sections.iter().map(Section::question_count).sum()
    }

    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.sections.iter().map(|s| u64::from(s.weight)).sum()
    }

    /// Section and question at `pos`, if the position is valid.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<(&Section, &Question)> {
        let section = self.sections.get(pos.section)?;
        let question = section.questions.get(pos.question)?;
        Some((section, question))
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    #[must_use]
    pub fn first_position(&self) -> Position {
        Position::default()
    }

    /// Position after `pos`, or `None` when `pos` is the final question.
    #[must_use]
    pub fn next_position(&self, pos: Position) -> Option<Position> {
        let section = self.sections.get(pos.section)?;
        if pos.question + 1 < section.questions.len() {
            return Some(Position::new(pos.section, pos.question + 1));
        }
        if pos.section + 1 < self.sections.len() {
            return Some(Position::new(pos.section + 1, 0));
        }
        None
    }

    /// Position before `pos`, or `None` at the very first question.
    #[must_use]
    pub fn previous_position(&self, pos: Position) -> Option<Position> {
        if pos.question > 0 {
            return Some(Position::new(pos.section, pos.question - 1));
        }
        let prev = pos.section.checked_sub(1)?;
        let section = self.sections.get(prev)?;
        let last = section.questions.len().checked_sub(1)?;
        Some(Position::new(prev, last))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn question(prompt: &str, scores: Vec<u32>) -> QuestionDraft {
        QuestionDraft {
            prompt: prompt.to_owned(),
            options: scores.iter().map(|s| format!("option {s}")).collect(),
            scores,
        }
    }

    fn two_by_two() -> CatalogDraft {
        CatalogDraft {
            sections: vec![
                SectionDraft {
                    key: "a".into(),
                    weight: 1,
                    questions: vec![question("a1", vec![3, 2, 1]), question("a2", vec![3, 2, 1])],
                },
                SectionDraft {
                    key: "b".into(),
                    weight: 2,
                    questions: vec![question("b1", vec![3, 2, 1]), question("b2", vec![3, 2, 1])],
                },
            ],
        }
    }

    #[test]
    fn validates_well_formed_catalog() {
        let catalog = two_by_two().validate().unwrap();
        assert_eq!(catalog.section_count(), 2);
        assert_eq!(catalog.total_questions(), 4);
        assert_eq!(catalog.total_weight(), 3);
        assert_eq!(catalog.sections()[1].max_possible(), 6);
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = CatalogDraft::new().validate().unwrap_err();
        assert_eq!(err, CatalogError::NoSections);
    }

    #[test]
    fn rejects_duplicate_keys() {
        let mut draft = two_by_two();
        draft.sections[1].key = "a".into();
        let err = draft.validate().unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSection(k) if k.as_str() == "a"));
    }

    #[test]
    fn rejects_zero_weight_and_empty_sections() {
        let mut draft = two_by_two();
        draft.sections[0].weight = 0;
        assert!(matches!(draft.validate(), Err(CatalogError::ZeroWeight(_))));

        let mut draft = two_by_two();
        draft.sections[0].questions.clear();
        assert!(matches!(draft.validate(), Err(CatalogError::EmptySection(_))));
    }

    #[test]
    fn rejects_malformed_questions() {
        let mut draft = two_by_two();
        draft.sections[0].questions[1] = question("single", vec![3]);
        assert!(matches!(
            draft.validate(),
            Err(CatalogError::TooFewOptions { question: 1, len: 1, .. })
        ));

        let mut draft = two_by_two();
        draft.sections[1].questions[0].scores.pop();
        assert!(matches!(
            draft.validate(),
            Err(CatalogError::ScoreCountMismatch { options: 3, scores: 2, .. })
        ));

        let mut draft = two_by_two();
        draft.sections[0].questions[0].prompt = "   ".into();
        assert!(matches!(draft.validate(), Err(CatalogError::EmptyPrompt { .. })));
    }

    #[test]
    fn rejects_all_zero_scores() {
        let mut draft = two_by_two();
        draft.sections[0].questions = vec![question("zero", vec![0, 0])];
        assert!(matches!(draft.validate(), Err(CatalogError::ZeroMaxScore(_))));
    }

    #[test]
    fn max_score_is_taken_across_the_section() {
        let mut draft = two_by_two();
        draft.sections[0].questions[1] = question("wide", vec![5, 1]);
        let catalog = draft.validate().unwrap();
        assert_eq!(catalog.sections()[0].max_score_per_question(), 5);
        assert_eq!(catalog.sections()[0].max_possible(), 10);
    }

    #[test]
    fn forward_navigation_crosses_sections() {
        let catalog = two_by_two().validate().unwrap();
        let mut pos = catalog.first_position();
        assert!(pos.is_start());
        let mut visited = vec![pos];
        while let Some(next) = catalog.next_position(pos) {
            visited.push(next);
            assert!(!next.is_start());
            pos = next;
        }
        assert_eq!(
            visited,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn backward_navigation_lands_on_previous_sections_last_question() {
        let catalog = two_by_two().validate().unwrap();
        assert_eq!(
            catalog.previous_position(Position::new(1, 0)),
            Some(Position::new(0, 1))
        );
        assert_eq!(
            catalog.previous_position(Position::new(1, 1)),
            Some(Position::new(1, 0))
        );
        assert_eq!(catalog.previous_position(Position::new(0, 0)), None);
    }

    #[test]
    fn deserializes_configuration_shape() {
        let json = r#"{
            "sections": [
                { "key": "solo", "weight": 4, "questions": [
                    { "prompt": "Ready?", "options": ["Yes", "No"], "scores": [3, 1] }
                ]}
            ]
        }"#;
        let draft: CatalogDraft = serde_json::from_str(json).unwrap();
        let catalog = draft.validate().unwrap();
        let (section, question) = catalog.get(Position::new(0, 0)).unwrap();
        assert_eq!(section.key().as_str(), "solo");
        assert_eq!(section.title_key(), "assessment.section.solo");
        assert_eq!(question.score_for(1), Some(1));
        assert_eq!(question.score_for(2), None);
    }
}
