use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::SectionKey;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("percentage out of range: {0}")]
    PercentageOutOfRange(f64),

    #[error("section {0} must have a weight > 0")]
    ZeroWeight(SectionKey),

    #[error("result must contain at least one section")]
    NoSections,

    #[error("unknown proficiency level: {0}")]
    UnknownLevel(String),

    #[error("section {section} stored as {stored} but its score {score} is {expected}")]
    LevelMismatch {
        section: SectionKey,
        score: f64,
        stored: Level,
        expected: Level,
    },
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Coarse proficiency classification of a section percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ADVANCED_ABOVE: f64 = 70.0;
    pub const INTERMEDIATE_ABOVE: f64 = 40.0;

    /// Classify a percentage. Both thresholds are exclusive, so exactly 70
    /// is intermediate and exactly 40 is beginner.
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > Self::ADVANCED_ABOVE {
            Level::Advanced
        } else if percentage > Self::INTERMEDIATE_ABOVE {
            Level::Intermediate
        } else {
            Level::Beginner
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ResultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(ResultError::UnknownLevel(other.to_owned())),
        }
    }
}

//
// ─── SECTION RESULT ────────────────────────────────────────────────────────────
//

/// Score of one section, carried in catalog order inside `AssessmentResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SectionResultRecord")]
pub struct SectionResult {
    section: SectionKey,
    score: f64,
    level: Level,
    weight: u32,
}

impl SectionResult {
    /// Build a section result; the level is derived from `score`.
    ///
    /// # Errors
    ///
    /// Returns `ResultError` if the score is outside [0, 100] or the weight is zero.
    pub fn new(section: SectionKey, score: f64, weight: u32) -> Result<Self, ResultError> {
        if !score.is_finite() || !(0.0..=100.0).contains(&score) {
            return Err(ResultError::PercentageOutOfRange(score));
        }
        if weight == 0 {
            return Err(ResultError::ZeroWeight(section));
        }
        Ok(Self {
            level: Level::from_percentage(score),
            section,
            score,
            weight,
        })
    }

    #[must_use]
    pub fn section(&self) -> &SectionKey {
        &self.section
    }

    /// Percentage in [0, 100].
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }
}

/// Wire shape of a stored section result, checked on the way in.
#[derive(Deserialize)]
struct SectionResultRecord {
    section: SectionKey,
    score: f64,
    level: Level,
    weight: u32,
}

impl TryFrom<SectionResultRecord> for SectionResult {
    type Error = ResultError;

    fn try_from(record: SectionResultRecord) -> Result<Self, Self::Error> {
        let result = SectionResult::new(record.section, record.score, record.weight)?;
        if result.level != record.level {
            return Err(ResultError::LevelMismatch {
                section: result.section,
                score: result.score,
                stored: record.level,
                expected: result.level,
            });
        }
        Ok(result)
    }
}

//
// ─── ASSESSMENT RESULT ─────────────────────────────────────────────────────────
//

/// Finished assessment, handed to the result reporter once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AssessmentResultRecord")]
pub struct AssessmentResult {
    section_results: Vec<SectionResult>,
    overall_score: f64,
    completed_at: DateTime<Utc>,
}

impl AssessmentResult {
    /// Assemble a result from scored sections, computing the weighted overall score.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::NoSections` if `section_results` is empty.
    pub fn from_sections(
        section_results: Vec<SectionResult>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        let overall_score = weighted_average(&section_results).ok_or(ResultError::NoSections)?;
        Ok(Self {
            section_results,
            overall_score,
            completed_at,
        })
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `ResultError` if there are no sections or the stored overall
    /// score is outside [0, 100].
    pub fn from_persisted(
        section_results: Vec<SectionResult>,
        overall_score: f64,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ResultError> {
        if section_results.is_empty() {
            return Err(ResultError::NoSections);
        }
        if !overall_score.is_finite() || !(0.0..=100.0).contains(&overall_score) {
            return Err(ResultError::PercentageOutOfRange(overall_score));
        }
        Ok(Self {
            section_results,
            overall_score,
            completed_at,
        })
    }

    #[must_use]
    pub fn section_results(&self) -> &[SectionResult] {
        &self.section_results
    }

    #[must_use]
    pub fn section(&self, key: &SectionKey) -> Option<&SectionResult> {
        self.section_results.iter().find(|r| r.section() == key)
    }

    #[must_use]
    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    /// Level of the overall score, using the same thresholds as sections.
    #[must_use]
    pub fn overall_level(&self) -> Level {
        Level::from_percentage(self.overall_score)
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Sections at `level`, in catalog order.
    pub fn sections_at(&self, level: Level) -> impl Iterator<Item = &SectionResult> {
        self.section_results.iter().filter(move |r| r.level == level)
    }

    /// Compare scores and levels, ignoring the completion timestamp.
    #[must_use]
    pub fn same_scores(&self, other: &Self) -> bool {
        self.section_results == other.section_results && self.overall_score == other.overall_score
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentResultRecord {
    section_results: Vec<SectionResult>,
    overall_score: f64,
    completed_at: DateTime<Utc>,
}

impl TryFrom<AssessmentResultRecord> for AssessmentResult {
    type Error = ResultError;

    fn try_from(record: AssessmentResultRecord) -> Result<Self, Self::Error> {
        AssessmentResult::from_persisted(
            record.section_results,
            record.overall_score,
            record.completed_at,
        )
    }
}

fn weighted_average(results: &[SectionResult]) -> Option<f64> {
    let total_weight: u64 = results.iter().map(|r| u64::from(r.weight)).sum();
    if total_weight == 0 {
        return None;
    }
    let weighted: f64 = results.iter().map(|r| r.score * f64::from(r.weight)).sum();
    #[allow(clippy::cast_precision_loss)]
    let avg = weighted / total_weight as f64;
    Some(avg.clamp(0.0, 100.0))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn key(s: &str) -> SectionKey {
        SectionKey::new(s).unwrap()
    }

    #[test]
    fn level_thresholds_are_exclusive() {
        assert_eq!(Level::from_percentage(0.0), Level::Beginner);
        assert_eq!(Level::from_percentage(40.0), Level::Beginner);
        assert_eq!(Level::from_percentage(40.01), Level::Intermediate);
        assert_eq!(Level::from_percentage(70.0), Level::Intermediate);
        assert_eq!(Level::from_percentage(70.01), Level::Advanced);
        assert_eq!(Level::from_percentage(100.0), Level::Advanced);
    }

    #[test]
    fn level_parses_its_own_display() {
        for level in [Level::Beginner, Level::Intermediate, Level::Advanced] {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
        assert!(matches!(
            "expert".parse::<Level>(),
            Err(ResultError::UnknownLevel(_))
        ));
    }

    #[test]
    fn section_result_rejects_out_of_range() {
        assert!(SectionResult::new(key("a"), 100.5, 1).is_err());
        assert!(SectionResult::new(key("a"), -1.0, 1).is_err());
        assert!(SectionResult::new(key("a"), f64::NAN, 1).is_err());
        assert!(matches!(
            SectionResult::new(key("a"), 50.0, 0),
            Err(ResultError::ZeroWeight(_))
        ));
    }

    #[test]
    fn overall_is_weighted_average() {
        let results = vec![
            SectionResult::new(key("a"), 100.0, 1).unwrap(),
            SectionResult::new(key("b"), 40.0, 2).unwrap(),
        ];
        let result = AssessmentResult::from_sections(results, fixed_now()).unwrap();
        assert!((result.overall_score() - 60.0).abs() < 1e-9);
        assert_eq!(result.overall_level(), Level::Intermediate);
        assert_eq!(result.sections_at(Level::Advanced).count(), 1);
    }

    #[test]
    fn empty_result_is_rejected() {
        let err = AssessmentResult::from_sections(Vec::new(), fixed_now()).unwrap_err();
        assert_eq!(err, ResultError::NoSections);
    }

    #[test]
    fn serializes_to_reporter_shape() {
        let results = vec![SectionResult::new(key("payments"), 50.0, 2).unwrap()];
        let result = AssessmentResult::from_sections(results, fixed_now()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["overallScore"], 50.0);
        assert_eq!(json["completedAt"], "2023-11-14T22:13:20Z");
        let section = &json["sectionResults"][0];
        assert_eq!(section["section"], "payments");
        assert_eq!(section["score"], 50.0);
        assert_eq!(section["level"], "intermediate");
        assert_eq!(section["weight"], 2);
    }

    #[test]
    fn stored_section_roundtrips_through_validation() {
        let section = SectionResult::new(key("finance"), 83.5, 2).unwrap();
        let json = serde_json::to_string(&section).unwrap();
        let back: SectionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, section);
    }

    #[test]
    fn corrupt_stored_sections_are_rejected() {
        let too_high = r#"{"section":"a","score":150.0,"level":"advanced","weight":1}"#;
        assert!(serde_json::from_str::<SectionResult>(too_high).is_err());

        let zero_weight = r#"{"section":"a","score":50.0,"level":"intermediate","weight":0}"#;
        assert!(serde_json::from_str::<SectionResult>(zero_weight).is_err());

        let wrong_level = r#"{"section":"a","score":90.0,"level":"beginner","weight":1}"#;
        let err = serde_json::from_str::<SectionResult>(wrong_level).unwrap_err();
        assert!(err.to_string().contains("stored as beginner"));

        let mixed = r#"[{"section":"a","score":150.0,"level":"beginner","weight":0}]"#;
        assert!(serde_json::from_str::<Vec<SectionResult>>(mixed).is_err());
    }

    #[test]
    fn stored_result_checks_overall_score() {
        let json = r#"{
            "sectionResults": [{"section":"a","score":50.0,"level":"intermediate","weight":1}],
            "overallScore": 120.0,
            "completedAt": "2023-11-14T22:13:20Z"
        }"#;
        assert!(serde_json::from_str::<AssessmentResult>(json).is_err());

        let empty = r#"{"sectionResults": [], "overallScore": 0.0, "completedAt": "2023-11-14T22:13:20Z"}"#;
        assert!(serde_json::from_str::<AssessmentResult>(empty).is_err());
    }

    #[test]
    fn same_scores_ignores_timestamp() {
        let build = |at| {
            AssessmentResult::from_sections(
                vec![SectionResult::new(key("a"), 80.0, 1).unwrap()],
                at,
            )
            .unwrap()
        };
        let a = build(fixed_now());
        let b = build(fixed_now() + chrono::Duration::minutes(5));
        assert_ne!(a, b);
        assert!(a.same_scores(&b));
    }
}
