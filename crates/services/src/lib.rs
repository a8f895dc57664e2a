#![forbid(unsafe_code)]

pub mod assessments;
pub mod error;
pub mod language_service;

pub use assess_core::Clock;

pub use error::{AssessmentError, LanguageServiceError};
pub use language_service::LanguageService;

pub use assessments::{
    AssessmentAnswerResult, AssessmentLoopService, AssessmentProgress, AssessmentSession,
    AssessmentStatus, RecordedAnswer,
};
