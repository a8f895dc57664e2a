mod answers;
mod catalog;
mod ids;
mod readiness;
mod result;

pub use answers::AnswerLog;
pub use catalog::{
    CatalogDraft, CatalogError, Position, Question, QuestionCatalog, QuestionDraft, Section,
    SectionDraft,
};
pub use ids::{ParseKeyError, SectionKey};
pub use readiness::digital_readiness_draft;
pub use result::{AssessmentResult, Level, ResultError, SectionResult};
