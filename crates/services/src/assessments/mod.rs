mod progress;
mod state;
mod workflow;

// Public API of the assessment subsystem.
pub use crate::error::AssessmentError;
pub use progress::AssessmentProgress;
pub use state::{AssessmentSession, AssessmentStatus, RecordedAnswer};
pub use workflow::{AssessmentAnswerResult, AssessmentLoopService};
