use assess_core::model::{AssessmentResult, SectionResult};
use sqlx::Row;

use crate::repository::{AssessmentResultRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Section results are stored as a JSON array in catalog order.
pub(crate) fn encode_sections(result: &AssessmentResult) -> Result<String, StorageError> {
    serde_json::to_string(result.section_results()).map_err(ser)
}

pub(crate) fn decode_sections(raw: &str) -> Result<Vec<SectionResult>, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<AssessmentResult, StorageError> {
    let completed_at = row.try_get("completed_at").map_err(ser)?;
    let overall_score: f64 = row.try_get("overall_score").map_err(ser)?;
    let raw: String = row.try_get("section_results").map_err(ser)?;
    let sections = decode_sections(&raw)?;

    AssessmentResult::from_persisted(sections, overall_score, completed_at).map_err(ser)
}

pub(crate) fn map_result_row_with_id(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AssessmentResultRow, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let result = map_result_row(row)?;
    Ok(AssessmentResultRow::new(id, result))
}
