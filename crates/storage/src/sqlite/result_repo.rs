use assess_core::model::AssessmentResult;

use super::SqliteRepository;
use super::mapping::{encode_sections, map_result_row, map_result_row_with_id};
use crate::repository::{AssessmentResultRepository, AssessmentResultRow, StorageError};

#[async_trait::async_trait]
impl AssessmentResultRepository for SqliteRepository {
    async fn append_result(&self, result: &AssessmentResult) -> Result<i64, StorageError> {
        let sections = encode_sections(result)?;

        let res = sqlx::query(
            r"
                INSERT INTO assessment_results (completed_at, overall_score, section_results)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(result.completed_at())
        .bind(result.overall_score())
        .bind(sections)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn get_result(&self, id: i64) -> Result<AssessmentResult, StorageError> {
        let row = sqlx::query(
            r"
                SELECT completed_at, overall_score, section_results
                FROM assessment_results
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_result_row(&row)
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<AssessmentResultRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, completed_at, overall_score, section_results
                FROM assessment_results
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row_with_id(&row)?);
        }
        Ok(out)
    }
}
