use assess_core::Language;
use async_trait::async_trait;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::ser;
use crate::repository::{LanguagePreferenceRepository, StorageError};

#[async_trait]
impl LanguagePreferenceRepository for SqliteRepository {
    async fn get_language(&self) -> Result<Option<Language>, StorageError> {
        let row = sqlx::query("SELECT language FROM language_preference WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let code: String = row.try_get("language").map_err(ser)?;
        code.parse::<Language>().map(Some).map_err(ser)
    }

    async fn save_language(&self, language: Language) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO language_preference (id, language)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                language = excluded.language
            ",
        )
        .bind(1_i64)
        .bind(language.code())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
