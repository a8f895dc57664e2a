use std::sync::Arc;

use assess_core::Language;
use assess_core::i18n;
use storage::repository::LanguagePreferenceRepository;
use tracing::debug;

use crate::error::LanguageServiceError;

/// Loads, switches and persists the process-wide UI language.
#[derive(Clone)]
pub struct LanguageService {
    repo: Arc<dyn LanguagePreferenceRepository>,
}

impl LanguageService {
    #[must_use]
    pub fn new(repo: Arc<dyn LanguagePreferenceRepository>) -> Self {
        Self { repo }
    }

    /// Apply the saved language (or the default) to the process and return it.
    ///
    /// # Errors
    ///
    /// Returns `LanguageServiceError` on storage failures.
    pub async fn load(&self) -> Result<Language, LanguageServiceError> {
        let language = self.repo.get_language().await?.unwrap_or_default();
        i18n::set_language(language);
        debug!(language = %language, "language loaded");
        Ok(language)
    }

    /// Persist a new language choice and apply it to the process.
    ///
    /// # Errors
    ///
    /// Returns `LanguageServiceError` if persistence fails; the process-wide
    /// language is left unchanged in that case.
    pub async fn change(&self, language: Language) -> Result<(), LanguageServiceError> {
        self.repo.save_language(language).await?;
        i18n::set_language(language);
        debug!(language = %language, "language changed");
        Ok(())
    }

    /// Language currently applied to the process.
    #[must_use]
    pub fn current(&self) -> Language {
        i18n::current_language()
    }
}
