//! UI text lookup and the process-wide language setting.
//!
//! Lookups fall back to the key itself when a translation is missing, so a
//! caller always has something to display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LanguageError {
    #[error("unsupported language code: {0}")]
    Unsupported(String),
}

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Hindi];

    /// Two-letter code used for persistence and the document `lang` attribute.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    /// Name of the language written in that language.
    #[must_use]
    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिन्दी",
        }
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Language::English => EN,
            Language::Hindi => HI,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::English),
            "hi" => Ok(Language::Hindi),
            other => Err(LanguageError::Unsupported(other.to_owned())),
        }
    }
}

// ─── Process-wide setting ──────────────────────────────────────────────────────

static CURRENT_LANGUAGE: RwLock<Language> = RwLock::new(Language::English);

/// Language currently selected for the whole process.
#[must_use]
pub fn current_language() -> Language {
    match CURRENT_LANGUAGE.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Select the language for the whole process.
pub fn set_language(language: Language) {
    match CURRENT_LANGUAGE.write() {
        Ok(mut guard) => *guard = language,
        Err(poisoned) => *poisoned.into_inner() = language,
    }
}

// ─── Lookup ────────────────────────────────────────────────────────────────────

/// Translate `key` into `language`, returning `key` when no entry exists.
#[must_use]
pub fn translate<'a>(key: &'a str, language: Language) -> &'a str {
    language
        .table()
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(key, |(_, text)| *text)
}

/// Translate `key` into the current process-wide language.
#[must_use]
pub fn t(key: &str) -> &str {
    translate(key, current_language())
}

/// Whether `key` has an entry for `language`.
#[must_use]
pub fn has_translation(key: &str, language: Language) -> bool {
    language.table().iter().any(|(k, _)| *k == key)
}

const EN: &[(&str, &str)] = &[
    ("app.title", "DigiSaathi"),
    ("app.tagline", "Digital Capability Assessment Tool for Indian businesses"),
    ("lang.english", "English"),
    ("lang.hindi", "हिन्दी"),
    ("common.loading", "Loading..."),
    ("common.error", "Something went wrong"),
    ("common.retry", "Try Again"),
    ("common.save", "Save"),
    ("common.cancel", "Cancel"),
    ("common.next", "Next"),
    ("common.previous", "Previous"),
    ("common.finish", "Finish"),
    ("nav.home", "Home"),
    ("nav.assessment", "Assessment"),
    ("nav.learn", "Learn"),
    ("nav.tools", "Tools"),
    ("nav.schemes", "Schemes"),
    ("cta.start", "Start Assessment"),
    ("assessment.title", "Digital Readiness Assessment"),
    ("assessment.subtitle", "Discover your digital strengths and areas for growth"),
    ("assessment.progress", "Progress"),
    ("assessment.complete", "Assessment Complete!"),
    ("assessment.section.smartphone", "Smartphone Basics"),
    ("assessment.section.payments", "Digital Payments"),
    ("assessment.section.presence", "Online Presence"),
    ("assessment.section.social", "Social Media"),
    ("assessment.section.commerce", "E-Commerce"),
    ("assessment.section.finance", "Digital Finance"),
    ("assessment.section.security", "Digital Security"),
    ("assessment.level.beginner", "Beginner"),
    ("assessment.level.intermediate", "Intermediate"),
    ("assessment.level.advanced", "Advanced"),
];

const HI: &[(&str, &str)] = &[
    ("app.title", "डिजीसाथी"),
    ("app.tagline", "भारतीय व्यवसायों के लिए डिजिटल क्षमता मूल्यांकन उपकरण"),
    ("lang.english", "English"),
    ("lang.hindi", "हिन्दी"),
    ("common.loading", "लोड हो रहा है..."),
    ("common.error", "कुछ गलत हुआ"),
    ("common.retry", "फिर से कोशिश करें"),
    ("common.save", "सेव करें"),
    ("common.cancel", "रद्द करें"),
    ("common.next", "अगला"),
    ("common.previous", "पिछला"),
    ("common.finish", "समाप्त"),
    ("nav.home", "होम"),
    ("nav.assessment", "आकलन"),
    ("nav.learn", "सीखें"),
    ("nav.tools", "उपकरण"),
    ("nav.schemes", "योजनाएं"),
    ("cta.start", "आकलन शुरू करें"),
    ("assessment.title", "डिजिटल तैयारी आकलन"),
    ("assessment.subtitle", "अपनी डिजिटल शक्तियों और विकास के क्षेत्रों की खोज करें"),
    ("assessment.progress", "प्रगति"),
    ("assessment.section.smartphone", "स्मार्टफोन की बुनियादी बातें"),
    ("assessment.section.payments", "डिजिटल भुगतान"),
    ("assessment.section.presence", "ऑनलाइन उपस्थिति"),
    ("assessment.section.social", "सोशल मीडिया"),
    ("assessment.section.commerce", "ई-कॉमर्स"),
    ("assessment.section.finance", "डिजिटल वित्त"),
    ("assessment.section.security", "डिजिटल सुरक्षा"),
    ("assessment.level.beginner", "शुरुआती"),
    ("assessment.level.intermediate", "मध्यम"),
    ("assessment.level.advanced", "उन्नत"),
];
