use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique key of an assessment section (e.g. `payments`).
///
/// Keys are trimmed, non-empty and contain no whitespace so they can double
/// as translation key suffixes (`assessment.section.<key>`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionKey(String);

impl SectionKey {
    /// Creates a new `SectionKey`.
    ///
    /// # Errors
    ///
    /// Returns `ParseKeyError` if the key is empty or contains whitespace.
    pub fn new(key: impl Into<String>) -> Result<Self, ParseKeyError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(ParseKeyError { raw: key });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionKey({})", self.0)
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SectionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<SectionKey> for String {
    fn from(key: SectionKey) -> Self {
        key.0
    }
}

impl TryFrom<String> for SectionKey {
    type Error = ParseKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

// ─── FromStr ───────────────────────────────────────────────────────────────────

/// Error type for parsing a section key from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError {
    raw: String,
}

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid section key: {:?}", self.raw)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for SectionKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
