//! Built-in digital readiness questionnaire for small businesses.

use crate::model::catalog::{CatalogDraft, CatalogError, QuestionCatalog, QuestionDraft, SectionDraft};

const LIKERT: [u32; 3] = [3, 2, 1];

/// `(key, weight, [(prompt, [options; 3])])`
type SectionSpec = (&'static str, u32, &'static [(&'static str, [&'static str; 3])]);

const SECTIONS: &[SectionSpec] = &[
    (
        "smartphone",
        1,
        &[
            (
                "How comfortable are you with installing new apps?",
                ["Very comfortable", "Somewhat comfortable", "Not comfortable"],
            ),
            (
                "Can you easily share files using your smartphone?",
                ["Yes, always", "Sometimes", "No"],
            ),
        ],
    ),
    (
        "payments",
        2,
        &[
            (
                "Do you use UPI for business transactions?",
                ["Daily", "Weekly", "Never"],
            ),
            (
                "How comfortable are you with QR code payments?",
                ["Very comfortable", "Somewhat comfortable", "Not comfortable"],
            ),
        ],
    ),
    (
        "presence",
        2,
        &[
            (
                "Does your business have a Google Business Profile?",
                ["Yes, updated regularly", "Yes, but rarely updated", "No"],
            ),
            (
                "How often do customers find you through online search?",
                ["Very often", "Sometimes", "Rarely"],
            ),
        ],
    ),
    (
        "social",
        2,
        &[
            (
                "Do you post about your business on social media?",
                ["Daily", "Weekly", "Never"],
            ),
            (
                "Can you create and edit videos for your business?",
                ["Yes, easily", "With help", "No"],
            ),
        ],
    ),
    (
        "commerce",
        3,
        &[
            (
                "Do you sell products/services online?",
                ["Yes, regularly", "Occasionally", "No"],
            ),
            (
                "How do you manage your product catalog?",
                ["Digital app", "WhatsApp/Photos", "Paper/Memory"],
            ),
        ],
    ),
    (
        "finance",
        2,
        &[
            (
                "Do you create digital invoices for your customers?",
                ["Always", "Sometimes", "Never"],
            ),
            (
                "How do you track your business income?",
                ["Digital app", "Spreadsheet", "Paper/Memory"],
            ),
        ],
    ),
    (
        "security",
        2,
        &[
            (
                "Do you use strong passwords for business accounts?",
                ["Always", "Sometimes", "No"],
            ),
            (
                "How do you backup important business data?",
                ["Cloud storage", "Local backup", "No backup"],
            ),
        ],
    ),
];

/// Draft of the built-in catalog, useful as a starting point for customization.
#[must_use]
pub fn digital_readiness_draft() -> CatalogDraft {
    let sections = SECTIONS
        .iter()
        .map(|(key, weight, questions)| SectionDraft {
            key: (*key).to_owned(),
            weight: *weight,
            questions: questions
                .iter()
                .map(|(prompt, options)| QuestionDraft {
                    prompt: (*prompt).to_owned(),
                    options: options.iter().map(|o| (*o).to_owned()).collect(),
                    scores: LIKERT.to_vec(),
                })
                .collect(),
        })
        .collect();
    CatalogDraft { sections }
}

impl QuestionCatalog {
    /// The seven-section digital readiness catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` only if the built-in table is malformed.
    pub fn digital_readiness() -> Result<Self, CatalogError> {
        digital_readiness_draft().validate()
    }
}
