use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::SectionKey;

/// Recorded option scores per section, in the order they were answered.
///
/// Answers are only ever appended or popped from the end, which keeps each
/// sequence aligned with question order under linear navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerLog {
    entries: HashMap<SectionKey, Vec<u32>>,
}

impl AnswerLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a score to the given section.
    pub fn push(&mut self, section: &SectionKey, score: u32) {
        self.entries.entry(section.clone()).or_default().push(score);
    }

    /// Remove and return the most recent score of the given section.
    ///
    /// A section left without answers is dropped from the log so that an
    /// undone section compares equal to one never reached.
    pub fn pop(&mut self, section: &SectionKey) -> Option<u32> {
        let scores = self.entries.get_mut(section)?;
        let popped = scores.pop();
        if scores.is_empty() {
            self.entries.remove(section);
        }
        popped
    }

    /// Recorded scores for a section; empty if the section was never reached.
    #[must_use]
    pub fn answers(&self, section: &SectionKey) -> &[u32] {
        self.entries.get(section).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn answered_in(&self, section: &SectionKey) -> usize {
        self.answers(section).len()
    }

    /// Sum of the recorded scores for a section.
    #[must_use]
    pub fn total(&self, section: &SectionKey) -> u64 {
        self.answers(section).iter().map(|s| u64::from(*s)).sum()
    }

    /// Number of answers across all sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Section keys with at least one answer, in arbitrary order.
    pub fn sections(&self) -> impl Iterator<Item = &SectionKey> {
        self.entries.keys()
    }
}
