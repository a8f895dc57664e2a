use serde::Serialize;

/// Aggregated view of assessment progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl AssessmentProgress {
    /// Answered share in [0, 1].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.answered as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    /// Whole-number percentage for display, rounded half up.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(total: usize, answered: usize) -> AssessmentProgress {
        AssessmentProgress {
            total,
            answered,
            remaining: total - answered,
            is_complete: false,
        }
    }

    #[test]
    fn percent_rounds_like_the_progress_bar() {
        assert_eq!(progress(14, 0).percent(), 0);
        assert_eq!(progress(14, 1).percent(), 7);
        assert_eq!(progress(14, 7).percent(), 50);
        assert_eq!(progress(3, 2).percent(), 67);
        assert_eq!(progress(14, 14).percent(), 100);
    }

    #[test]
    fn empty_total_reads_as_zero() {
        assert_eq!(progress(0, 0).fraction(), 0.0);
    }
}
