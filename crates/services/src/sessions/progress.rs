use quiz_core::score::ProgressStage;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub current_index: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub awaiting_advance: bool,
    pub stage: ProgressStage,
}

impl SessionProgress {
    #[must_use]
    pub fn new(current_index: usize, total: usize, answered: usize, awaiting_advance: bool) -> Self {
        Self {
            current_index,
            total,
            answered,
            remaining: total.saturating_sub(current_index),
            awaiting_advance,
            stage: ProgressStage::from_position(current_index, total),
        }
    }

    /// One-based number of the question on screen, capped at `total`.
    #[must_use]
    pub fn question_number(&self) -> usize {
        (self.current_index + 1).min(self.total)
    }
}
