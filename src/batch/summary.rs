use super::types::Outcome;

/// Counts and successful values folded from a batch's outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary<T> {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Success values in the order the outcomes were observed.
    pub success_items: Vec<T>,
}

impl<T> Default for BatchSummary<T> {
    fn default() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: 0,
            success_items: Vec::new(),
        }
    }
}

impl<T> BatchSummary<T> {
    /// Folds one more outcome into the summary.
    pub fn record<I>(mut self, outcome: Outcome<I, T>) -> Self {
        self.total += 1;
        match outcome {
            Outcome::Success { value, .. } => {
                self.succeeded += 1;
                self.success_items.push(value);
            }
            Outcome::Failure { .. } => self.failed += 1,
        }
        self
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Folds every outcome into a [`BatchSummary`].
pub fn aggregate<I, T>(outcomes: impl IntoIterator<Item = Outcome<I, T>>) -> BatchSummary<T> {
    outcomes
        .into_iter()
        .fold(BatchSummary::default(), BatchSummary::record)
}
