//! Result Set - ordered trial results of one evaluation

use serde::{Deserialize, Serialize};

use super::TrialResult;

/// Trials of one evaluation, ordered by run index.
///
/// The evaluator hands this to the stats aggregator; nothing downstream
/// mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    base_seed: u64,
    trials: Vec<TrialResult>,
}

impl ResultSet {
    /// Wrap trials, sorting them by run index.
    #[must_use]
    pub fn new(base_seed: u64, mut trials: Vec<TrialResult>) -> Self {
        trials.sort_by_key(TrialResult::run_index);
        Self { base_seed, trials }
    }

    /// Seed every trial's partition stream was derived from.
    #[must_use]
    pub const fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// All trials in run order.
    #[must_use]
    pub fn trials(&self) -> &[TrialResult] {
        &self.trials
    }

    /// Number of trials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// True when no trials ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Trial with the given 1-based run index.
    #[must_use]
    pub fn get(&self, run_index: usize) -> Option<&TrialResult> {
        self.trials
            .binary_search_by_key(&run_index, TrialResult::run_index)
            .ok()
            .map(|position| &self.trials[position])
    }

    /// Accuracy column in run order.
    #[must_use]
    pub fn accuracies(&self) -> Vec<f64> {
        self.trials.iter().map(TrialResult::accuracy).collect()
    }

    /// F1 column in run order.
    #[must_use]
    pub fn f1_scores(&self) -> Vec<f64> {
        self.trials.iter().map(TrialResult::f1).collect()
    }

    /// Number of trials flagged degenerate.
    #[must_use]
    pub fn degenerate_count(&self) -> usize {
        self.trials
            .iter()
            .filter(|trial| trial.status().is_degenerate())
            .count()
    }

    pub(crate) fn into_trials(self) -> Vec<TrialResult> {
        self.trials
    }
}
