//! Scored Trial - a trial result annotated with its accuracy z-score

use serde::{Deserialize, Serialize};

use super::TrialResult;

/// A trial plus its accuracy z-score across the evaluation.
///
/// `z_score` is `None` when all runs scored the same accuracy and the
/// standard deviation is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTrial {
    #[serde(flatten)]
    trial: TrialResult,
    z_score: Option<f64>,
}

impl ScoredTrial {
    /// Attach a z-score to a trial.
    #[must_use]
    pub const fn new(trial: TrialResult, z_score: Option<f64>) -> Self {
        Self { trial, z_score }
    }

    /// The underlying trial.
    #[must_use]
    pub const fn trial(&self) -> &TrialResult {
        &self.trial
    }

    /// Accuracy z-score, `None` when undefined.
    #[must_use]
    pub const fn z_score(&self) -> Option<f64> {
        self.z_score
    }

    /// 1-based run number.
    #[must_use]
    pub const fn run_index(&self) -> usize {
        self.trial.run_index()
    }

    /// Test-partition accuracy.
    #[must_use]
    pub const fn accuracy(&self) -> f64 {
        self.trial.accuracy()
    }

    /// Test-partition weighted F1.
    #[must_use]
    pub const fn f1(&self) -> f64 {
        self.trial.f1()
    }
}
