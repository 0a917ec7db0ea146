//! Trial Result - outcome of one train/evaluate run

use serde::{Deserialize, Serialize};

/// Whether a trial's partition was usable as drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrialStatus {
    /// Both classes on both sides of the split.
    Ok,
    /// A label class was missing from the training or test partition.
    /// Metrics are still recorded.
    Degenerate {
        /// Which side lacked which class
        reason: String,
    },
}

impl TrialStatus {
    /// True for [`TrialStatus::Degenerate`].
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate { .. })
    }
}

/// Metrics of a single trial.
///
/// Created once per evaluator iteration and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    run_index: usize,
    accuracy: f64,
    f1: f64,
    status: TrialStatus,
    train_size: usize,
    test_size: usize,
    split_attempts: usize,
}

impl TrialResult {
    /// Create a trial result with `Ok` status and no partition details.
    ///
    /// # Arguments
    ///
    /// * `run_index` - 1-based run number
    /// * `accuracy` - Exact-match fraction on the test partition
    /// * `f1` - Support-weighted F1 on the test partition
    #[must_use]
    pub const fn new(run_index: usize, accuracy: f64, f1: f64) -> Self {
        Self {
            run_index,
            accuracy,
            f1,
            status: TrialStatus::Ok,
            train_size: 0,
            test_size: 0,
            split_attempts: 1,
        }
    }

    /// Create a builder for a trial result with partition details.
    #[must_use]
    pub const fn builder(run_index: usize, accuracy: f64, f1: f64) -> TrialResultBuilder {
        TrialResultBuilder::new(run_index, accuracy, f1)
    }

    /// 1-based run number.
    #[must_use]
    pub const fn run_index(&self) -> usize {
        self.run_index
    }

    /// Test-partition accuracy.
    #[must_use]
    pub const fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Test-partition weighted F1.
    #[must_use]
    pub const fn f1(&self) -> f64 {
        self.f1
    }

    /// Partition status.
    #[must_use]
    pub const fn status(&self) -> &TrialStatus {
        &self.status
    }

    /// Training rows used.
    #[must_use]
    pub const fn train_size(&self) -> usize {
        self.train_size
    }

    /// Test rows evaluated.
    #[must_use]
    pub const fn test_size(&self) -> usize {
        self.test_size
    }

    /// Partitions drawn before one was accepted (1 = first draw).
    #[must_use]
    pub const fn split_attempts(&self) -> usize {
        self.split_attempts
    }
}

/// Builder for `TrialResult`.
#[derive(Debug)]
pub struct TrialResultBuilder {
    result: TrialResult,
}

impl TrialResultBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub const fn new(run_index: usize, accuracy: f64, f1: f64) -> Self {
        Self {
            result: TrialResult::new(run_index, accuracy, f1),
        }
    }

    /// Set the partition status.
    #[must_use]
    pub fn status(mut self, status: TrialStatus) -> Self {
        self.result.status = status;
        self
    }

    /// Set the partition sizes.
    #[must_use]
    pub const fn sizes(mut self, train_size: usize, test_size: usize) -> Self {
        self.result.train_size = train_size;
        self.result.test_size = test_size;
        self
    }

    /// Set how many partitions were drawn.
    #[must_use]
    pub const fn split_attempts(mut self, attempts: usize) -> Self {
        self.result.split_attempts = attempts;
        self
    }

    /// Build the `TrialResult`.
    #[must_use]
    pub fn build(self) -> TrialResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_result_new() {
        let trial = TrialResult::new(1, 0.9, 0.88);
        assert_eq!(trial.run_index(), 1);
        assert!((trial.accuracy() - 0.9).abs() < f64::EPSILON);
        assert!((trial.f1() - 0.88).abs() < f64::EPSILON);
        assert_eq!(trial.status(), &TrialStatus::Ok);
        assert_eq!(trial.split_attempts(), 1);
    }

    #[test]
    fn test_trial_result_builder() {
        let trial = TrialResult::builder(4, 0.5, 0.4)
            .status(TrialStatus::Degenerate {
                reason: "test partition has no spam rows".to_string(),
            })
            .sizes(70, 30)
            .split_attempts(3)
            .build();

        assert!(trial.status().is_degenerate());
        assert_eq!(trial.train_size(), 70);
        assert_eq!(trial.test_size(), 30);
        assert_eq!(trial.split_attempts(), 3);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&TrialStatus::Ok).unwrap();
        assert_eq!(json, r#"{"kind":"ok"}"#);
    }
}
