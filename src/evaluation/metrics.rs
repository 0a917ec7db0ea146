//! Accuracy and support-weighted F1 from a binary confusion matrix
//!
//! Spam is the positive class. Weighted F1 averages the per-class F1 of spam
//! and ham, each weighted by its support in the true labels.

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// Binary confusion matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    /// Spam predicted as spam
    pub tp: usize,
    /// Ham predicted as spam
    pub fp: usize,
    /// Ham predicted as ham
    pub tn: usize,
    /// Spam predicted as ham
    pub fn_count: usize,
}

impl ConfusionMatrix {
    /// Tally predictions against ground truth.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the slices differ in length.
    pub fn from_predictions(truth: &[bool], predicted: &[bool]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(Error::InvalidInput(format!(
                "{} true labels but {} predictions",
                truth.len(),
                predicted.len()
            )));
        }

        let mut matrix = Self::default();
        for (&actual, &guess) in truth.iter().zip(predicted) {
            match (guess, actual) {
                (true, true) => matrix.tp += 1,
                (true, false) => matrix.fp += 1,
                (false, false) => matrix.tn += 1,
                (false, true) => matrix.fn_count += 1,
            }
        }
        Ok(matrix)
    }

    /// Number of tallied rows.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_count
    }

    /// Fraction of exact matches (0 for an empty matrix).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            (self.tp + self.tn) as f64 / total as f64
        }
    }

    /// Support-weighted F1 over spam and ham.
    ///
    /// A class with no predictions or no support contributes F1 = 0; a class
    /// with no support also carries weight 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn weighted_f1(&self) -> f64 {
        let spam_support = self.tp + self.fn_count;
        let ham_support = self.tn + self.fp;
        let total = spam_support + ham_support;
        if total == 0 {
            return 0.0;
        }

        let spam = class_f1(self.tp, self.tp + self.fp, spam_support);
        let ham = class_f1(self.tn, self.tn + self.fn_count, ham_support);

        (spam * spam_support as f64 + ham * ham_support as f64) / total as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn class_f1(true_positives: usize, predicted: usize, support: usize) -> f64 {
    let precision = if predicted > 0 {
        true_positives as f64 / predicted as f64
    } else {
        0.0
    };
    let recall = if support > 0 {
        true_positives as f64 / support as f64
    } else {
        0.0
    };
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "acc={:.4} f1={:.4} (tp={} fp={} tn={} fn={})",
            self.accuracy(),
            self.weighted_f1(),
            self.tp,
            self.fp,
            self.tn,
            self.fn_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let labels = [false, false, true, true];
        let m = ConfusionMatrix::from_predictions(&labels, &labels).unwrap();
        assert!((m.accuracy() - 1.0).abs() < 1e-9);
        assert!((m.weighted_f1() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_wrong() {
        let m = ConfusionMatrix::from_predictions(&[false, false, true, true], &[true, true, false, false])
            .unwrap();
        assert!(m.accuracy().abs() < 1e-9);
        assert!(m.weighted_f1().abs() < 1e-9);
    }

    #[test]
    fn test_mixed_weighted_f1() {
        // 3 TP, 1 FP, 2 TN, 1 FN
        let predicted = [true, true, true, true, false, false, false];
        let truth = [true, true, true, false, false, false, true];
        let m = ConfusionMatrix::from_predictions(&truth, &predicted).unwrap();
        assert_eq!((m.tp, m.fp, m.tn, m.fn_count), (3, 1, 2, 1));
        assert!((m.accuracy() - 5.0 / 7.0).abs() < 1e-9);

        // spam: p = 3/4, r = 3/4, f1 = 0.75, support 4
        // ham:  p = 2/3, r = 2/3, f1 = 2/3,  support 3
        let expected = (0.75 * 4.0 + (2.0 / 3.0) * 3.0) / 7.0;
        assert!((m.weighted_f1() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_majority_predictor_on_imbalanced_truth() {
        // Always predicting ham on 3 ham / 1 spam
        let m = ConfusionMatrix::from_predictions(&[false, false, false, true], &[false; 4]).unwrap();
        assert!((m.accuracy() - 0.75).abs() < 1e-9);
        // ham f1 = 2 * 0.75 * 1 / 1.75 = 6/7, weight 3/4; spam f1 = 0
        let expected = (6.0 / 7.0) * 0.75;
        assert!((m.weighted_f1() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_single_row() {
        let hit = ConfusionMatrix::from_predictions(&[true], &[true]).unwrap();
        assert!((hit.accuracy() - 1.0).abs() < 1e-9);
        assert!((hit.weighted_f1() - 1.0).abs() < 1e-9);

        let miss = ConfusionMatrix::from_predictions(&[true], &[false]).unwrap();
        assert!(miss.accuracy().abs() < 1e-9);
        assert!(miss.weighted_f1().abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_mismatch() {
        let m = ConfusionMatrix::from_predictions(&[], &[]).unwrap();
        assert!(m.accuracy().abs() < 1e-9);
        assert!(m.weighted_f1().abs() < 1e-9);
        assert!(ConfusionMatrix::from_predictions(&[true], &[]).is_err());
    }
}
