//! Rule-based reliability statements
//!
//! A two-row decision table over mean and spread of test accuracy. Exactly
//! one variation statement and one accuracy statement follow the numeric
//! summary, always in that order. No hysteresis: the same inputs always give
//! the same statements.
//!
//! | condition               | statement                                   |
//! |-------------------------|---------------------------------------------|
//! | `std > variation`       | [`HIGH_VARIATION`]                          |
//! | `std <= variation`      | [`STABLE`]                                  |
//! | `mean < accuracy`       | [`LOW_ACCURACY`]                            |
//! | `mean >= accuracy`      | [`ACCEPTABLE_ACCURACY`]                     |

use serde::{Deserialize, Serialize};

/// Emitted when the accuracy spread exceeds the variation threshold
pub const HIGH_VARIATION: &str =
    "considerable variation across runs; model is sensitive to training data";
/// Emitted when the accuracy spread is within the variation threshold
pub const STABLE: &str = "model shows stable results across runs";
/// Emitted when mean accuracy is under the accuracy threshold
pub const LOW_ACCURACY: &str = "mean accuracy is low; consider tuning or alternative techniques";
/// Emitted when mean accuracy reaches the accuracy threshold
pub const ACCEPTABLE_ACCURACY: &str = "mean accuracy is acceptable for this data";

/// Decision-table thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Spread above this is "considerable variation" (strict `>`)
    pub variation: f64,
    /// Mean below this is "low" (strict `<`)
    pub accuracy: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            variation: 0.05,
            accuracy: 0.8,
        }
    }
}

impl Thresholds {
    /// Apply the table to a mean/std pair.
    #[must_use]
    pub fn evaluate(&self, mean_accuracy: f64, std_accuracy: f64) -> Vec<String> {
        let variation = if std_accuracy > self.variation {
            HIGH_VARIATION
        } else {
            STABLE
        };
        let accuracy = if mean_accuracy < self.accuracy {
            LOW_ACCURACY
        } else {
            ACCEPTABLE_ACCURACY
        };

        vec![
            format!(
                "mean accuracy was {mean_accuracy:.4} with a standard deviation of {std_accuracy:.4}"
            ),
            variation.to_string(),
            accuracy.to_string(),
        ]
    }
}

/// Statements for a mean/std pair under the default thresholds.
///
/// ```rust
/// use spamtree::conclusion::{conclusions, STABLE, ACCEPTABLE_ACCURACY};
///
/// let lines = conclusions(0.8, 0.05);
/// assert_eq!(lines[1], STABLE);
/// assert_eq!(lines[2], ACCEPTABLE_ACCURACY);
/// ```
#[must_use]
pub fn conclusions(mean_accuracy: f64, std_accuracy: f64) -> Vec<String> {
    Thresholds::default().evaluate(mean_accuracy, std_accuracy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_summary_first() {
        let lines = conclusions(0.912_345, 0.012_34);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "mean accuracy was 0.9123 with a standard deviation of 0.0123"
        );
    }

    #[test]
    fn test_high_variation_low_accuracy() {
        let lines = conclusions(0.65, 0.08);
        assert_eq!(lines[1], HIGH_VARIATION);
        assert_eq!(lines[2], LOW_ACCURACY);
    }

    #[test]
    fn test_stable_acceptable() {
        let lines = conclusions(0.95, 0.01);
        assert_eq!(lines[1], STABLE);
        assert_eq!(lines[2], ACCEPTABLE_ACCURACY);
    }

    #[test]
    fn test_variation_boundary_is_stable() {
        assert_eq!(conclusions(0.9, 0.05)[1], STABLE);
        assert_eq!(conclusions(0.9, 0.050_000_1)[1], HIGH_VARIATION);
    }

    #[test]
    fn test_accuracy_boundary_is_acceptable() {
        assert_eq!(conclusions(0.8, 0.0)[2], ACCEPTABLE_ACCURACY);
        assert_eq!(conclusions(0.799_999_9, 0.0)[2], LOW_ACCURACY);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(conclusions(0.73, 0.061), conclusions(0.73, 0.061));
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = Thresholds {
            variation: 0.01,
            accuracy: 0.95,
        };
        let lines = strict.evaluate(0.9, 0.02);
        assert_eq!(lines[1], HIGH_VARIATION);
        assert_eq!(lines[2], LOW_ACCURACY);
    }
}
