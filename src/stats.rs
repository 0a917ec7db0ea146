//! Descriptive statistics over a `ResultSet`
//!
//! Accuracy spread uses the population standard deviation (divisor N); the
//! per-run z-scores are built from it, so for any evaluation whose accuracy
//! varied they have mean 0 and population standard deviation 1.
//!
//! The descriptive summary additionally reports the sample standard
//! deviation (divisor N-1), which is what tabular `describe()` output shows.

use std::fmt;

use serde::Serialize;

use crate::results::{top_outliers, ResultSet, ScoredTrial};
use crate::{Error, Result};

/// Standard deviations at or below this are treated as zero.
pub const ZERO_SPREAD: f64 = 1e-12;

/// count / mean / std / min / quartiles / max of one metric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation (divisor N)
    pub std: f64,
    /// Sample standard deviation (divisor N-1), `None` below two values
    pub sample_std: Option<f64>,
    /// Smallest value
    pub min: f64,
    /// 25th percentile
    pub q1: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
    /// Largest value
    pub max: f64,
}

impl ColumnSummary {
    /// Summarize a column. Quartiles interpolate linearly between the two
    /// closest ranks.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for an empty column.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::InvalidInput(
                "cannot summarize an empty column".to_string(),
            ));
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = mean(values);
        let std = population_std(values, mean);
        let sample_std = (values.len() > 1).then(|| sample_std(values, mean));

        Ok(Self {
            count: values.len(),
            mean,
            std,
            sample_std,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Arithmetic mean, 0 for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a precomputed mean.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn population_std(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[allow(clippy::cast_precision_loss)]
fn sample_std(values: &[f64], mean: f64) -> f64 {
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// `(v - mean) / std` for every value; all `None` when the spread is zero.
#[must_use]
pub fn z_scores(values: &[f64]) -> Vec<Option<f64>> {
    let mean = mean(values);
    let std = population_std(values, mean);
    if std <= ZERO_SPREAD {
        return vec![None; values.len()];
    }
    values.iter().map(|v| Some((v - mean) / std)).collect()
}

/// Aggregate statistics of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Mean test accuracy
    pub mean_accuracy: f64,
    /// Population standard deviation of test accuracy
    pub std_accuracy: f64,
    /// Mean weighted F1
    pub mean_f1: f64,
    /// Population standard deviation of weighted F1
    pub std_f1: f64,
    /// Full accuracy column summary
    pub accuracy: ColumnSummary,
    /// Full F1 column summary
    pub f1: ColumnSummary,
    /// Trials flagged as degenerate splits
    pub degenerate_runs: usize,
}

/// `(run_index, accuracy)` points plus the mean, ready for a line plot with
/// a reference line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracySeries {
    /// Points in run order
    pub points: Vec<(usize, f64)>,
    /// Mean accuracy for the reference line
    pub mean: f64,
}

/// Result set annotated with z-scores, plus its summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResults {
    base_seed: u64,
    rows: Vec<ScoredTrial>,
    summary: SummaryStats,
}

impl AggregatedResults {
    /// Seed the evaluation's partitions were derived from.
    #[must_use]
    pub const fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Annotated trials in run order.
    #[must_use]
    pub fn rows(&self) -> &[ScoredTrial] {
        &self.rows
    }

    /// Summary statistics.
    #[must_use]
    pub const fn summary(&self) -> &SummaryStats {
        &self.summary
    }

    /// The `k` runs furthest from the mean accuracy.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `k` is zero.
    pub fn outliers(&self, k: usize) -> Result<Vec<&ScoredTrial>> {
        top_outliers(&self.rows, k)
    }

    /// Accuracy per run with its mean.
    #[must_use]
    pub fn accuracy_series(&self) -> AccuracySeries {
        AccuracySeries {
            points: self
                .rows
                .iter()
                .map(|row| (row.run_index(), row.accuracy()))
                .collect(),
            mean: self.summary.mean_accuracy,
        }
    }
}

/// Compute summary statistics and per-run accuracy z-scores.
///
/// ```rust
/// use spamtree::results::{ResultSet, TrialResult};
/// use spamtree::stats::aggregate;
///
/// let results = ResultSet::new(0, vec![
///     TrialResult::new(1, 0.90, 0.89),
///     TrialResult::new(2, 0.80, 0.78),
/// ]);
/// let aggregated = aggregate(results)?;
/// assert!((aggregated.summary().mean_accuracy - 0.85).abs() < 1e-12);
/// assert!((aggregated.rows()[0].z_score().unwrap() - 1.0).abs() < 1e-12);
/// # Ok::<(), spamtree::Error>(())
/// ```
///
/// # Errors
///
/// Returns `Error::InvalidInput` for an empty result set.
pub fn aggregate(results: ResultSet) -> Result<AggregatedResults> {
    let accuracies = results.accuracies();
    let f1_scores = results.f1_scores();

    let accuracy = ColumnSummary::from_values(&accuracies)?;
    let f1 = ColumnSummary::from_values(&f1_scores)?;

    let summary = SummaryStats {
        mean_accuracy: accuracy.mean,
        std_accuracy: accuracy.std,
        mean_f1: f1.mean,
        std_f1: f1.std,
        accuracy,
        f1,
        degenerate_runs: results.degenerate_count(),
    };

    let base_seed = results.base_seed();
    let rows = results
        .into_trials()
        .into_iter()
        .zip(z_scores(&accuracies))
        .map(|(trial, z)| ScoredTrial::new(trial, z))
        .collect();

    Ok(AggregatedResults {
        base_seed,
        rows,
        summary,
    })
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sample = |s: Option<f64>| s.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));

        writeln!(f, "{:<10} {:>10} {:>10}", "", "accuracy", "f1")?;
        writeln!(f, "{:<10} {:>10} {:>10}", "count", self.accuracy.count, self.f1.count)?;
        for (label, a, b) in [
            ("mean", self.accuracy.mean, self.f1.mean),
            ("std", self.accuracy.std, self.f1.std),
        ] {
            writeln!(f, "{label:<10} {a:>10.4} {b:>10.4}")?;
        }
        writeln!(
            f,
            "{:<10} {:>10} {:>10}",
            "std (n-1)",
            sample(self.accuracy.sample_std),
            sample(self.f1.sample_std)
        )?;
        for (label, a, b) in [
            ("min", self.accuracy.min, self.f1.min),
            ("25%", self.accuracy.q1, self.f1.q1),
            ("50%", self.accuracy.median, self.f1.median),
            ("75%", self.accuracy.q3, self.f1.q3),
            ("max", self.accuracy.max, self.f1.max),
        ] {
            writeln!(f, "{label:<10} {a:>10.4} {b:>10.4}")?;
        }
        write!(f, "degenerate runs: {}", self.degenerate_runs)
    }
}

impl fmt::Display for AggregatedResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>5} {:>10} {:>10} {:>10}", "run", "accuracy", "f1", "z-score")?;
        for row in &self.rows {
            let z = row
                .z_score()
                .map_or_else(|| "undefined".to_string(), |z| format!("{z:.4}"));
            let flag = if row.trial().status().is_degenerate() { " *" } else { "" };
            writeln!(
                f,
                "{:>5} {:>10.4} {:>10.4} {:>10}{flag}",
                row.run_index(),
                row.accuracy(),
                row.f1(),
                z
            )?;
        }
        Ok(())
    }
}
