//! Random train/test partitioning
//!
//! Partitions are uniform samples without replacement and are not stratified
//! by label, so class balance differs between train and test from one trial
//! to the next. Each trial owns a ChaCha8 stream seeded with
//! `base_seed + run_index`, which keeps results independent of the order in
//! which trials execute.

use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Row indices of one train/test partition, each side in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Training row indices
    pub train: Vec<usize>,
    /// Test row indices
    pub test: Vec<usize>,
}

/// Which label classes a set of rows contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassPresence {
    /// At least one spam row
    pub spam: bool,
    /// At least one ham row
    pub ham: bool,
}

impl ClassPresence {
    /// Inspect `rows` of `labels`.
    #[must_use]
    pub fn of(labels: &[bool], rows: &[usize]) -> Self {
        let mut presence = Self {
            spam: false,
            ham: false,
        };
        for &row in rows {
            if labels[row] {
                presence.spam = true;
            } else {
                presence.ham = true;
            }
            if presence.spam && presence.ham {
                break;
            }
        }
        presence
    }

    /// Inspect every label.
    #[must_use]
    pub fn of_all(labels: &[bool]) -> Self {
        Self {
            spam: labels.iter().any(|&l| l),
            ham: labels.iter().any(|&l| !l),
        }
    }

    /// Both classes present.
    #[must_use]
    pub const fn both(&self) -> bool {
        self.spam && self.ham
    }
}

/// Test row count for `n` rows: `round(n * test_size)` clamped to `[1, n - 1]`.
///
/// Callers guarantee `n >= 2`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn test_count(n: usize, test_size: f64) -> usize {
    let raw = (n as f64 * test_size).round() as usize;
    raw.clamp(1, n.saturating_sub(1).max(1))
}

/// Generator for trial `run_index`.
#[must_use]
pub fn trial_rng(base_seed: u64, run_index: usize) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(run_index as u64))
}

/// Draw `n_test` of `n` rows for testing; the rest train.
#[must_use]
pub fn random_partition<R: Rng + ?Sized>(rng: &mut R, n: usize, n_test: usize) -> Partition {
    let mut test = index::sample(rng, n, n_test).into_vec();
    test.sort_unstable();

    let mut in_test = vec![false; n];
    for &row in &test {
        in_test[row] = true;
    }
    let train = (0..n).filter(|&row| !in_test[row]).collect();

    Partition { train, test }
}
