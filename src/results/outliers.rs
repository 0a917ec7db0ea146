//! Outlier run selection
//!
//! Picks the `k` runs whose accuracy sits furthest from the mean, measured by
//! `|z|`. A bounded min-heap keeps the current best `k`, so the scan is
//! O(N log k) instead of a full sort.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::ScoredTrial;
use crate::{Error, Result};

// Min-heap item: smallest |z| at the top so it can be evicted first
#[derive(Debug)]
struct MinHeapItem {
    value: f64,
    index: usize,
}

impl PartialEq for MinHeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.value.partial_cmp(&other.value) == Some(Ordering::Equal)
    }
}

impl Eq for MinHeapItem {}

impl Ord for MinHeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse comparison for min-heap (smallest at top)
        other
            .value
            .partial_cmp(&self.value)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for MinHeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The `k` runs with the largest `|z|`, most extreme first.
///
/// Runs without a z-score are skipped, so an evaluation whose accuracy never
/// varied has no outliers. Equal `|z|` keeps the earlier run first.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if `k` is zero.
pub fn top_outliers(rows: &[ScoredTrial], k: usize) -> Result<Vec<&ScoredTrial>> {
    if k == 0 {
        return Err(Error::InvalidInput("k must be greater than 0".to_string()));
    }

    let mut heap: BinaryHeap<MinHeapItem> = BinaryHeap::with_capacity(k);
    for (index, row) in rows.iter().enumerate() {
        let Some(z) = row.z_score() else { continue };
        let value = z.abs();
        if heap.len() < k {
            heap.push(MinHeapItem { value, index });
        } else if let Some(top) = heap.peek() {
            if value > top.value {
                heap.pop();
                heap.push(MinHeapItem { value, index });
            }
        }
    }

    let mut result: Vec<_> = heap.into_vec();
    result.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });
    Ok(result.into_iter().map(|item| &rows[item.index]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::TrialResult;

    fn rows(z_scores: &[Option<f64>]) -> Vec<ScoredTrial> {
        z_scores
            .iter()
            .enumerate()
            .map(|(i, z)| ScoredTrial::new(TrialResult::new(i + 1, 0.9, 0.9), *z))
            .collect()
    }

    #[test]
    fn test_top_outliers_by_absolute_z() {
        let rows = rows(&[Some(0.1), Some(-2.5), Some(1.0), Some(2.0), Some(-0.3)]);
        let picked: Vec<usize> = top_outliers(&rows, 2)
            .unwrap()
            .iter()
            .map(|row| row.run_index())
            .collect();
        assert_eq!(picked, vec![2, 4]);
    }

    #[test]
    fn test_top_outliers_k_larger_than_rows() {
        let rows = rows(&[Some(0.5), Some(-1.5)]);
        let picked = top_outliers(&rows, 10).unwrap();
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].run_index(), 2);
    }

    #[test]
    fn test_top_outliers_skips_undefined() {
        let rows = rows(&[None, None, None]);
        assert!(top_outliers(&rows, 2).unwrap().is_empty());
    }

    #[test]
    fn test_top_outliers_k_zero_fails() {
        let rows = rows(&[Some(1.0)]);
        assert!(matches!(top_outliers(&rows, 0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_min_heap_item_ord() {
        let small = MinHeapItem { value: 1.0, index: 0 };
        let large = MinHeapItem { value: 2.0, index: 1 };
        // Reversed: smaller value ranks greater so it sits on top
        assert_eq!(small.cmp(&large), Ordering::Greater);
        assert_eq!(large.cmp(&small), Ordering::Less);
        assert_eq!(small, MinHeapItem { value: 1.0, index: 5 });
    }
}
