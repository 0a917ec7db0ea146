//! CART decision tree (Gini impurity, optional depth limit)
//!
//! Nodes live in a flat arena and are grown with an explicit work stack, so
//! unbounded trees on large partitions never recurse deeply.
//!
//! Split search scans each feature of the node's rows. Zeros are counted
//! rather than sorted, which keeps the mostly-empty TF-IDF columns cheap.

use serde::Serialize;

use super::{Classifier, ClassifierFactory};
use crate::features::FeatureMatrix;
use crate::{Error, Result};

/// Hyper-parameters for [`DecisionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionTreeConfig {
    max_depth: Option<usize>,
    min_samples_split: usize,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

impl DecisionTreeConfig {
    /// Config with the given depth limit (`None` = grow until pure).
    #[must_use]
    pub const fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            min_samples_split: 2,
        }
    }

    /// Depth limit.
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Smallest node that may still be split.
    #[must_use]
    pub const fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }
}

/// Tree node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Node {
    /// Terminal node
    Leaf {
        /// Majority label of the training rows that reached it
        prediction: bool,
        /// Number of training rows that reached it
        samples: usize,
    },
    /// Internal node: rows with `x[feature] <= threshold` go left
    Split {
        /// Feature column index
        feature: usize,
        /// Split threshold
        threshold: f64,
        /// Arena index of the left child
        left: usize,
        /// Arena index of the right child
        right: usize,
    },
}

/// Binary CART classifier.
#[derive(Debug, Clone, Default)]
pub struct DecisionTree {
    config: DecisionTreeConfig,
    nodes: Vec<Node>,
    n_features: usize,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    weighted_impurity: f64,
}

struct Task {
    node: usize,
    rows: Vec<usize>,
    depth: usize,
}

impl DecisionTree {
    /// Create an untrained tree.
    #[must_use]
    pub const fn new(config: DecisionTreeConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            n_features: 0,
        }
    }

    /// True once `fit` has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Node arena (root at index 0).
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Total node count.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Leaf count.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path (a lone leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((index, depth)) = stack.pop() {
            match self.nodes.get(index) {
                Some(Node::Split { left, right, .. }) => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Some(Node::Leaf { .. }) => deepest = deepest.max(depth),
                None => {}
            }
        }
        deepest
    }

    /// Predict a single row.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if untrained or `row` has the wrong width.
    pub fn predict_row(&self, row: &[f64]) -> Result<bool> {
        if !self.is_fitted() {
            return Err(Error::InvalidInput("decision tree is not fitted".to_string()));
        }
        if row.len() != self.n_features {
            return Err(Error::InvalidInput(format!(
                "row has {} features, tree was fitted on {}",
                row.len(),
                self.n_features
            )));
        }

        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { prediction, .. } => return Ok(prediction),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    fn grow(&mut self, features: &FeatureMatrix, labels: &[bool]) {
        self.nodes.clear();
        self.nodes.push(Node::Leaf {
            prediction: false,
            samples: 0,
        });

        let mut stack = vec![Task {
            node: 0,
            rows: (0..labels.len()).collect(),
            depth: 0,
        }];

        while let Some(task) = stack.pop() {
            let total = task.rows.len();
            let positives = task.rows.iter().filter(|&&row| labels[row]).count();
            let leaf = Node::Leaf {
                // ties go to the negative class
                prediction: positives * 2 > total,
                samples: total,
            };

            let pure = positives == 0 || positives == total;
            let depth_exhausted = self.config.max_depth.is_some_and(|max| task.depth >= max);
            if pure || depth_exhausted || total < self.config.min_samples_split {
                self.nodes[task.node] = leaf;
                continue;
            }

            let Some(split) = best_split(features, labels, &task.rows) else {
                self.nodes[task.node] = leaf;
                continue;
            };

            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = task
                .rows
                .iter()
                .partition(|&&row| features.get(row, split.feature) <= split.threshold);

            let left = self.nodes.len();
            let right = left + 1;
            self.nodes.push(leaf);
            self.nodes.push(leaf);
            self.nodes[task.node] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };

            stack.push(Task {
                node: right,
                rows: right_rows,
                depth: task.depth + 1,
            });
            stack.push(Task {
                node: left,
                rows: left_rows,
                depth: task.depth + 1,
            });
        }
    }
}

impl Classifier for DecisionTree {
    fn fit(&mut self, features: &FeatureMatrix, labels: &[bool]) -> Result<()> {
        if features.is_empty() {
            return Err(Error::InvalidInput(
                "cannot fit a decision tree on zero rows".to_string(),
            ));
        }
        if features.n_rows() != labels.len() {
            return Err(Error::InvalidInput(format!(
                "{} feature rows but {} labels",
                features.n_rows(),
                labels.len()
            )));
        }

        self.n_features = features.n_cols();
        self.grow(features, labels);
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<bool>> {
        features.rows().map(|row| self.predict_row(row)).collect()
    }
}

/// Builds depth-limited [`DecisionTree`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionTreeFactory {
    config: DecisionTreeConfig,
}

impl DecisionTreeFactory {
    /// Factory for trees with the given depth limit.
    #[must_use]
    pub const fn new(max_depth: Option<usize>) -> Self {
        Self {
            config: DecisionTreeConfig::with_max_depth(max_depth),
        }
    }

    /// Config handed to every tree.
    #[must_use]
    pub const fn config(&self) -> DecisionTreeConfig {
        self.config
    }
}

impl ClassifierFactory for DecisionTreeFactory {
    type Model = DecisionTree;

    fn build(&self) -> DecisionTree {
        DecisionTree::new(self.config)
    }
}

/// Sum of `n * gini` for a node side, from class counts.
#[allow(clippy::cast_precision_loss)]
fn weighted_gini(positives: usize, negatives: usize) -> f64 {
    let n = (positives + negatives) as f64;
    if n == 0.0 {
        return 0.0;
    }
    let p = positives as f64;
    let q = negatives as f64;
    n - (p * p + q * q) / n
}

/// Best Gini split over all features, or `None` if every feature is constant
/// on `rows`. Earlier features win ties.
fn best_split(features: &FeatureMatrix, labels: &[bool], rows: &[usize]) -> Option<SplitCandidate> {
    let total_pos = rows.iter().filter(|&&row| labels[row]).count();
    let total_neg = rows.len() - total_pos;

    let mut best: Option<SplitCandidate> = None;
    let mut entries: Vec<(f64, bool)> = Vec::with_capacity(rows.len());

    for feature in 0..features.n_cols() {
        entries.clear();
        let mut zero_pos = 0usize;
        let mut zero_neg = 0usize;
        for &row in rows {
            let value = features.get(row, feature);
            if value == 0.0 {
                if labels[row] {
                    zero_pos += 1;
                } else {
                    zero_neg += 1;
                }
            } else {
                entries.push((value, labels[row]));
            }
        }
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));

        let below_zero = entries.partition_point(|(value, _)| *value < 0.0);
        let (negative, positive) = entries.split_at(below_zero);
        let single = |&(value, label): &(f64, bool)| (value, usize::from(label), usize::from(!label));
        let zero_group = (zero_pos + zero_neg > 0).then_some((0.0, zero_pos, zero_neg));
        let groups = negative
            .iter()
            .map(single)
            .chain(zero_group)
            .chain(positive.iter().map(single));

        let mut left_pos = 0usize;
        let mut left_neg = 0usize;
        let mut previous: Option<f64> = None;
        for (value, pos, neg) in groups {
            if let Some(prev) = previous {
                if value > prev {
                    let impurity = weighted_gini(left_pos, left_neg)
                        + weighted_gini(total_pos - left_pos, total_neg - left_neg);
                    if best.map_or(true, |b| impurity < b.weighted_impurity) {
                        let mut threshold = prev + (value - prev) / 2.0;
                        if threshold >= value {
                            threshold = prev;
                        }
                        best = Some(SplitCandidate {
                            feature,
                            threshold,
                            weighted_impurity: impurity,
                        });
                    }
                }
            }
            left_pos += pos;
            left_neg += neg;
            previous = Some(value);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureLayout;

    /// Matrix with `width - 1` text columns plus the sender column.
    fn matrix(rows: &[&[f64]]) -> FeatureMatrix {
        let width = rows[0].len();
        let mut m = FeatureMatrix::new(FeatureLayout::new(width - 1, false));
        for row in rows {
            m.push_row(row).unwrap();
        }
        m
    }

    #[test]
    fn test_single_threshold() {
        let x = matrix(&[&[0.0, 1.0], &[0.1, 1.0], &[0.8, 1.0], &[0.9, 1.0]]);
        let y = [false, false, true, true];

        let mut tree = DecisionTree::new(DecisionTreeConfig::default());
        tree.fit(&x, &y).unwrap();

        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(&x).unwrap(), y);
        match tree.nodes()[0] {
            Node::Split { feature, threshold, .. } => {
                assert_eq!(feature, 0);
                assert!((threshold - 0.45).abs() < 1e-12);
            }
            Node::Leaf { .. } => panic!("root should split"),
        }
    }

    #[test]
    fn test_negative_values_sort_before_zero() {
        // sender column uses -1 for unseen senders
        let x = matrix(&[&[-1.0], &[-1.0], &[0.0], &[2.0]]);
        let y = [true, true, false, false];
        let mut tree = DecisionTree::new(DecisionTreeConfig::default());
        tree.fit(&x, &y).unwrap();
        assert_eq!(tree.predict(&x).unwrap(), y);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_xor_needs_depth_two() {
        let x = matrix(&[&[0.0, 0.0], &[0.0, 1.0], &[1.0, 0.0], &[1.0, 1.0]]);
        let y = [false, true, true, false];

        let mut deep = DecisionTree::new(DecisionTreeConfig::default());
        deep.fit(&x, &y).unwrap();
        assert_eq!(deep.predict(&x).unwrap(), y);
        assert_eq!(deep.depth(), 2);

        let mut stump = DecisionTree::new(DecisionTreeConfig::with_max_depth(Some(1)));
        stump.fit(&x, &y).unwrap();
        assert!(stump.depth() <= 1);
    }

    #[test]
    fn test_single_class_training_is_a_leaf() {
        let x = matrix(&[&[0.3, 1.0], &[0.7, 2.0]]);
        let mut tree = DecisionTree::new(DecisionTreeConfig::default());
        tree.fit(&x, &[true, true]).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict(&x).unwrap(), vec![true, true]);
    }

    #[test]
    fn test_constant_features_fall_back_to_majority() {
        let x = matrix(&[&[1.0, 1.0], &[1.0, 1.0], &[1.0, 1.0]]);
        let mut tree = DecisionTree::new(DecisionTreeConfig::default());
        tree.fit(&x, &[true, false, true]).unwrap();
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_row(&[1.0, 1.0]).unwrap(), true);
    }

    #[test]
    fn test_majority_tie_goes_negative() {
        let x = matrix(&[&[1.0], &[1.0]]);
        let mut tree = DecisionTree::new(DecisionTreeConfig::default());
        tree.fit(&x, &[true, false]).unwrap();
        assert_eq!(tree.predict_row(&[1.0]).unwrap(), false);
    }

    #[test]
    fn test_predict_errors() {
        let tree = DecisionTree::new(DecisionTreeConfig::default());
        assert!(matches!(tree.predict_row(&[1.0]), Err(Error::InvalidInput(_))));

        let x = matrix(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let mut tree = DecisionTree::new(DecisionTreeConfig::default());
        tree.fit(&x, &[false, true]).unwrap();
        assert!(tree.predict_row(&[1.0]).is_err());
    }

    #[test]
    fn test_fit_errors() {
        let empty = FeatureMatrix::new(FeatureLayout::new(1, false));
        let mut tree = DecisionTree::new(DecisionTreeConfig::default());
        assert!(tree.fit(&empty, &[]).is_err());

        let x = matrix(&[&[0.0, 1.0]]);
        assert!(tree.fit(&x, &[true, false]).is_err());
    }

    #[test]
    fn test_factory_builds_fresh_trees() {
        let factory = DecisionTreeFactory::new(Some(5));
        let tree = factory.build();
        assert!(!tree.is_fitted());
        assert_eq!(factory.config().max_depth(), Some(5));
    }

    #[test]
    fn test_weighted_gini() {
        assert!(weighted_gini(0, 0).abs() < f64::EPSILON);
        assert!(weighted_gini(4, 0).abs() < f64::EPSILON);
        // n = 4, p = q = 2: 4 - 8/4 = 2
        assert!((weighted_gini(2, 2) - 2.0).abs() < f64::EPSILON);
    }
}
