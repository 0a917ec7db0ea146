//! Classifier capability used by the evaluator
//!
//! The evaluator never looks inside a model. It asks a [`ClassifierFactory`]
//! for a fresh, untrained [`Classifier`] per trial, fits it on the training
//! partition and predicts the test partition.
//!
//! Any `Fn() -> C` closure is a factory, which keeps test doubles short:
//!
//! ```rust
//! use spamtree::classifier::{Classifier, ClassifierFactory};
//! use spamtree::features::FeatureMatrix;
//!
//! struct AlwaysSpam;
//!
//! impl Classifier for AlwaysSpam {
//!     fn fit(&mut self, _: &FeatureMatrix, _: &[bool]) -> spamtree::Result<()> {
//!         Ok(())
//!     }
//!     fn predict(&self, features: &FeatureMatrix) -> spamtree::Result<Vec<bool>> {
//!         Ok(vec![true; features.n_rows()])
//!     }
//! }
//!
//! let factory = || AlwaysSpam;
//! let _model = factory.build();
//! ```

mod tree;

pub use tree::{DecisionTree, DecisionTreeConfig, DecisionTreeFactory, Node};

use crate::features::FeatureMatrix;
use crate::Result;

/// A binary classifier over feature rows.
pub trait Classifier {
    /// Train on `features` with row-aligned `labels`.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs are empty or misaligned.
    fn fit(&mut self, features: &FeatureMatrix, labels: &[bool]) -> Result<()>;

    /// Predict one label per row.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is untrained or the row width differs
    /// from the training data.
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<bool>>;
}

/// Produces fresh, untrained classifiers.
pub trait ClassifierFactory {
    /// Model type produced by this factory
    type Model: Classifier;

    /// Build a new untrained model.
    fn build(&self) -> Self::Model;
}

impl<F, C> ClassifierFactory for F
where
    F: Fn() -> C,
    C: Classifier,
{
    type Model = C;

    fn build(&self) -> C {
        self()
    }
}
