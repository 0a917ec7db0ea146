//! Repeated train/test evaluation
//!
//! Each trial draws its own random partition (no stratification), fits a
//! fresh classifier on the training rows and scores predictions on the test
//! rows. Partitions come from a per-trial ChaCha8 stream derived from one
//! base seed, so sequential and parallel runs agree for the same seed.

mod evaluator;
mod metrics;
mod split;

pub use evaluator::Evaluator;
pub use metrics::ConfusionMatrix;
pub use split::{random_partition, test_count, trial_rng, ClassPresence, Partition};
