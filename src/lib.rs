//! # spamtree: Decision-Tree Stability on Spam/Ham Email
//!
//! spamtree repeatedly trains and scores a decision tree on randomized
//! train/test partitions of an email dataset and reports how stable the
//! results are: per-run accuracy and weighted F1, descriptive statistics,
//! accuracy z-scores and a short rule-based verdict.
//!
//! ## Pipeline
//!
//! - **Features**: TF-IDF over the body, label-encoded sender, optional body
//!   length, in a fixed column layout
//! - **Evaluation**: N independent random splits, a fresh classifier each
//! - **Statistics**: mean/std/quartiles, z-score per run
//! - **Conclusions**: fixed thresholds on mean and spread of accuracy
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use spamtree::config::Config;
//! use spamtree::dataset::Dataset;
//!
//! let dataset = Dataset::load_csv("emails__dataset.csv")?;
//! let config = Config::builder().num_runs(100).seed(42).build()?;
//!
//! let report = spamtree::pipeline::run(&dataset, &config)?;
//! for line in report.conclusions() {
//!     println!("{line}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Caveat
//!
//! By default the vectorizer and sender encoder are fitted on the whole
//! corpus before any split, so reported accuracy includes test-set leakage.
//! Use [`config::FeatureScope::PerSplit`] to refit per training partition.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod classifier;
pub mod conclusion;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod pipeline;
pub mod results;
pub mod stats;

pub use error::{Error, Result};
