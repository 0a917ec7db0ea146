//! Evaluation configuration
//!
//! The user-facing options are run count, test fraction and tree depth, each
//! restricted to the ranges the report is calibrated for. Everything else has
//! a default that fits features on the full corpus.
//!
//! ```rust
//! use spamtree::config::Config;
//!
//! let config = Config::builder()
//!     .num_runs(100)
//!     .test_size(0.25)
//!     .max_depth(Some(10))
//!     .seed(42)
//!     .build()?;
//! assert_eq!(config.num_runs(), 100);
//! # Ok::<(), spamtree::Error>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Smallest accepted run count
pub const MIN_RUNS: usize = 50;
/// Largest accepted run count
pub const MAX_RUNS: usize = 200;
/// Default run count
pub const DEFAULT_RUNS: usize = 50;

/// Smallest accepted test fraction
pub const MIN_TEST_SIZE: f64 = 0.1;
/// Largest accepted test fraction
pub const MAX_TEST_SIZE: f64 = 0.5;
/// Default test fraction
pub const DEFAULT_TEST_SIZE: f64 = 0.3;
/// Test fractions must sit on this grid
pub const TEST_SIZE_STEP: f64 = 0.05;

/// Bounded depths a tree may be limited to (`None` means unbounded)
pub const ALLOWED_MAX_DEPTHS: [usize; 4] = [5, 10, 20, 50];

/// Default TF-IDF vocabulary cap
pub const DEFAULT_VOCABULARY_SIZE: usize = 500;
/// Default number of re-draws for a single-class training partition
pub const DEFAULT_MAX_SPLIT_RETRIES: usize = 10;

const GRID_TOLERANCE: f64 = 1e-9;

/// How trials are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// One trial after another on the calling thread
    Sequential,
    /// Trials fan out over the rayon pool (requires the `parallel` feature)
    Parallel,
}

impl Default for Execution {
    fn default() -> Self {
        if cfg!(feature = "parallel") {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

/// Which rows the vectorizer and sender encoder are fitted on.
///
/// `FullCorpus` fits once over every record before any split, so vocabulary
/// and idf weights see test rows. That is the default way of measuring
/// accuracy and it inflates the numbers relative to a leakage-free
/// setup. `PerSplit` refits on each training partition instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureScope {
    /// Fit once on the whole corpus
    #[default]
    FullCorpus,
    /// Refit on every training partition
    PerSplit,
}

/// Validated evaluation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    num_runs: usize,
    test_size: f64,
    max_depth: Option<usize>,
    vocabulary_size: usize,
    seed: Option<u64>,
    execution: Execution,
    feature_scope: FeatureScope,
    max_split_retries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_runs: DEFAULT_RUNS,
            test_size: DEFAULT_TEST_SIZE,
            max_depth: None,
            vocabulary_size: DEFAULT_VOCABULARY_SIZE,
            seed: None,
            execution: Execution::default(),
            feature_scope: FeatureScope::default(),
            max_split_retries: DEFAULT_MAX_SPLIT_RETRIES,
        }
    }
}

impl Config {
    /// Create a builder seeded with the defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse a JSON document and validate it. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed input and `Error::Configuration`
    /// for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every option against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_RUNS..=MAX_RUNS).contains(&self.num_runs) {
            return Err(Error::Configuration(format!(
                "num_runs must be in [{MIN_RUNS}, {MAX_RUNS}], got {}",
                self.num_runs
            )));
        }

        if !(MIN_TEST_SIZE..=MAX_TEST_SIZE).contains(&self.test_size) {
            return Err(Error::Configuration(format!(
                "test_size must be in [{MIN_TEST_SIZE}, {MAX_TEST_SIZE}], got {}",
                self.test_size
            )));
        }

        let steps = self.test_size / TEST_SIZE_STEP;
        if (steps - steps.round()).abs() > GRID_TOLERANCE {
            return Err(Error::Configuration(format!(
                "test_size must be a multiple of {TEST_SIZE_STEP}, got {}",
                self.test_size
            )));
        }

        if let Some(depth) = self.max_depth {
            if !ALLOWED_MAX_DEPTHS.contains(&depth) {
                return Err(Error::Configuration(format!(
                    "max_depth must be unbounded or one of {ALLOWED_MAX_DEPTHS:?}, got {depth}"
                )));
            }
        }

        if self.vocabulary_size == 0 {
            return Err(Error::Configuration(
                "vocabulary_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Number of train/evaluate trials.
    #[must_use]
    pub const fn num_runs(&self) -> usize {
        self.num_runs
    }

    /// Fraction of rows held out for testing in each trial.
    #[must_use]
    pub const fn test_size(&self) -> f64 {
        self.test_size
    }

    /// Tree depth limit, `None` for unbounded.
    #[must_use]
    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// TF-IDF vocabulary cap (K).
    #[must_use]
    pub const fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Base seed for partitioning, if fixed.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Trial scheduling mode.
    #[must_use]
    pub const fn execution(&self) -> Execution {
        self.execution
    }

    /// Fitting scope for text and sender features.
    #[must_use]
    pub const fn feature_scope(&self) -> FeatureScope {
        self.feature_scope
    }

    /// Re-draws allowed when a training partition holds one class.
    #[must_use]
    pub const fn max_split_retries(&self) -> usize {
        self.max_split_retries
    }
}

/// Builder for `Config`.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the run count.
    #[must_use]
    pub const fn num_runs(mut self, num_runs: usize) -> Self {
        self.config.num_runs = num_runs;
        self
    }

    /// Set the test fraction.
    #[must_use]
    pub const fn test_size(mut self, test_size: f64) -> Self {
        self.config.test_size = test_size;
        self
    }

    /// Set the tree depth limit.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the TF-IDF vocabulary cap.
    #[must_use]
    pub const fn vocabulary_size(mut self, vocabulary_size: usize) -> Self {
        self.config.vocabulary_size = vocabulary_size;
        self
    }

    /// Fix the base seed so every partition is reproducible.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Set the trial scheduling mode.
    #[must_use]
    pub const fn execution(mut self, execution: Execution) -> Self {
        self.config.execution = execution;
        self
    }

    /// Set the feature fitting scope.
    #[must_use]
    pub const fn feature_scope(mut self, feature_scope: FeatureScope) -> Self {
        self.config.feature_scope = feature_scope;
        self
    }

    /// Set the re-draw budget for single-class training partitions.
    #[must_use]
    pub const fn max_split_retries(mut self, retries: usize) -> Self {
        self.config.max_split_retries = retries;
        self
    }

    /// Validate and build the `Config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for out-of-range values.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_runs(), 50);
        assert!((config.test_size() - 0.3).abs() < f64::EPSILON);
        assert_eq!(config.max_depth(), None);
        assert_eq!(config.vocabulary_size(), 500);
        assert_eq!(config.feature_scope(), FeatureScope::FullCorpus);
    }

    #[test]
    fn test_run_count_bounds() {
        assert!(Config::builder().num_runs(50).build().is_ok());
        assert!(Config::builder().num_runs(200).build().is_ok());
        assert!(matches!(
            Config::builder().num_runs(49).build(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            Config::builder().num_runs(201).build(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_test_size_range_and_grid() {
        for ok in [0.1, 0.15, 0.3, 0.45, 0.5] {
            assert!(Config::builder().test_size(ok).build().is_ok(), "{ok}");
        }
        for bad in [0.05, 0.55, 0.33, f64::NAN] {
            assert!(Config::builder().test_size(bad).build().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_max_depth_choices() {
        assert!(Config::builder().max_depth(None).build().is_ok());
        for depth in ALLOWED_MAX_DEPTHS {
            assert!(Config::builder().max_depth(Some(depth)).build().is_ok());
        }
        let err = Config::builder().max_depth(Some(7)).build().unwrap_err();
        assert!(err.to_string().contains("max_depth"));
    }

    #[test]
    fn test_zero_vocabulary_rejected() {
        assert!(Config::builder().vocabulary_size(0).build().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"num_runs": 120, "seed": 7}"#).unwrap();
        assert_eq!(config.num_runs(), 120);
        assert_eq!(config.seed(), Some(7));
        assert!((config.test_size() - DEFAULT_TEST_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_json_validates() {
        let err = Config::from_json(r#"{"num_runs": 10}"#).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = Config::from_json("not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_enum_serde_names() {
        let config = Config::from_json(
            r#"{"execution": "sequential", "feature_scope": "per_split"}"#,
        )
        .unwrap();
        assert_eq!(config.execution(), Execution::Sequential);
        assert_eq!(config.feature_scope(), FeatureScope::PerSplit);
    }
}
