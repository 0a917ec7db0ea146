//! Monte Carlo train/evaluate loop

use tracing::{debug, info, warn};

use super::metrics::ConfusionMatrix;
use super::split::{random_partition, test_count, trial_rng, ClassPresence, Partition};
use crate::classifier::{Classifier, ClassifierFactory};
use crate::config::{Config, Execution};
use crate::dataset::{Dataset, EmailRecord};
use crate::features::{FeatureBuilder, LabeledMatrix};
use crate::results::{ResultSet, TrialResult, TrialStatus};
use crate::{Error, Result};

/// Runs N independent train/test trials.
///
/// ```rust
/// use spamtree::classifier::DecisionTreeFactory;
/// use spamtree::dataset::{Dataset, EmailRecord};
/// use spamtree::evaluation::Evaluator;
/// use spamtree::features::FeatureBuilder;
///
/// let dataset = Dataset::new(
///     vec![
///         EmailRecord::new("win free money", "promo@spam.biz", true),
///         EmailRecord::new("team lunch friday", "ana@corp.com", false),
///         EmailRecord::new("free prize winner", "promo@spam.biz", true),
///         EmailRecord::new("budget review notes", "ben@corp.com", false),
///     ],
///     false,
/// );
/// let (_, matrix) = FeatureBuilder::new(50).build(&dataset)?;
///
/// let results = Evaluator::new(5, 0.25)?
///     .with_seed(7)
///     .evaluate(&matrix, &DecisionTreeFactory::new(None))?;
/// assert_eq!(results.len(), 5);
/// # Ok::<(), spamtree::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluator {
    num_runs: usize,
    test_size: f64,
    seed: Option<u64>,
    execution: Execution,
    max_split_retries: usize,
}

/// Truth and prediction vectors of one trial's test partition.
type TrialOutcome = (Vec<bool>, Vec<bool>);

impl Evaluator {
    /// Create an evaluator running `num_runs` trials with test fraction
    /// `test_size`, sequentially and without a fixed seed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `num_runs` is zero or `test_size` is
    /// not strictly between 0 and 1.
    pub fn new(num_runs: usize, test_size: f64) -> Result<Self> {
        if num_runs == 0 {
            return Err(Error::InvalidInput("num_runs must be at least 1".to_string()));
        }
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(Error::InvalidInput(format!(
                "test_size must be in (0, 1), got {test_size}"
            )));
        }

        Ok(Self {
            num_runs,
            test_size,
            seed: None,
            execution: Execution::Sequential,
            max_split_retries: crate::config::DEFAULT_MAX_SPLIT_RETRIES,
        })
    }

    /// Create an evaluator from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `config` does not validate.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let evaluator = Self::new(config.num_runs(), config.test_size())?
            .with_execution(config.execution())
            .with_max_split_retries(config.max_split_retries());
        Ok(match config.seed() {
            Some(seed) => evaluator.with_seed(seed),
            None => evaluator,
        })
    }

    /// Fix the base seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose sequential or parallel trials.
    #[must_use]
    pub const fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Set how often a single-class training partition is re-drawn.
    #[must_use]
    pub const fn with_max_split_retries(mut self, retries: usize) -> Self {
        self.max_split_retries = retries;
        self
    }

    /// Number of trials.
    #[must_use]
    pub const fn num_runs(&self) -> usize {
        self.num_runs
    }

    /// Test fraction.
    #[must_use]
    pub const fn test_size(&self) -> f64 {
        self.test_size
    }

    /// Evaluate on a matrix fitted once over the whole corpus.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for fewer than two rows and propagates
    /// classifier errors.
    pub fn evaluate<F>(&self, data: &LabeledMatrix, factory: &F) -> Result<ResultSet>
    where
        F: ClassifierFactory + Sync,
    {
        self.run_trials(data.labels(), |partition| {
            let train = data.select(&partition.train);
            let test = data.select(&partition.test);
            let predicted = fit_and_predict(factory, &train, &test)?;
            Ok((test.labels().to_vec(), predicted))
        })
    }

    /// Evaluate with vectorizer and encoder refitted on each training
    /// partition. Test senders unseen in training get the reserved id.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for fewer than two records and
    /// propagates feature and classifier errors.
    pub fn evaluate_per_split<F>(
        &self,
        dataset: &Dataset,
        builder: &FeatureBuilder,
        factory: &F,
    ) -> Result<ResultSet>
    where
        F: ClassifierFactory + Sync,
    {
        let records = dataset.records();
        let labels = dataset.labels();

        self.run_trials(&labels, |partition| {
            let pick = |rows: &[usize]| -> Vec<EmailRecord> {
                rows.iter().map(|&row| records[row].clone()).collect()
            };
            let train_records = pick(&partition.train);
            let test_records = pick(&partition.test);

            let fitted = builder.fit(&train_records)?;
            let train = fitted.transform(&train_records)?;
            let test = fitted.transform_lenient(&test_records)?;

            let predicted = fit_and_predict(factory, &train, &test)?;
            Ok((test.labels().to_vec(), predicted))
        })
    }

    fn run_trials<T>(&self, labels: &[bool], trial: T) -> Result<ResultSet>
    where
        T: Fn(&Partition) -> Result<TrialOutcome> + Sync,
    {
        let n = labels.len();
        if n < 2 {
            return Err(Error::InvalidInput(format!(
                "need at least 2 rows to split into train and test, got {n}"
            )));
        }

        let base_seed = self.seed.unwrap_or_else(rand::random);
        let n_test = test_count(n, self.test_size);
        let dataset_classes = ClassPresence::of_all(labels);

        info!(
            runs = self.num_runs,
            rows = n,
            test_rows = n_test,
            base_seed,
            execution = ?self.execution,
            "starting evaluation"
        );

        let run_one = |run_index: usize| -> Result<TrialResult> {
            let mut rng = trial_rng(base_seed, run_index);
            let mut partition = random_partition(&mut rng, n, n_test);
            let mut attempts = 1;

            // Re-draw only when a better split can exist
            while dataset_classes.both()
                && !ClassPresence::of(labels, &partition.train).both()
                && attempts <= self.max_split_retries
            {
                partition = random_partition(&mut rng, n, n_test);
                attempts += 1;
            }

            let status = classify_partition(labels, &partition, dataset_classes, attempts);
            let (truth, predicted) = trial(&partition)?;
            let confusion = ConfusionMatrix::from_predictions(&truth, &predicted)?;

            if let TrialStatus::Degenerate { reason } = &status {
                warn!(run_index, attempts, %reason, "degenerate split");
            }
            debug!(run_index, attempts, %confusion, "trial finished");

            Ok(TrialResult::builder(run_index, confusion.accuracy(), confusion.weighted_f1())
                .status(status)
                .sizes(partition.train.len(), partition.test.len())
                .split_attempts(attempts)
                .build())
        };

        let trials: Result<Vec<TrialResult>> = match self.execution {
            #[cfg(feature = "parallel")]
            Execution::Parallel => {
                use rayon::prelude::*;
                (1..=self.num_runs).into_par_iter().map(run_one).collect()
            }
            _ => (1..=self.num_runs).map(run_one).collect(),
        };

        let results = ResultSet::new(base_seed, trials?);
        info!(
            runs = results.len(),
            degenerate = results.degenerate_count(),
            "evaluation finished"
        );
        Ok(results)
    }
}

fn fit_and_predict<F: ClassifierFactory>(
    factory: &F,
    train: &LabeledMatrix,
    test: &LabeledMatrix,
) -> Result<Vec<bool>> {
    let mut model = factory.build();
    model.fit(train.features(), train.labels())?;
    model.predict(test.features())
}

fn classify_partition(
    labels: &[bool],
    partition: &Partition,
    dataset_classes: ClassPresence,
    attempts: usize,
) -> TrialStatus {
    if !dataset_classes.both() {
        return TrialStatus::Degenerate {
            reason: "dataset holds a single label class".to_string(),
        };
    }

    let train = ClassPresence::of(labels, &partition.train);
    if !train.both() {
        return TrialStatus::Degenerate {
            reason: format!(
                "training partition has no {} rows after {attempts} draws",
                missing_class(train)
            ),
        };
    }

    let test = ClassPresence::of(labels, &partition.test);
    if !test.both() {
        return TrialStatus::Degenerate {
            reason: format!("test partition has no {} rows", missing_class(test)),
        };
    }

    TrialStatus::Ok
}

const fn missing_class(presence: ClassPresence) -> &'static str {
    if presence.spam {
        "ham"
    } else {
        "spam"
    }
}
