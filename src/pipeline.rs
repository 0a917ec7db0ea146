//! End-to-end evaluation pipeline
//!
//! ```text
//! Config ─┐
//! Dataset ┴─> FeatureBuilder ─> Evaluator ─> aggregate ─> conclusions
//!                                                 │
//!                                                 └─> EvaluationReport
//! ```
//!
//! Every stage is a function of its explicit inputs; calling [`run`] twice
//! with a fixed seed yields the same report apart from `generated_at`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::classifier::{ClassifierFactory, DecisionTreeFactory};
use crate::conclusion::conclusions;
use crate::config::{Config, FeatureScope};
use crate::dataset::{Dataset, EmailRecord};
use crate::evaluation::Evaluator;
use crate::features::{FeatureBuilder, FeatureLayout};
use crate::stats::{aggregate, AccuracySeries, AggregatedResults};
use crate::Result;

/// Everything the evaluation produces, as structured data.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    generated_at: DateTime<Utc>,
    config: Config,
    dataset_rows: usize,
    spam_rows: usize,
    preview: Vec<EmailRecord>,
    feature_layout: Option<FeatureLayout>,
    results: AggregatedResults,
    accuracy_series: AccuracySeries,
    conclusions: Vec<String>,
}

impl EvaluationReport {
    /// When the report was produced.
    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Configuration the evaluation ran with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Record count of the input dataset.
    #[must_use]
    pub const fn dataset_rows(&self) -> usize {
        self.dataset_rows
    }

    /// Spam records in the input dataset.
    #[must_use]
    pub const fn spam_rows(&self) -> usize {
        self.spam_rows
    }

    /// First rows of the dataset.
    #[must_use]
    pub fn preview(&self) -> &[EmailRecord] {
        &self.preview
    }

    /// Column layout of the full-corpus feature matrix; `None` when features
    /// were refitted per split.
    #[must_use]
    pub const fn feature_layout(&self) -> Option<FeatureLayout> {
        self.feature_layout
    }

    /// Per-run results with z-scores and the summary statistics.
    #[must_use]
    pub const fn results(&self) -> &AggregatedResults {
        &self.results
    }

    /// Accuracy per run with its mean.
    #[must_use]
    pub const fn accuracy_series(&self) -> &AccuracySeries {
        &self.accuracy_series
    }

    /// Reliability statements.
    #[must_use]
    pub fn conclusions(&self) -> &[String] {
        &self.conclusions
    }

    /// Serialize the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build features, run the trials and aggregate, for any classifier.
///
/// Full-corpus scope fits the vectorizer and encoder once before splitting;
/// per-split scope refits them on each training partition.
///
/// # Errors
///
/// Propagates feature, evaluation and aggregation errors.
pub fn evaluate_dataset<F>(
    dataset: &Dataset,
    evaluator: &Evaluator,
    builder: &FeatureBuilder,
    scope: FeatureScope,
    factory: &F,
) -> Result<(Option<FeatureLayout>, AggregatedResults)>
where
    F: ClassifierFactory + Sync,
{
    let (layout, results) = match scope {
        FeatureScope::FullCorpus => {
            let (fitted, matrix) = builder.build(dataset)?;
            (Some(fitted.layout()), evaluator.evaluate(&matrix, factory)?)
        }
        FeatureScope::PerSplit => (None, evaluator.evaluate_per_split(dataset, builder, factory)?),
    };
    Ok((layout, aggregate(results)?))
}

/// Run the whole evaluation with a decision tree.
///
/// # Errors
///
/// Returns `Error::Configuration` for an invalid `config`, and propagates
/// feature, evaluation and aggregation errors. No partial results are
/// returned on failure.
pub fn run(dataset: &Dataset, config: &Config) -> Result<EvaluationReport> {
    config.validate()?;

    let evaluator = Evaluator::from_config(config)?;
    let builder = FeatureBuilder::for_dataset(dataset, config.vocabulary_size());
    let factory = DecisionTreeFactory::new(config.max_depth());

    let (feature_layout, results) = evaluate_dataset(
        dataset,
        &evaluator,
        &builder,
        config.feature_scope(),
        &factory,
    )?;

    let summary = results.summary();
    let conclusions = conclusions(summary.mean_accuracy, summary.std_accuracy);
    info!(
        mean_accuracy = summary.mean_accuracy,
        std_accuracy = summary.std_accuracy,
        degenerate_runs = summary.degenerate_runs,
        "pipeline finished"
    );

    Ok(EvaluationReport {
        generated_at: Utc::now(),
        config: config.clone(),
        dataset_rows: dataset.len(),
        spam_rows: dataset.spam_count(),
        preview: dataset.preview().to_vec(),
        feature_layout,
        accuracy_series: results.accuracy_series(),
        results,
        conclusions,
    })
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Dataset preview ({} rows, {} spam) ==", self.dataset_rows, self.spam_rows)?;
        for record in &self.preview {
            let body: String = record.body().chars().take(48).collect();
            writeln!(
                f,
                "{:<5} {:<28} {:<48} {:?}",
                if record.is_spam() { "spam" } else { "ham" },
                record.sender(),
                body,
                record.body_length()
            )?;
        }

        writeln!(f, "\n== Runs (base seed {}) ==", self.results.base_seed())?;
        write!(f, "{}", self.results)?;

        writeln!(f, "\n== Summary ==")?;
        writeln!(f, "{}", self.results.summary())?;

        writeln!(f, "\n== Conclusions ==")?;
        for line in &self.conclusions {
            writeln!(f, "- {line}")?;
        }
        Ok(())
    }
}
