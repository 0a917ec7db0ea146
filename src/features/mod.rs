//! Feature construction: raw email records to a fixed-layout numeric matrix
//!
//! ## Layout
//!
//! ```text
//! [ tfidf_1 .. tfidf_K | senderId | bodyLength? ]
//! ```
//!
//! `K` is the fitted vocabulary size (at most the configured cap). The body
//! length column exists for every row or for none, decided once from the
//! dataset schema.
//!
//! ## Fitting scope
//!
//! [`FeatureBuilder::build`] fits the vectorizer and the sender encoder on
//! the whole corpus before any train/test split. Test rows therefore shape the
//! vocabulary and idf weights, which inflates measured accuracy. The
//! evaluator offers a per-split refit through
//! [`crate::config::FeatureScope::PerSplit`] for leakage-free numbers.

mod encoder;
mod matrix;
mod stopwords;
mod tfidf;

pub use encoder::LabelEncoder;
pub use matrix::{FeatureLayout, FeatureMatrix, LabeledMatrix};
pub use stopwords::is_stop_word;
pub use tfidf::{tokenize, TfIdfVectorizer};

use tracing::info;

use crate::dataset::{Dataset, EmailRecord};
use crate::{Error, Result};

/// Sender id written for senders the encoder never saw (lenient transform only).
pub const UNSEEN_SENDER_ID: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SenderPolicy {
    Strict,
    Lenient,
}

/// Fits feature state and turns records into a [`LabeledMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureBuilder {
    vocabulary_size: usize,
    include_body_length: bool,
}

impl FeatureBuilder {
    /// Create a builder with vocabulary cap `vocabulary_size` and no body
    /// length column.
    #[must_use]
    pub const fn new(vocabulary_size: usize) -> Self {
        Self {
            vocabulary_size,
            include_body_length: false,
        }
    }

    /// Create a builder whose body length decision follows `dataset`'s schema.
    #[must_use]
    pub const fn for_dataset(dataset: &Dataset, vocabulary_size: usize) -> Self {
        Self {
            vocabulary_size,
            include_body_length: dataset.has_body_length(),
        }
    }

    /// Include or omit the body length column.
    #[must_use]
    pub const fn include_body_length(mut self, include: bool) -> Self {
        self.include_body_length = include;
        self
    }

    /// Vocabulary cap.
    #[must_use]
    pub const fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Fit vectorizer and encoder on `records`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the vocabulary cap is zero.
    pub fn fit(&self, records: &[EmailRecord]) -> Result<FittedFeatures> {
        if self.vocabulary_size == 0 {
            return Err(Error::InvalidInput(
                "vocabulary size must be at least 1".to_string(),
            ));
        }

        let vectorizer =
            TfIdfVectorizer::fit(records.iter().map(EmailRecord::body), self.vocabulary_size);
        let encoder = LabelEncoder::fit(records.iter().map(EmailRecord::sender));
        let layout = FeatureLayout::new(vectorizer.vocabulary_size(), self.include_body_length);

        Ok(FittedFeatures {
            vectorizer,
            encoder,
            layout,
        })
    }

    /// Fit on the whole dataset and transform every record.
    ///
    /// # Errors
    ///
    /// Returns `Error::Feature` if a row lacks a body length while the column
    /// is included, and `Error::InvalidInput` for a zero vocabulary cap.
    pub fn build(&self, dataset: &Dataset) -> Result<(FittedFeatures, LabeledMatrix)> {
        let fitted = self.fit(dataset.records())?;
        let matrix = fitted.transform(dataset.records())?;

        info!(
            rows = matrix.len(),
            text_columns = fitted.layout.text_columns(),
            senders = fitted.encoder.len(),
            width = fitted.layout.width(),
            "built feature matrix"
        );

        Ok((fitted, matrix))
    }
}

/// Vectorizer and encoder state from one fit, reusable on other records.
#[derive(Debug, Clone)]
pub struct FittedFeatures {
    vectorizer: TfIdfVectorizer,
    encoder: LabelEncoder,
    layout: FeatureLayout,
}

impl FittedFeatures {
    /// Column layout produced by this fit.
    #[must_use]
    pub const fn layout(&self) -> FeatureLayout {
        self.layout
    }

    /// Fitted text vectorizer.
    #[must_use]
    pub const fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// Fitted sender encoder.
    #[must_use]
    pub const fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    /// Transform records; unseen senders are an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::Feature` for an unseen sender or a missing body length.
    pub fn transform(&self, records: &[EmailRecord]) -> Result<LabeledMatrix> {
        self.transform_with(records, SenderPolicy::Strict)
    }

    /// Transform records; unseen senders get [`UNSEEN_SENDER_ID`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Feature` for a missing body length.
    pub fn transform_lenient(&self, records: &[EmailRecord]) -> Result<LabeledMatrix> {
        self.transform_with(records, SenderPolicy::Lenient)
    }

    #[allow(clippy::cast_precision_loss)]
    fn transform_with(&self, records: &[EmailRecord], policy: SenderPolicy) -> Result<LabeledMatrix> {
        let mut features = FeatureMatrix::with_capacity(self.layout, records.len());
        let mut labels = Vec::with_capacity(records.len());
        let mut row = vec![0.0; self.layout.width()];
        let text_columns = self.layout.text_columns();

        for (index, record) in records.iter().enumerate() {
            self.vectorizer
                .transform_into(record.body(), &mut row[..text_columns]);

            row[self.layout.sender_column()] = match policy {
                SenderPolicy::Strict => self.encoder.transform(record.sender())? as f64,
                SenderPolicy::Lenient => self
                    .encoder
                    .get(record.sender())
                    .map_or(UNSEEN_SENDER_ID, |id| id as f64),
            };

            if let Some(column) = self.layout.body_length_column() {
                let length = record.body_length().ok_or_else(|| {
                    Error::Feature(format!(
                        "row {} has no BodyLength but the column is part of the layout",
                        index + 1
                    ))
                })?;
                row[column] = length as f64;
            }

            features.push_row(&row)?;
            labels.push(record.is_spam());
        }

        LabeledMatrix::new(features, labels)
    }
}
