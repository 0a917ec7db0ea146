//! TF-IDF vectorizer with a document-frequency vocabulary cap

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use super::stopwords::is_stop_word;

/// Split text into lowercase word tokens.
///
/// A token is a maximal run of alphanumeric characters or `_`, at least two
/// characters long, that is not an English stopword.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().nth(1).is_some())
        .map(str::to_lowercase)
        .filter(|word| !is_stop_word(word))
}

/// TF-IDF vectorizer fitted on a fixed corpus.
///
/// ## Vocabulary
///
/// The `max_features` terms with the highest document frequency are kept;
/// ties go to the lexically smaller term. Kept terms are laid out in lexical
/// order, so column `j` always means the same term for a given fit.
///
/// ## Weighting
///
/// `w(t, d) = tf(t, d) * (ln((1 + N) / (1 + df(t))) + 1)` with raw counts as
/// `tf`, followed by L2 normalization of the document vector.
#[derive(Debug, Clone, Serialize)]
pub struct TfIdfVectorizer {
    terms: Vec<String>,
    #[serde(skip)]
    vocabulary: FxHashMap<String, usize>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl TfIdfVectorizer {
    /// Fit vocabulary and idf weights on `documents`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fit<'a, I>(documents: I, max_features: usize) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut n_documents = 0usize;
        let mut document_frequency: FxHashMap<String, usize> = FxHashMap::default();

        for doc in documents {
            n_documents += 1;
            let unique: FxHashSet<String> = tokenize(doc).collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = document_frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);
        ranked.sort_by(|a, b| a.0.cmp(&b.0));

        let n = n_documents as f64;
        let mut terms = Vec::with_capacity(ranked.len());
        let mut idf = Vec::with_capacity(ranked.len());
        let mut vocabulary = FxHashMap::default();
        for (index, (term, df)) in ranked.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term.clone(), index);
            terms.push(term);
        }

        Self {
            terms,
            vocabulary,
            idf,
            n_documents,
        }
    }

    /// Write the normalized TF-IDF vector of `document` into `out`.
    ///
    /// `out` must be exactly [`Self::vocabulary_size`] long; terms outside
    /// the fitted vocabulary are ignored.
    pub fn transform_into(&self, document: &str, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.terms.len());
        out.fill(0.0);

        for token in tokenize(document) {
            if let Some(&index) = self.vocabulary.get(&token) {
                out[index] += 1.0;
            }
        }

        for (weight, idf) in out.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }

        let norm = out.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in out.iter_mut() {
                *weight /= norm;
            }
        }
    }

    /// Transform a single document into a new vector.
    #[must_use]
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut out = vec![0.0; self.terms.len()];
        self.transform_into(document, &mut out);
        out
    }

    /// Number of kept terms (the text column count).
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Kept terms in column order.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Column index of `term`, if it was kept.
    #[must_use]
    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Idf weights in column order.
    #[must_use]
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Number of documents seen during fit.
    #[must_use]
    pub const fn n_documents(&self) -> usize {
        self.n_documents
    }
}
