//! Label encoder for the categorical sender column

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::{Error, Result};

/// Maps each distinct fitted value to a stable integer id.
///
/// Ids follow lexical order of the distinct values, so refitting on the same
/// set of values always yields the same mapping.
#[derive(Debug, Clone, Default)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl LabelEncoder {
    /// Fit on every value in `values`.
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        let classes: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        let index = classes
            .iter()
            .enumerate()
            .map(|(id, class)| (class.clone(), id))
            .collect();

        Self { classes, index }
    }

    /// Id of `value`, if it was seen during fit.
    #[must_use]
    pub fn get(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    /// Id of `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Feature` if `value` was not seen during fit.
    pub fn transform(&self, value: &str) -> Result<usize> {
        self.get(value).ok_or_else(|| {
            Error::Feature(format!(
                "sender {value:?} was not seen when the encoder was fitted ({} known senders)",
                self.classes.len()
            ))
        })
    }

    /// Fitted values in id order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of distinct fitted values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True when nothing was fitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
