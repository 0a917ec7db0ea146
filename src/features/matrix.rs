//! Fixed-layout feature matrix and its label vector

use serde::Serialize;

use crate::{Error, Result};

/// Column layout shared by every row: `[tfidf_1..tfidf_K, senderId, bodyLength?]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureLayout {
    text_columns: usize,
    has_body_length: bool,
}

impl FeatureLayout {
    /// Create a layout with `text_columns` TF-IDF columns.
    #[must_use]
    pub const fn new(text_columns: usize, has_body_length: bool) -> Self {
        Self {
            text_columns,
            has_body_length,
        }
    }

    /// Number of TF-IDF columns (K).
    #[must_use]
    pub const fn text_columns(&self) -> usize {
        self.text_columns
    }

    /// Index of the sender id column.
    #[must_use]
    pub const fn sender_column(&self) -> usize {
        self.text_columns
    }

    /// Index of the body length column, if present.
    #[must_use]
    pub const fn body_length_column(&self) -> Option<usize> {
        if self.has_body_length {
            Some(self.text_columns + 1)
        } else {
            None
        }
    }

    /// Whether the body length column is present.
    #[must_use]
    pub const fn has_body_length(&self) -> bool {
        self.has_body_length
    }

    /// Total row width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.text_columns + 1 + self.has_body_length as usize
    }
}

/// Row-major numeric matrix whose width is fixed by a [`FeatureLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    layout: FeatureLayout,
    data: Vec<f64>,
    n_rows: usize,
}

impl FeatureMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub const fn new(layout: FeatureLayout) -> Self {
        Self {
            layout,
            data: Vec::new(),
            n_rows: 0,
        }
    }

    /// Create an empty matrix with room for `rows` rows.
    #[must_use]
    pub fn with_capacity(layout: FeatureLayout, rows: usize) -> Self {
        Self {
            layout,
            data: Vec::with_capacity(rows * layout.width()),
            n_rows: 0,
        }
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the row width differs from the layout.
    pub fn push_row(&mut self, row: &[f64]) -> Result<()> {
        if row.len() != self.layout.width() {
            return Err(Error::InvalidInput(format!(
                "row has {} columns, layout expects {}",
                row.len(),
                self.layout.width()
            )));
        }
        self.data.extend_from_slice(row);
        self.n_rows += 1;
        Ok(())
    }

    /// Column layout.
    #[must_use]
    pub const fn layout(&self) -> FeatureLayout {
        self.layout
    }

    /// Number of rows.
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.layout.width()
    }

    /// True when the matrix has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Borrow row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= n_rows()`.
    #[must_use]
    pub fn row(&self, index: usize) -> &[f64] {
        let width = self.layout.width();
        &self.data[index * width..(index + 1) * width]
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on a zero chunk size; width is always >= 1
        self.data.chunks_exact(self.layout.width())
    }

    /// Value at (`row`, `col`).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.row(row)[col]
    }

    /// Copy the given rows, in the given order, into a new matrix.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut selected = Self::with_capacity(self.layout, indices.len());
        for &index in indices {
            selected.data.extend_from_slice(self.row(index));
        }
        selected.n_rows = indices.len();
        selected
    }
}

/// A feature matrix together with its labels, kept in lockstep.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    features: FeatureMatrix,
    labels: Vec<bool>,
}

impl LabeledMatrix {
    /// Pair a matrix with its labels.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if row and label counts differ.
    pub fn new(features: FeatureMatrix, labels: Vec<bool>) -> Result<Self> {
        if features.n_rows() != labels.len() {
            return Err(Error::InvalidInput(format!(
                "feature matrix has {} rows but {} labels were given",
                features.n_rows(),
                labels.len()
            )));
        }
        Ok(Self { features, labels })
    }

    /// The feature rows.
    #[must_use]
    pub const fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    /// The labels, row-aligned with `features()`.
    #[must_use]
    pub fn labels(&self) -> &[bool] {
        &self.labels
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Select rows of both matrix and labels together.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select_rows(indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> FeatureMatrix {
        let mut m = FeatureMatrix::new(FeatureLayout::new(2, true));
        m.push_row(&[0.1, 0.2, 3.0, 40.0]).unwrap();
        m.push_row(&[0.5, 0.6, 7.0, 80.0]).unwrap();
        m.push_row(&[0.9, 1.0, 11.0, 120.0]).unwrap();
        m
    }

    #[test]
    fn test_layout_columns() {
        let layout = FeatureLayout::new(500, true);
        assert_eq!(layout.width(), 502);
        assert_eq!(layout.sender_column(), 500);
        assert_eq!(layout.body_length_column(), Some(501));

        let layout = FeatureLayout::new(500, false);
        assert_eq!(layout.width(), 501);
        assert_eq!(layout.body_length_column(), None);
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut m = FeatureMatrix::new(FeatureLayout::new(2, false));
        assert!(m.push_row(&[1.0, 2.0, 3.0]).is_ok());
        assert!(matches!(m.push_row(&[1.0, 2.0]), Err(Error::InvalidInput(_))));
        assert_eq!(m.n_rows(), 1);
    }

    #[test]
    fn test_row_access() {
        let m = matrix();
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 4);
        assert_eq!(m.row(1), &[0.5, 0.6, 7.0, 80.0]);
        assert!((m.get(2, 3) - 120.0).abs() < f64::EPSILON);
        assert_eq!(m.rows().count(), 3);
    }

    #[test]
    fn test_select_rows_keeps_order() {
        let m = matrix().select_rows(&[2, 0]);
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.row(0), &[0.9, 1.0, 11.0, 120.0]);
        assert_eq!(m.row(1), &[0.1, 0.2, 3.0, 40.0]);
        assert_eq!(m.layout(), FeatureLayout::new(2, true));
    }

    #[test]
    fn test_labeled_select_moves_labels_with_rows() {
        let labeled = LabeledMatrix::new(matrix(), vec![true, false, true]).unwrap();
        let picked = labeled.select(&[1, 2]);
        assert_eq!(picked.labels(), &[false, true]);
        assert_eq!(picked.features().row(0)[2], 7.0);
    }

    #[test]
    fn test_labeled_length_mismatch() {
        let err = LabeledMatrix::new(matrix(), vec![true]).unwrap_err();
        assert!(err.to_string().contains("3 rows"));
    }
}
