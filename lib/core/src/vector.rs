use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// An ordered feature vector produced for a single applicant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FeatureVector {
    data: Vec<f64>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f64]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }

    /// Reshape into a `1 x dim` matrix, the batch layout classifiers consume
    #[inline]
    #[must_use]
    pub fn into_matrix(self) -> FeatureMatrix {
        FeatureMatrix::single_row(self)
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

/// Row-major numeric buffer of `rows x cols` features
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Build a matrix from row-major data; `data.len()` must equal `rows * cols`
    pub fn from_rows(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(Error::InvalidDimension {
                expected: rows.saturating_mul(cols),
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    #[must_use]
    pub fn single_row(vector: FeatureVector) -> Self {
        let cols = vector.dim();
        Self {
            rows: 1,
            cols,
            data: vector.into_inner(),
        }
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `index`, or `None` past the last row
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).filter_map(move |i| self.row(i))
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
