use super::{argmax, check_input};
use crate::classifier::Classifier;
use crate::error::{Error, Result};
use crate::vector::FeatureMatrix;
use serde::{Deserialize, Serialize};

/// Binary logistic regression: `p1 = sigmoid(coefficients . x + intercept)`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(Error::InvalidModel(
                "logistic regression has no coefficients".to_string(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidModel(
                "logistic regression parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Raw decision score for one row
    #[inline]
    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.intercept
            + row
                .iter()
                .zip(self.coefficients.iter())
                .map(|(x, w)| x * w)
                .sum::<f64>()
    }

    #[inline]
    fn positive_probability(&self, row: &[f64]) -> f64 {
        1.0 / (1.0 + (-self.decision_function(row)).exp())
    }
}

impl Classifier for LogisticRegression {
    fn n_features(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<u8>> {
        Ok(self.predict_proba(x)?.iter().map(argmax).collect())
    }

    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; 2]>> {
        check_input(x, self.coefficients.len())?;
        Ok(x
            .iter_rows()
            .map(|row| {
                let p1 = self.positive_probability(row);
                [1.0 - p1, p1]
            })
            .collect())
    }
}
