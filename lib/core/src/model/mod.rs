//! Model kinds a classifier artifact can carry
//!
//! Both kinds mirror the layout scikit-learn exports for its estimators, so
//! an artifact converted from a trained model keeps its numeric behaviour.

pub mod forest;
pub mod logistic;

pub use forest::{DecisionTree, RandomForest, TREE_LEAF};
pub use logistic::LogisticRegression;

use crate::classifier::Classifier;
use crate::error::{Error, Result};
use crate::vector::FeatureMatrix;
use serde::{Deserialize, Serialize};

/// Any classifier that can be stored in an artifact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    Logistic(LogisticRegression),
    RandomForest(RandomForest),
}

impl Model {
    /// Check internal consistency of the model parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            Model::Logistic(m) => m.validate(),
            Model::RandomForest(m) => m.validate(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Model::Logistic(_) => "logistic",
            Model::RandomForest(_) => "random_forest",
        }
    }
}

impl Classifier for Model {
    fn n_features(&self) -> Option<usize> {
        match self {
            Model::Logistic(m) => m.n_features(),
            Model::RandomForest(m) => m.n_features(),
        }
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<u8>> {
        match self {
            Model::Logistic(m) => m.predict(x),
            Model::RandomForest(m) => m.predict(x),
        }
    }

    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; 2]>> {
        match self {
            Model::Logistic(m) => m.predict_proba(x),
            Model::RandomForest(m) => m.predict_proba(x),
        }
    }
}

impl From<LogisticRegression> for Model {
    fn from(m: LogisticRegression) -> Self {
        Model::Logistic(m)
    }
}

impl From<RandomForest> for Model {
    fn from(m: RandomForest) -> Self {
        Model::RandomForest(m)
    }
}

/// Reject empty batches and rows whose width differs from the trained width
pub(crate) fn check_input(x: &FeatureMatrix, expected: usize) -> Result<()> {
    if x.is_empty() {
        return Err(Error::EmptyBatch);
    }
    if x.cols() != expected {
        return Err(Error::InvalidDimension {
            expected,
            actual: x.cols(),
        });
    }
    Ok(())
}

/// Hard label from a probability pair, ties go to the negative class
#[inline]
pub(crate) fn argmax(proba: &[f64; 2]) -> u8 {
    u8::from(proba[1] > proba[0])
}
