//! # loanscore Core
//!
//! Core library for the loanscore loan-default deployments.
//!
//! This crate provides the types shared by every other loanscore crate:
//!
//! - [`FeatureVector`] - Ordered numeric features for one applicant
//! - [`FeatureMatrix`] - Row-major batch buffer handed to classifiers
//! - [`Classifier`] - Boundary trait for pre-trained binary classifiers
//! - [`Model`] - Classifier kinds a stored artifact can carry
//! - [`SchemaVariant`] - Which feature layout a deployment was trained on
//!
//! ## Example
//!
//! ```rust
//! use loanscore_core::{Classifier, FeatureVector, LogisticRegression};
//!
//! let model = LogisticRegression::new(vec![0.5, -0.25], 0.1);
//! let x = FeatureVector::new(vec![1.0, 2.0]).into_matrix();
//! let proba = model.predict_proba(&x).unwrap();
//! assert_eq!(proba.len(), 1);
//! ```

pub mod classifier;
pub mod error;
pub mod model;
pub mod variant;
pub mod vector;

pub use classifier::{Classifier, POSITIVE_CLASS};
pub use error::{Error, Result};
pub use model::{DecisionTree, LogisticRegression, Model, RandomForest, TREE_LEAF};
pub use variant::SchemaVariant;
pub use vector::{FeatureMatrix, FeatureVector};
