//! # loanscore
//!
//! Loan default scoring: an applicant form goes in, a verdict comes out.
//!
//! Two deployments share one workflow but disagree on feature layout and
//! decision rule:
//!
//! - **Schema A**: 27 slots with one-hot categorical groups; the verdict is
//!   the classifier's hard label.
//! - **Schema B**: 20 slots, every categorical field label-coded; the
//!   verdict is `DEFAULT` when the positive-class probability is at least
//!   `0.05`.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! loanscore --model-a models/a.bin --model-b models/b.json.gz --http-port 8501
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use loanscore::prelude::*;
//! use std::sync::Arc;
//!
//! let model = LogisticRegression::new(vec![0.0; 20], -3.0);
//! let deployment = Deployment::new(SchemaVariant::B, Arc::new(model)).unwrap();
//!
//! let form = RawForm::new()
//!     .with("Client_Income", 42000.0)
//!     .with("Client_Education", "Graduation");
//! let prediction = deployment.predict(&form).unwrap();
//! assert_eq!(prediction.verdict, Verdict::NoDefault);
//! ```
//!
//! ## Crate Structure
//!
//! - `loanscore-core` - feature vectors, the classifier trait, bundled models
//! - `loanscore-schema` - label tables, schemas, encoder, decision rules, deployments
//! - `loanscore-storage` - classifier artifacts on disk
//! - `loanscore-api` - REST endpoints

// Re-export core types
pub use loanscore_core::{
    Classifier, DecisionTree, Error, FeatureMatrix, FeatureVector, LogisticRegression, Model,
    RandomForest, Result, SchemaVariant,
};

// Re-export schema layer
pub use loanscore_schema::{
    Decision, DecisionRule, Deployment, DeploymentSet, ExplainedVector, FeatureEncoder,
    FeatureSchema, FormValue, Prediction, RawForm, SchemaDescription, Verdict,
};

// Re-export storage
pub use loanscore_storage::{ArtifactError, ArtifactStore, LoadedArtifact, ModelArtifact};

// Re-export API
pub use loanscore_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ArtifactStore, Classifier, Deployment, DeploymentSet, Error, FeatureEncoder,
        FeatureSchema, FeatureVector, LogisticRegression, Model, ModelArtifact, RandomForest,
        RawForm, RestApi, Result, SchemaVariant, Verdict,
    };
}
