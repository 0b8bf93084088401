//! # loanscore Schema
//!
//! Feature-encoding layer for the loanscore deployments.
//!
//! ## Overview
//!
//! Each deployment wraps a pre-trained binary classifier that expects a
//! fixed-order numeric vector. This crate owns the contract between the
//! human-facing form and that vector:
//!
//! 1. A form collector submits a [`RawForm`] of numbers, labels and flags
//! 2. The [`FeatureEncoder`] maps it to a [`FeatureVector`] in schema order
//! 3. The classifier scores the one-row batch
//! 4. A [`DecisionRule`] turns the score into a [`Verdict`]
//!
//! ## Schemas
//!
//! - **A**: pass-through numbers, yes/no codes, an education code, then one-hot
//!   groups for income type, marital status, gender and contract type
//!   (27 slots). Verdict is the classifier's hard label.
//! - **B**: every field is a single slot; categorical fields are label-coded
//!   (20 slots). Verdict is `DEFAULT` when `p1 >= 0.05`.
//!
//! Unrecognised or blank categorical values never fail: label-coded slots
//! become `-1`, one-hot groups become all zeros.
//!
//! ```rust
//! use loanscore_schema::{FeatureEncoder, FeatureSchema, RawForm};
//! use loanscore_core::SchemaVariant;
//!
//! let encoder = FeatureEncoder::new(FeatureSchema::for_variant(SchemaVariant::B));
//! let form = RawForm::new()
//!     .with("Client_Income", 42000.0)
//!     .with("Client_Gender", "Female");
//! let vector = encoder.encode(&form);
//! assert_eq!(vector.dim(), 20);
//! assert_eq!(vector[14], 0.0);  // Gender_Code
//! assert_eq!(vector[13], -1.0); // Marital_Code, left blank
//! ```
//!
//! [`FeatureVector`]: loanscore_core::FeatureVector

pub mod decision;
pub mod deployment;
pub mod encoder;
pub mod explain;
pub mod form;
pub mod lookup;
pub mod schema;

// Re-export main types
pub use decision::{Decision, DecisionRule, Verdict, DEFAULT_PROBABILITY_THRESHOLD};
pub use deployment::{Deployment, DeploymentSet, Prediction};
pub use encoder::FeatureEncoder;
pub use explain::{ExplainedVector, FieldDescription, FieldKind, SchemaDescription, SlotValue};
pub use form::{FormValue, RawForm};
pub use lookup::{LabelTable, ONE_HOT_SENTINEL, ORDINAL_SENTINEL};
pub use schema::{schema_a, schema_b, Encoding, FeatureSchema, FieldSpec};
