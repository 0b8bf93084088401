//! Deployments
//!
//! A deployment binds one schema, one pre-trained classifier and one
//! decision rule. It is built once at startup and then shared read-only;
//! every prediction builds a fresh vector and discards it afterwards.

use crate::decision::{DecisionRule, Verdict};
use crate::encoder::FeatureEncoder;
use crate::form::RawForm;
use crate::schema::FeatureSchema;
use loanscore_core::{Classifier, Error, FeatureVector, Result, SchemaVariant};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Result of one encode-predict-decide cycle
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub variant: SchemaVariant,
    pub verdict: Verdict,
    pub message: &'static str,
    /// Positive-class probability, present when the rule thresholds one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip)]
    pub vector: FeatureVector,
}

pub struct Deployment {
    name: String,
    encoder: FeatureEncoder,
    classifier: Arc<dyn Classifier>,
    rule: DecisionRule,
}

impl Deployment {
    /// Deployment with the fixed schema and decision rule of `variant`
    pub fn new(variant: SchemaVariant, classifier: Arc<dyn Classifier>) -> Result<Self> {
        Self::with_parts(
            FeatureSchema::for_variant(variant),
            classifier,
            DecisionRule::for_variant(variant),
        )
    }

    /// Assemble a deployment from explicit parts
    ///
    /// Fails when the classifier declares an input width different from the
    /// schema dimension. Classifiers that declare no width are accepted as is.
    pub fn with_parts(
        schema: FeatureSchema,
        classifier: Arc<dyn Classifier>,
        rule: DecisionRule,
    ) -> Result<Self> {
        if let Some(expected) = classifier.n_features() {
            if expected != schema.dim() {
                return Err(Error::SchemaMismatch {
                    variant: schema.variant().to_string(),
                    expected,
                    actual: schema.dim(),
                });
            }
        }

        Ok(Self {
            name: format!("schema-{}", schema.variant()),
            encoder: FeatureEncoder::new(schema),
            classifier,
            rule,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> SchemaVariant {
        self.encoder.schema().variant()
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.encoder.schema()
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn rule(&self) -> DecisionRule {
        self.rule
    }

    /// Encode `form`, run the classifier on a one-row batch and decide
    pub fn predict(&self, form: &RawForm) -> Result<Prediction> {
        let vector = self.encoder.encode(form);
        let matrix = vector.clone().into_matrix();
        let decision = self.rule.decide(self.classifier.as_ref(), &matrix)?;

        debug!(
            deployment = %self.name,
            verdict = %decision.verdict,
            probability = ?decision.probability,
            "prediction complete"
        );

        Ok(Prediction {
            variant: self.variant(),
            verdict: decision.verdict,
            message: decision.verdict.message(),
            probability: decision.probability,
            vector,
        })
    }
}

impl fmt::Debug for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deployment")
            .field("name", &self.name)
            .field("variant", &self.variant())
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}

/// At most one deployment per schema variant
#[derive(Debug, Default)]
pub struct DeploymentSet {
    deployments: BTreeMap<SchemaVariant, Arc<Deployment>>,
}

impl DeploymentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deployment, replacing any previous one for the same variant
    pub fn insert(&mut self, deployment: Deployment) {
        self.deployments
            .insert(deployment.variant(), Arc::new(deployment));
    }

    pub fn with(mut self, deployment: Deployment) -> Self {
        self.insert(deployment);
        self
    }

    pub fn get(&self, variant: SchemaVariant) -> Result<&Arc<Deployment>> {
        self.deployments
            .get(&variant)
            .ok_or_else(|| Error::DeploymentNotLoaded(variant.to_string()))
    }

    pub fn variants(&self) -> impl Iterator<Item = SchemaVariant> + '_ {
        self.deployments.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Deployment>> {
        self.deployments.values()
    }

    pub fn len(&self) -> usize {
        self.deployments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deployments.is_empty()
    }
}
