use loanscore_core::{Classifier, Error, FeatureMatrix, Result, SchemaVariant, POSITIVE_CLASS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cutoff on the positive-class probability for label-coded deployments.
///
/// A probability exactly at the cutoff counts as `DEFAULT`. Not configurable.
pub const DEFAULT_PROBABILITY_THRESHOLD: f64 = 0.05;

/// Binary outcome handed to the result renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    NoDefault,
    Default,
}

impl Verdict {
    /// Map a hard class label; `0` is the only "no default" label
    pub fn from_label(label: u8) -> Self {
        if label == 0 {
            Verdict::NoDefault
        } else {
            Verdict::Default
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::NoDefault => "NO_DEFAULT",
            Verdict::Default => "DEFAULT",
        }
    }

    /// User-facing message for this verdict
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::NoDefault => "The client is predicted to NOT default on the loan.",
            Verdict::Default => "The client is predicted to DEFAULT on the loan.",
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Verdict::Default)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How classifier output becomes a verdict
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecisionRule {
    /// Pass the classifier's hard label through unchanged
    ClassLabel,
    /// `DEFAULT` when the positive-class probability is at least the cutoff
    ProbabilityThreshold(f64),
}

/// Outcome of one decision, with the probability when the rule used one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub verdict: Verdict,
    pub probability: Option<f64>,
}

impl DecisionRule {
    /// The fixed rule each deployment ships with
    pub fn for_variant(variant: SchemaVariant) -> Self {
        match variant {
            SchemaVariant::A => DecisionRule::ClassLabel,
            SchemaVariant::B => DecisionRule::ProbabilityThreshold(DEFAULT_PROBABILITY_THRESHOLD),
        }
    }

    /// Verdict for a positive-class probability under a threshold rule
    pub fn verdict_for_probability(threshold: f64, p1: f64) -> Verdict {
        if p1 >= threshold {
            Verdict::Default
        } else {
            Verdict::NoDefault
        }
    }

    /// Run the classifier on a single-row batch and decide
    pub fn decide(&self, classifier: &dyn Classifier, x: &FeatureMatrix) -> Result<Decision> {
        match *self {
            DecisionRule::ClassLabel => {
                let labels = classifier.predict(x)?;
                let label = labels.first().copied().ok_or(Error::EmptyBatch)?;
                Ok(Decision {
                    verdict: Verdict::from_label(label),
                    probability: None,
                })
            }
            DecisionRule::ProbabilityThreshold(threshold) => {
                let proba = classifier.predict_proba(x)?;
                let p1 = proba
                    .first()
                    .map(|p| p[POSITIVE_CLASS])
                    .ok_or(Error::EmptyBatch)?;
                Ok(Decision {
                    verdict: Self::verdict_for_probability(threshold, p1),
                    probability: Some(p1),
                })
            }
        }
    }
}
