//! Explainability for encoded vectors
//!
//! Provides output structures that show what was sent to a classifier:
//! each slot paired with its value, and a description of a schema's
//! fields and label sets.

use crate::schema::{Encoding, FeatureSchema};
use loanscore_core::{FeatureVector, SchemaVariant};
use serde::Serialize;

/// One slot of an encoded vector
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotValue {
    pub name: String,
    pub value: f64,
}

/// An encoded vector with slot names, in vector order
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExplainedVector {
    pub slots: Vec<SlotValue>,
}

impl ExplainedVector {
    pub fn new(names: &[&str], vector: &FeatureVector) -> Self {
        Self {
            slots: names
                .iter()
                .zip(vector.as_slice())
                .map(|(name, value)| SlotValue {
                    name: (*name).to_string(),
                    value: *value,
                })
                .collect(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s.value).collect()
    }
}

/// Kind of encoding a field uses, as shown to clients
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Ordinal,
    OneHot,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDescription {
    pub name: &'static str,
    pub kind: FieldKind,
    pub slots: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<&'static [&'static str]>,
}

/// Response structure describing a schema
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDescription {
    pub variant: SchemaVariant,
    pub dim: usize,
    pub slots: Vec<&'static str>,
    pub fields: Vec<FieldDescription>,
}

impl SchemaDescription {
    pub fn from_schema(schema: &FeatureSchema) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|field| FieldDescription {
                name: field.name,
                kind: match field.encoding {
                    Encoding::Numeric { .. } => FieldKind::Numeric,
                    Encoding::Ordinal { .. } => FieldKind::Ordinal,
                    Encoding::OneHot { .. } => FieldKind::OneHot,
                },
                slots: field.slots(),
                labels: field.table().map(|t| t.labels),
            })
            .collect();

        Self {
            variant: schema.variant(),
            dim: schema.dim(),
            slots: schema.slot_names(),
            fields,
        }
    }
}
