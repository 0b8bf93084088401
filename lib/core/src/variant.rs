use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two feature layouts a deployment can be trained against
///
/// Vectors built for one variant must never reach the other's classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// One-hot layout, hard class labels
    A,
    /// Label-coded layout, thresholded probabilities
    B,
}

impl SchemaVariant {
    pub const ALL: [SchemaVariant; 2] = [SchemaVariant::A, SchemaVariant::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVariant::A => "a",
            SchemaVariant::B => "b",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "v1" | "1" => Ok(SchemaVariant::A),
            "b" | "v2" | "2" => Ok(SchemaVariant::B),
            _ => Err(Error::UnknownVariant(s.to_string())),
        }
    }
}
