//! Classifier artifact documents and their on-disk encodings

use chrono::{DateTime, Utc};
use loanscore_core::{Model, SchemaVariant};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArtifactError>;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode artifact {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode artifact: {0}")]
    Encode(String),

    #[error("Invalid model in {path}: {source}")]
    InvalidModel {
        path: PathBuf,
        #[source]
        source: loanscore_core::Error,
    },

    #[error("Artifact {path} was trained for schema {declared}, expected {expected}")]
    VariantMismatch {
        path: PathBuf,
        declared: SchemaVariant,
        expected: SchemaVariant,
    },
}

impl ArtifactError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound(path.to_path_buf())
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn decode(path: &Path, message: impl ToString) -> Self {
        ArtifactError::Decode {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// A trained classifier as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelArtifact {
    pub name: String,
    /// Schema the model was trained against, when recorded
    pub schema: Option<SchemaVariant>,
    pub created_at: DateTime<Utc>,
    pub model: Model,
}

impl ModelArtifact {
    pub fn new(name: impl Into<String>, schema: Option<SchemaVariant>, model: Model) -> Self {
        Self {
            name: name.into(),
            schema,
            created_at: Utc::now(),
            model,
        }
    }
}

/// Serialization used for an artifact file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Json,
    Bincode,
}

/// Encoding chosen from a file name: `.json` is JSON, anything else bincode,
/// with an optional trailing `.gz` for gzip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    pub format: ArtifactFormat,
    pub gzip: bool,
}

impl Encoding {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let (stem, gzip) = match name.strip_suffix(".gz") {
            Some(stem) => (stem.to_string(), true),
            None => (name, false),
        };
        let format = if stem.ends_with(".json") {
            ArtifactFormat::Json
        } else {
            ArtifactFormat::Bincode
        };

        Self { format, gzip }
    }
}
