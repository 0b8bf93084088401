//! Loading and saving classifier artifacts
//!
//! Artifacts are read once at startup. A missing, undecodable or
//! inconsistent artifact is an error the caller treats as fatal.

use crate::artifact::{ArtifactError, ArtifactFormat, Encoding, ModelArtifact, Result};
use atomicwrites::{AllowOverwrite, AtomicFile};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use loanscore_core::SchemaVariant;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Artifact file description for logs and API responses
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactDescription {
    pub path: PathBuf,
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaVariant>,
    pub format: ArtifactFormat,
    pub size: u64,
    pub checksum: String,
}

/// An artifact together with where and what it was read from
#[derive(Debug, Clone)]
pub struct LoadedArtifact {
    pub artifact: ModelArtifact,
    pub description: ArtifactDescription,
}

pub struct ArtifactStore;

impl ArtifactStore {
    /// Read, decode and validate an artifact
    pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadedArtifact> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|e| ArtifactError::io(path, e))?;
        let checksum = format!("{:x}", Sha256::digest(&raw));
        let size = raw.len() as u64;
        let encoding = Encoding::from_path(path);

        let bytes = if encoding.gzip {
            let mut decoder = GzDecoder::new(raw.as_slice());
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| ArtifactError::decode(path, e))?;
            out
        } else {
            raw
        };

        let artifact: ModelArtifact = match encoding.format {
            ArtifactFormat::Json => {
                serde_json::from_slice(&bytes).map_err(|e| ArtifactError::decode(path, e))?
            }
            ArtifactFormat::Bincode => {
                bincode::deserialize(&bytes).map_err(|e| ArtifactError::decode(path, e))?
            }
        };

        artifact
            .model
            .validate()
            .map_err(|source| ArtifactError::InvalidModel {
                path: path.to_path_buf(),
                source,
            })?;

        let description = ArtifactDescription {
            path: path.to_path_buf(),
            name: artifact.name.clone(),
            kind: artifact.model.kind(),
            schema: artifact.schema,
            format: encoding.format,
            size,
            checksum,
        };

        info!(
            path = %path.display(),
            name = %description.name,
            kind = description.kind,
            sha256 = %description.checksum,
            "classifier artifact loaded"
        );

        Ok(LoadedArtifact {
            artifact,
            description,
        })
    }

    /// Load an artifact meant for `variant`
    ///
    /// An artifact that records a different schema is rejected; one that
    /// records none is accepted.
    pub fn load_for<P: AsRef<Path>>(path: P, variant: SchemaVariant) -> Result<LoadedArtifact> {
        let path = path.as_ref();
        let loaded = Self::load(path)?;
        match loaded.artifact.schema {
            Some(declared) if declared != variant => Err(ArtifactError::VariantMismatch {
                path: path.to_path_buf(),
                declared,
                expected: variant,
            }),
            _ => Ok(loaded),
        }
    }

    /// Encode an artifact for `path` and write it atomically
    pub fn save<P: AsRef<Path>>(path: P, artifact: &ModelArtifact) -> Result<()> {
        let path = path.as_ref();
        let bytes = Self::encode(artifact, Encoding::from_path(path))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))?;
        }

        AtomicFile::new(path, AllowOverwrite)
            .write(|f| f.write_all(&bytes))
            .map_err(|e| {
                let source = match e {
                    atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
                };
                ArtifactError::io(path, source)
            })?;

        info!(path = %path.display(), name = %artifact.name, "classifier artifact saved");
        Ok(())
    }

    fn encode(artifact: &ModelArtifact, encoding: Encoding) -> Result<Vec<u8>> {
        let bytes = match encoding.format {
            ArtifactFormat::Json => serde_json::to_vec_pretty(artifact)
                .map_err(|e| ArtifactError::Encode(e.to_string()))?,
            ArtifactFormat::Bincode => {
                bincode::serialize(artifact).map_err(|e| ArtifactError::Encode(e.to_string()))?
            }
        };

        if !encoding.gzip {
            return Ok(bytes);
        }
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&bytes)
            .and_then(|_| encoder.finish())
            .map_err(|e| ArtifactError::Encode(e.to_string()))
    }
}
