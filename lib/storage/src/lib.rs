pub mod artifact;
pub mod store;

pub use artifact::{ArtifactError, ArtifactFormat, Encoding, ModelArtifact, Result};
pub use store::{ArtifactDescription, ArtifactStore, LoadedArtifact};
