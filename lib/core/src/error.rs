use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown schema variant: {0}")]
    UnknownVariant(String),

    #[error("No deployment loaded for schema variant: {0}")]
    DeploymentNotLoaded(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Classifier for schema {variant} expects {expected} features, schema produces {actual}")]
    SchemaMismatch {
        variant: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Empty feature matrix")]
    EmptyBatch,

    #[error("Invalid form input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
