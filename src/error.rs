use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unsupported extractor configuration version: {0}")]
    UnsupportedVersion(u32),
    #[error("Invalid extractor configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to write debug output {path:?}: {message}")]
    DebugOutput { path: PathBuf, message: String },
}

impl ExtractError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ExtractError::InvalidImage(msg.into())
    }
}

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("Classifier artifact {path:?} could not be read: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Classifier artifact is corrupt: {0}")]
    Corrupt(String),
    #[error("Classifier artifact is incompatible: {0}")]
    Incompatible(String),
    #[error("Invalid classifier model: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Descriptor has {actual} features but the classifier expects {expected}")]
    FeatureShapeMismatch { expected: usize, actual: usize },
}

/// Any failure of a single classification request.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Classify(#[from] ClassifierError),
    #[error(transparent)]
    Load(#[from] ModelLoadError),
}
