pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod models;
pub mod pipeline;
pub mod sorter;

pub use classifier::{Classifier, ClassifierArtifact, ClassifierSlot, Provenance};
pub use config::HogConfig;
pub use error::{ClassifierError, Error, ExtractError, ModelLoadError};
pub use features::FeatureExtractor;
pub use models::{ClassificationResult, Descriptor, WasteCategory};
pub use pipeline::{Pipeline, PipelineData, PipelineStep};
pub use sorter::Sorter;
