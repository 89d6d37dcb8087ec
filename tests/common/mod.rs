mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from ecosort for tests
pub use ecosort::classifier::{Kernel, PlattScaling, SvmModel};
pub use ecosort::{
    ClassificationResult, Classifier, ClassifierArtifact, ClassifierError, ClassifierSlot,
    Descriptor, Error, ExtractError, FeatureExtractor, HogConfig, ModelLoadError, Provenance,
    Sorter, WasteCategory,
};
