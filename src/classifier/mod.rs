pub mod artifact;
pub mod slot;
pub mod svm;

pub use artifact::{ClassifierArtifact, Manifest, Provenance};
pub use slot::ClassifierSlot;
pub use svm::{Kernel, PlattScaling, SvmModel};

use std::path::Path;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::HogConfig;
use crate::error::{ClassifierError, ModelLoadError};
use crate::models::ClassificationResult;

/// Read-only handle to a loaded classifier.
///
/// Share it behind an `Arc`; `classify` takes `&self` and never mutates.
#[derive(Debug, Clone)]
pub struct Classifier {
    manifest: Manifest,
    model: SvmModel,
}

impl Classifier {
    /// Load a classifier artifact from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        info!("Loading classifier artifact: {:?}", path);

        let artifact = ClassifierArtifact::read(path)?;
        let classifier = Self::from_artifact(artifact);

        info!(
            "Classifier {} loaded ({:?} kernel, {} support vectors, {} features)",
            classifier.model_id(),
            classifier.model.kernel(),
            classifier.model.support_vector_count(),
            classifier.expected_len()
        );
        if classifier.provenance() == Provenance::Untrained {
            warn!("Classifier {} is untrained; its predictions are placeholders", classifier.model_id());
        }

        Ok(classifier)
    }

    pub fn from_artifact(artifact: ClassifierArtifact) -> Self {
        Self {
            manifest: artifact.manifest,
            model: artifact.model,
        }
    }

    /// Build a classifier in memory, checking it against `extractor`
    pub fn from_parts(
        extractor: HogConfig,
        model: SvmModel,
        provenance: Provenance,
    ) -> Result<Self, ModelLoadError> {
        let artifact = ClassifierArtifact::new(extractor, model, provenance)?;
        Ok(Self::from_artifact(artifact))
    }

    pub fn to_artifact(&self) -> ClassifierArtifact {
        ClassifierArtifact {
            manifest: self.manifest.clone(),
            model: self.model.clone(),
        }
    }

    /// Descriptor length the classifier was trained on
    pub fn expected_len(&self) -> usize {
        self.model.dimension()
    }

    /// Extractor configuration the classifier was trained with
    pub fn extractor_config(&self) -> &HogConfig {
        &self.manifest.extractor
    }

    pub fn provenance(&self) -> Provenance {
        self.manifest.provenance
    }

    pub fn model_id(&self) -> Uuid {
        self.manifest.model_id
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Predict the category of a descriptor.
    ///
    /// The confidence is the probability of the returned category.
    pub fn classify(&self, descriptor: &[f32]) -> Result<ClassificationResult, ClassifierError> {
        let expected = self.expected_len();
        if descriptor.len() != expected {
            error!(
                "Feature shape mismatch: classifier {} expects {} features, got {}",
                self.model_id(),
                expected,
                descriptor.len()
            );
            return Err(ClassifierError::FeatureShapeMismatch {
                expected,
                actual: descriptor.len(),
            });
        }

        let p_positive = self.model.positive_probability(descriptor);
        let positive = self.model.positive();
        let (category, confidence) = if p_positive >= 0.5 {
            (positive, p_positive)
        } else {
            (positive.other(), 1.0 - p_positive)
        };

        debug!("Classified as {} (p = {:.4})", category, confidence);
        Ok(ClassificationResult {
            category,
            confidence: confidence as f32,
        })
    }
}
