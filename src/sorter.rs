use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;

use crate::classifier::{Classifier, Provenance};
use crate::error::{ClassifierError, Error, ExtractError};
use crate::features::FeatureExtractor;
use crate::models::{ClassificationResult, Descriptor};

/// Per-process context wiring one extractor to one loaded classifier.
///
/// The extractor is built from the configuration stored with the classifier,
/// so descriptors always have the length the classifier expects. Build it
/// once at startup and hand `&Sorter` (or an `Arc<Sorter>`) to every request.
#[derive(Clone)]
pub struct Sorter {
    extractor: FeatureExtractor,
    classifier: Arc<Classifier>,
}

impl Sorter {
    pub fn new(classifier: Arc<Classifier>) -> Result<Self, ExtractError> {
        let extractor = FeatureExtractor::new(*classifier.extractor_config())?;
        Ok(Self {
            extractor,
            classifier,
        })
    }

    /// Write preprocessing stages of every sorted image under `output_dir`
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self, ExtractError> {
        self.extractor = self.extractor.with_debug(output_dir)?;
        Ok(self)
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    pub fn classifier(&self) -> &Arc<Classifier> {
        &self.classifier
    }

    /// True when the classifier's weights are placeholders
    pub fn is_untrained(&self) -> bool {
        self.classifier.provenance() == Provenance::Untrained
    }

    pub fn extract(&self, img: &DynamicImage) -> Result<Descriptor, ExtractError> {
        self.extractor.extract(img)
    }

    pub fn classify(&self, descriptor: &Descriptor) -> Result<ClassificationResult, ClassifierError> {
        self.classifier.classify(descriptor.as_slice())
    }

    /// Extract then classify one image
    pub fn sort(&self, img: &DynamicImage) -> Result<ClassificationResult, Error> {
        let descriptor = self.extract(img)?;
        Ok(self.classify(&descriptor)?)
    }
}
