pub mod hog;
pub mod preprocessing;
pub mod steps;

pub use preprocessing::rgb_from_raw;

use std::path::PathBuf;
use std::sync::Arc;

use image::DynamicImage;
use tracing::debug;

use crate::config::HogConfig;
use crate::error::ExtractError;
use crate::models::Descriptor;
use crate::pipeline::Pipeline;
use steps::{CanonicalResizeStep, GrayscaleStep};

/// Turns color images into fixed-length HOG descriptors
#[derive(Clone)]
pub struct FeatureExtractor {
    config: HogConfig,
    pipeline: Pipeline,
}

impl FeatureExtractor {
    pub fn new(config: HogConfig) -> Result<Self, ExtractError> {
        config.validate()?;
        Ok(Self {
            pipeline: build_preprocessing_pipeline(&config),
            config,
        })
    }

    /// Write the input and every preprocessing stage as PNG files under `output_dir`
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self, ExtractError> {
        self.pipeline = self.pipeline.with_debug(output_dir)?;
        Ok(self)
    }

    pub fn config(&self) -> &HogConfig {
        &self.config
    }

    pub fn descriptor_len(&self) -> usize {
        self.config.descriptor_len()
    }

    /// Compute the descriptor of a 3-channel image of any size
    pub fn extract(&self, img: &DynamicImage) -> Result<Descriptor, ExtractError> {
        preprocessing::validate_image(img)?;

        let canonical = self.pipeline.run(img)?.into_image().into_luma8();
        let values = hog::compute(&canonical, &self.config);

        debug!(
            "Extracted {} features from {}x{} image",
            values.len(),
            img.width(),
            img.height()
        );
        Ok(Descriptor::new(values))
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        let config = HogConfig::default();
        Self {
            pipeline: build_preprocessing_pipeline(&config),
            config,
        }
    }
}

/// Grayscale conversion followed by the stretch to canonical size
pub fn build_preprocessing_pipeline(config: &HogConfig) -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(CanonicalResizeStep {
            width: config.canonical_width,
            height: config.canonical_height,
        }))
}
