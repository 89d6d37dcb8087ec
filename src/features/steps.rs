use crate::error::ExtractError;
use crate::features::preprocessing;
use crate::pipeline::{PipelineData, PipelineStep};
use image::DynamicImage;
use tracing::debug;

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process<'a>(&self, data: PipelineData<'a>) -> Result<PipelineData<'a>, ExtractError> {
        let gray = preprocessing::to_grayscale(&data.image);
        Ok(data.with_image(DynamicImage::ImageLuma8(gray)))
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Stretch to the canonical size, ignoring aspect ratio
pub struct CanonicalResizeStep {
    pub width: u32,
    pub height: u32,
}

impl PipelineStep for CanonicalResizeStep {
    fn process<'a>(&self, data: PipelineData<'a>) -> Result<PipelineData<'a>, ExtractError> {
        let gray = data.image.to_luma8();

        let (src_w, src_h) = data.source_dimensions;
        debug!(
            "Resampling {}x{} source to {}x{} (scale x{:.3}, y{:.3})",
            src_w,
            src_h,
            self.width,
            self.height,
            self.width as f32 / src_w as f32,
            self.height as f32 / src_h as f32
        );

        let resized = preprocessing::resize_canonical(&gray, self.width, self.height);
        Ok(data.with_image(DynamicImage::ImageLuma8(resized)))
    }

    fn name(&self) -> &str {
        "Canonical Resize"
    }
}
