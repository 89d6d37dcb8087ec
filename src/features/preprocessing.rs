use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::ExtractError;

/// Check that an image has at least one pixel and exactly three color channels
pub fn validate_image(img: &DynamicImage) -> Result<(), ExtractError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ExtractError::invalid(format!(
            "image must be at least 1x1, got {}x{}",
            img.width(),
            img.height()
        )));
    }

    let channels = img.color().channel_count();
    if channels != 3 {
        return Err(ExtractError::invalid(format!(
            "expected 3 color channels, got {} ({:?})",
            channels,
            img.color()
        )));
    }

    Ok(())
}

/// Wrap a raw interleaved height x width x channels buffer as an RGB image
pub fn rgb_from_raw(
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
) -> Result<DynamicImage, ExtractError> {
    if channels != 3 {
        return Err(ExtractError::invalid(format!(
            "expected 3 color channels, got {}",
            channels
        )));
    }
    if width == 0 || height == 0 {
        return Err(ExtractError::invalid(format!(
            "image must be at least 1x1, got {}x{}",
            width, height
        )));
    }

    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(ExtractError::invalid(format!(
            "pixel buffer holds {} bytes, a {}x{} RGB image needs {}",
            pixels.len(),
            width,
            height,
            expected
        )));
    }

    RgbImage::from_raw(width, height, pixels)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| ExtractError::invalid("pixel buffer does not fit the image dimensions"))
}

/// Convert image to grayscale using luma weights
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Stretch to exactly `width` x `height` with bilinear interpolation
pub fn resize_canonical(img: &GrayImage, width: u32, height: u32) -> GrayImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    image::imageops::resize(img, width, height, FilterType::Triangle)
}
