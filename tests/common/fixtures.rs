use std::path::{Path, PathBuf};

use ecosort::classifier::{Kernel, PlattScaling, SvmModel};
use ecosort::{ClassifierArtifact, HogConfig, Provenance, WasteCategory};
use image::{DynamicImage, Rgb, RgbImage};

/// Descriptor length of the default extractor configuration
pub const DEFAULT_LEN: usize = 3780;

/// Single-color RGB image
pub fn solid_image(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

/// Gray-valued diagonal stripes with values in [40, 179], plenty of edges
pub fn textured_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let v = (40 + (x * 7 + y * 13) % 140) as u8;
        Rgb([v, v, v])
    });
    DynamicImage::ImageRgb8(img)
}

/// Add `delta` to every channel of every pixel
pub fn brightened(img: &DynamicImage, delta: u8) -> DynamicImage {
    let mut rgb = img.to_rgb8();
    for p in rgb.pixels_mut() {
        for c in p.0.iter_mut() {
            *c = c.saturating_add(delta);
        }
    }
    DynamicImage::ImageRgb8(rgb)
}

/// Black left half, white right half
pub fn vertical_edge_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    DynamicImage::ImageRgb8(img)
}

/// Linear model scoring `0.01 * sum(x)`; positive scores mean recyclable
pub fn linear_model(dim: usize) -> SvmModel {
    SvmModel::new(
        Kernel::Linear,
        vec![vec![0.01; dim]],
        vec![1.0],
        0.0,
        PlattScaling { a: -1.0, b: 0.0 },
        WasteCategory::Recyclable,
    )
    .expect("valid linear model")
}

/// RBF model with one support vector per category
pub fn rbf_model(dim: usize) -> SvmModel {
    SvmModel::new(
        Kernel::Rbf { gamma: 0.5 },
        vec![vec![0.0; dim], vec![0.1; dim]],
        vec![1.0, -1.0],
        0.0,
        PlattScaling { a: -4.0, b: 0.0 },
        WasteCategory::Organic,
    )
    .expect("valid rbf model")
}

pub fn default_classifier() -> ecosort::Classifier {
    ecosort::Classifier::from_parts(
        HogConfig::default(),
        linear_model(DEFAULT_LEN),
        Provenance::Trained,
    )
    .expect("compatible classifier")
}

/// Save an artifact for `model` under `dir` and return its path
pub fn write_artifact(dir: &Path, name: &str, model: SvmModel, provenance: Provenance) -> PathBuf {
    let path = dir.join(name);
    ClassifierArtifact::new(HogConfig::default(), model, provenance)
        .expect("compatible artifact")
        .save(&path)
        .expect("Failed to save artifact");
    path
}

/// Small configuration: 32x32 canonical image, 4x4 cells, 3x3 blocks, 324 features
pub fn small_config() -> HogConfig {
    HogConfig {
        canonical_width: 32,
        canonical_height: 32,
        ..HogConfig::default()
    }
}
