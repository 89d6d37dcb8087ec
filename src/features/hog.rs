//! Histogram of oriented gradients over a canonical grayscale image.
//!
//! Gradients come from 3x3 Sobel filters. Every pixel votes its gradient
//! magnitude into one unsigned orientation bin of its cell; cell histograms
//! are averaged over the cell area, grouped into overlapping blocks and
//! normalized per block with L2-Hys.

use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::config::HogConfig;

/// Regularizer added to block norms so empty blocks stay zero
pub const NORM_EPS: f32 = 1e-5;

/// Per-pixel gradient magnitude and unsigned orientation
pub struct GradientField {
    pub width: u32,
    pub height: u32,
    pub magnitude: Vec<f32>,
    /// Degrees in [0, 180)
    pub orientation: Vec<f32>,
}

pub fn gradients(img: &GrayImage) -> GradientField {
    let gx = horizontal_sobel(img);
    let gy = vertical_sobel(img);
    let (width, height) = img.dimensions();

    let len = width as usize * height as usize;
    let mut magnitude = Vec::with_capacity(len);
    let mut orientation = Vec::with_capacity(len);

    for (dx, dy) in gx.pixels().zip(gy.pixels()) {
        let dx = dx[0] as f32;
        let dy = dy[0] as f32;
        magnitude.push(dx.hypot(dy));
        orientation.push(dy.atan2(dx).to_degrees().rem_euclid(180.0));
    }

    GradientField {
        width,
        height,
        magnitude,
        orientation,
    }
}

/// Orientation histograms for every whole cell, row-major, `orientations` bins each
pub fn cell_histograms(field: &GradientField, config: &HogConfig) -> Vec<f32> {
    let (cells_x, cells_y) = config.cells();
    let bins = config.orientations as usize;
    let bin_width = 180.0 / config.orientations as f32;
    let cell = config.cell_size;

    let mut hist = vec![0.0f32; cells_x as usize * cells_y as usize * bins];

    // Pixels past the last whole cell are ignored
    for y in 0..(cells_y * cell).min(field.height) {
        for x in 0..(cells_x * cell).min(field.width) {
            let idx = (y * field.width + x) as usize;
            let bin = ((field.orientation[idx] / bin_width) as usize).min(bins - 1);
            let cell_idx = ((y / cell) * cells_x + x / cell) as usize;
            hist[cell_idx * bins + bin] += field.magnitude[idx];
        }
    }

    let area = (cell * cell) as f32;
    for v in hist.iter_mut() {
        *v /= area;
    }
    hist
}

/// L2-normalize, clip at `clip`, renormalize
pub fn l2_hys(block: &mut [f32], clip: f32) {
    l2_normalize(block);
    for v in block.iter_mut() {
        *v = v.min(clip);
    }
    l2_normalize(block);
}

fn l2_normalize(values: &mut [f32]) {
    let norm = (values.iter().map(|v| v * v).sum::<f32>() + NORM_EPS * NORM_EPS).sqrt();
    for v in values.iter_mut() {
        *v /= norm;
    }
}

/// Full descriptor for an image already at the canonical size
pub fn compute(img: &GrayImage, config: &HogConfig) -> Vec<f32> {
    debug_assert_eq!(
        img.dimensions(),
        (config.canonical_width, config.canonical_height)
    );

    let field = gradients(img);
    let hist = cell_histograms(&field, config);

    let (cells_x, _) = config.cells();
    let (blocks_x, blocks_y) = config.blocks();
    let bins = config.orientations as usize;
    let block_len = config.block_len();

    let mut descriptor = Vec::with_capacity(config.descriptor_len());
    let mut block = Vec::with_capacity(block_len);

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            block.clear();
            for cy in 0..config.block_size {
                for cx in 0..config.block_size {
                    let row = by * config.block_stride + cy;
                    let col = bx * config.block_stride + cx;
                    let start = (row * cells_x + col) as usize * bins;
                    block.extend_from_slice(&hist[start..start + bins]);
                }
            }
            l2_hys(&mut block, config.clip_threshold);
            descriptor.extend_from_slice(&block);
        }
    }

    descriptor
}
