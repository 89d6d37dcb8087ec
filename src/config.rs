use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Current version of the extractor configuration layout.
pub const HOG_CONFIG_VERSION: u32 = 1;

/// Largest accepted canonical width or height, in pixels
pub const MAX_CANONICAL_SIDE: u32 = 4096;

/// Largest accepted number of orientation bins
pub const MAX_ORIENTATIONS: u32 = 180;

/// Parameters of the gradient-orientation histogram descriptor.
///
/// The extractor and the classifier must agree on every field, so a trained
/// classifier artifact carries the configuration it was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HogConfig {
    pub version: u32,
    /// Width every image is resampled to before extraction
    pub canonical_width: u32,
    /// Height every image is resampled to before extraction
    pub canonical_height: u32,
    /// Cell edge length in pixels
    pub cell_size: u32,
    /// Block edge length in cells
    pub block_size: u32,
    /// Distance between neighbouring blocks, in cells
    pub block_stride: u32,
    /// Number of unsigned orientation bins over [0, 180) degrees
    pub orientations: u32,
    /// L2-Hys clipping threshold
    pub clip_threshold: f32,
}

impl Default for HogConfig {
    fn default() -> Self {
        Self {
            version: HOG_CONFIG_VERSION,
            canonical_width: 64,
            canonical_height: 128,
            cell_size: 8,
            block_size: 2,
            block_stride: 1,
            orientations: 9,
            clip_threshold: 0.2,
        }
    }
}

impl HogConfig {
    /// Number of whole cells along (x, y)
    pub fn cells(&self) -> (u32, u32) {
        (
            self.canonical_width / self.cell_size,
            self.canonical_height / self.cell_size,
        )
    }

    /// Number of blocks along (x, y)
    pub fn blocks(&self) -> (u32, u32) {
        let (cells_x, cells_y) = self.cells();
        (
            cells_x.saturating_sub(self.block_size) / self.block_stride + 1,
            cells_y.saturating_sub(self.block_size) / self.block_stride + 1,
        )
    }

    /// Length of one normalized block vector
    pub fn block_len(&self) -> usize {
        self.checked_block_len().unwrap_or(usize::MAX)
    }

    /// Length of the descriptor produced under this configuration.
    ///
    /// Only meaningful for a configuration that passed [`HogConfig::validate`].
    pub fn descriptor_len(&self) -> usize {
        self.checked_descriptor_len().unwrap_or(usize::MAX)
    }

    fn checked_block_len(&self) -> Option<usize> {
        let side = self.block_size as usize;
        side.checked_mul(side)?.checked_mul(self.orientations as usize)
    }

    fn checked_descriptor_len(&self) -> Option<usize> {
        let (blocks_x, blocks_y) = self.blocks();
        (blocks_x as usize)
            .checked_mul(blocks_y as usize)?
            .checked_mul(self.checked_block_len()?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != HOG_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        if self.canonical_width == 0 || self.canonical_height == 0 {
            return Err(ConfigError::Invalid("canonical size must be non-zero".into()));
        }
        if self.canonical_width > MAX_CANONICAL_SIDE || self.canonical_height > MAX_CANONICAL_SIDE {
            return Err(ConfigError::Invalid(format!(
                "canonical size {}x{} exceeds {}x{}",
                self.canonical_width, self.canonical_height, MAX_CANONICAL_SIDE, MAX_CANONICAL_SIDE
            )));
        }
        if self.cell_size == 0 || self.block_size == 0 || self.block_stride == 0 {
            return Err(ConfigError::Invalid(
                "cell size, block size and block stride must be non-zero".into(),
            ));
        }
        if self.orientations == 0 {
            return Err(ConfigError::Invalid("at least one orientation bin is required".into()));
        }
        if self.orientations > MAX_ORIENTATIONS {
            return Err(ConfigError::Invalid(format!(
                "{} orientation bins requested, at most {} are supported",
                self.orientations, MAX_ORIENTATIONS
            )));
        }
        let (cells_x, cells_y) = self.cells();
        if cells_x < self.block_size || cells_y < self.block_size {
            return Err(ConfigError::Invalid(format!(
                "block of {0}x{0} cells does not fit a {1}x{2} cell grid",
                self.block_size, cells_x, cells_y
            )));
        }
        if self.checked_descriptor_len().is_none() {
            return Err(ConfigError::Invalid("descriptor length overflows".into()));
        }
        if !self.clip_threshold.is_finite() || self.clip_threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "clip threshold must be a positive number, got {}",
                self.clip_threshold
            )));
        }
        Ok(())
    }
}
