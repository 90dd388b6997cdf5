//! Normalization applied identically to the search image and every
//! (possibly rotated) template before correlation.
//!
//! The pipeline is: luminance, contrast limited adaptive histogram
//! equalization over a small tile grid, then a minimal grayscale opening.
//! Output dimensions always equal input dimensions.

mod clahe;
mod morph;

pub use clahe::equalize_adaptive;
pub use morph::{open_gray, MAX_OPEN_SIZE};

use crate::image::io::luma_from_rgb;
use crate::image::{ImageView, OwnedImage};
use crate::util::{RegionMatchError, RegionMatchResult};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Parameters of the normalization pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Histogram clip limit, relative to a uniform histogram.
    pub clahe_clip_limit: f32,
    /// Tile grid as `(columns, rows)`.
    pub clahe_tiles: (usize, usize),
    /// Side of the square structuring element; 1 disables the opening.
    pub open_size: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            clahe_clip_limit: 2.0,
            clahe_tiles: (2, 2),
            open_size: 2,
        }
    }
}

impl PreprocessConfig {
    pub(crate) fn validate(&self) -> RegionMatchResult<()> {
        if !self.clahe_clip_limit.is_finite() || self.clahe_clip_limit <= 0.0 {
            return Err(RegionMatchError::InvalidInput("clahe_clip_limit must be > 0"));
        }
        if self.clahe_tiles.0 == 0 || self.clahe_tiles.1 == 0 {
            return Err(RegionMatchError::InvalidInput("clahe_tiles must be non-zero"));
        }
        if self.open_size == 0 {
            return Err(RegionMatchError::InvalidInput("open_size must be >= 1"));
        }
        if self.open_size > MAX_OPEN_SIZE {
            return Err(RegionMatchError::InvalidInput("open_size must be <= 255"));
        }
        Ok(())
    }
}

/// Normalizes a luminance buffer.
pub fn preprocess(image: ImageView<'_, u8>, cfg: &PreprocessConfig) -> RegionMatchResult<OwnedImage> {
    let equalized = equalize_adaptive(image, cfg.clahe_clip_limit, cfg.clahe_tiles)?;
    open_gray(equalized.view(), cfg.open_size)
}

/// Converts an RGB image to luminance and normalizes it.
pub fn preprocess_rgb(image: &RgbImage, cfg: &PreprocessConfig) -> RegionMatchResult<OwnedImage> {
    let luma = luma_from_rgb(image)?;
    preprocess(luma.view(), cfg)
}
