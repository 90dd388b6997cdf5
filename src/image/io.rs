//! Conversions between `image` crate buffers and the internal gray buffers,
//! plus load/save helpers that map failures to job-level conditions.

use crate::image::{ImageView, OwnedImage};
use crate::util::{RegionMatchError, RegionMatchResult};
use image::{GrayImage, RgbImage};
use std::path::Path;

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &GrayImage) -> RegionMatchResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Copies a gray view into a contiguous `GrayImage`.
pub fn gray_image_from_view(view: ImageView<'_, u8>) -> RegionMatchResult<GrayImage> {
    let (width, height) = (view.width(), view.height());
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = view.row(y).ok_or(RegionMatchError::BufferTooSmall {
            needed: (y + 1) * view.stride(),
            got: view.as_slice().len(),
        })?;
        data.extend_from_slice(row);
    }
    GrayImage::from_raw(width as u32, height as u32, data)
        .ok_or(RegionMatchError::InvalidDimensions { width, height })
}

/// Converts an RGB image to its luminance plane.
pub fn luma_from_rgb(img: &RgbImage) -> RegionMatchResult<OwnedImage> {
    let gray = image::imageops::grayscale(img);
    owned_from_gray_image(&gray)
}

/// Loads an image from disk as 8-bit RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> RegionMatchResult<RgbImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| RegionMatchError::unavailable(path, err))?;
    Ok(img.to_rgb8())
}

/// Writes an RGB image, creating parent directories as needed.
///
/// The encoder is chosen from the file extension.
pub fn save_rgb_image<P: AsRef<Path>>(img: &RgbImage, path: P) -> RegionMatchResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| RegionMatchError::persistence(parent, err))?;
    }
    img.save(path)
        .map_err(|err| RegionMatchError::persistence(path, err))
}

/// Returns true for a regular file whose extension names an image format.
///
/// The format's decoder may still be compiled out, in which case loading the
/// file fails with `ResourceUnavailable`.
pub fn has_image_extension(path: &Path) -> bool {
    path.is_file() && image::ImageFormat::from_path(path).is_ok()
}
