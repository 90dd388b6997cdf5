//! Grayscale opening with a small square structuring element.

use crate::image::io::{gray_image_from_view, owned_from_gray_image};
use crate::image::{ImageView, OwnedImage};
use crate::util::{RegionMatchError, RegionMatchResult};
use image::{GrayImage, Luma};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};

/// Largest structuring element side; mask anchors are stored as `u8`.
pub const MAX_OPEN_SIZE: usize = 255;

/// Erodes then dilates with a `size x size` square.
///
/// The dilation uses the reflected element so bright structures at least
/// `size` pixels wide come back at their original position; narrower bright
/// specks are removed. Samples outside the image are ignored. `size <= 1`
/// returns a copy.
pub fn open_gray(image: ImageView<'_, u8>, size: usize) -> RegionMatchResult<OwnedImage> {
    if size > MAX_OPEN_SIZE {
        return Err(RegionMatchError::InvalidInput("open_size must be <= 255"));
    }
    let gray = gray_image_from_view(image)?;
    if size <= 1 {
        return owned_from_gray_image(&gray);
    }

    let anchor = (size / 2) as u8;
    let reflected = (size - 1) as u8 - anchor;
    let square = GrayImage::from_pixel(size as u32, size as u32, Luma([255]));

    let eroded = grayscale_erode(&gray, &Mask::from_image(&square, anchor, anchor));
    let opened = grayscale_dilate(&eroded, &Mask::from_image(&square, reflected, reflected));
    owned_from_gray_image(&opened)
}

#[cfg(test)]
mod tests {
    use super::open_gray;
    use crate::image::ImageView;
    use crate::util::RegionMatchError;

    /// Direct min-then-max over the clipped window, offsets relative to `(x, y)`.
    fn reference_open(data: &[u8], w: usize, h: usize, size: usize) -> Vec<u8> {
        let anchor = (size / 2) as isize;
        let reflected = (size - 1) as isize - anchor;
        let pass = |src: &[u8], from: isize, to: isize, erode: bool| {
            let mut out = vec![0u8; src.len()];
            for y in 0..h as isize {
                for x in 0..w as isize {
                    let mut acc = if erode { u8::MAX } else { 0 };
                    for dy in from..=to {
                        for dx in from..=to {
                            let (sx, sy) = (x + dx, y + dy);
                            if sx < 0 || sy < 0 || sx >= w as isize || sy >= h as isize {
                                continue;
                            }
                            let v = src[sy as usize * w + sx as usize];
                            acc = if erode { acc.min(v) } else { acc.max(v) };
                        }
                    }
                    out[y as usize * w + x as usize] = acc;
                }
            }
            out
        };
        let eroded = pass(data, -anchor, reflected, true);
        pass(&eroded, -reflected, anchor, false)
    }

    #[test]
    fn removes_isolated_bright_pixel() {
        let mut data = vec![10u8; 9 * 9];
        data[4 * 9 + 4] = 250;
        let view = ImageView::from_slice(&data, 9, 9).unwrap();
        let out = open_gray(view, 2).unwrap();
        assert!(out.data().iter().all(|&v| v == 10));
    }

    #[test]
    fn keeps_blocks_in_place() {
        let width = 12;
        let mut data = vec![10u8; width * width];
        for y in 3..7 {
            for x in 5..9 {
                data[y * width + x] = 200;
            }
        }
        let view = ImageView::from_slice(&data, width, width).unwrap();
        let out = open_gray(view, 2).unwrap();
        assert_eq!(out.data(), data.as_slice());
    }

    #[test]
    fn matches_direct_window_filter() {
        for &(w, h, size) in &[(41usize, 29usize, 2usize), (7, 3, 2), (23, 17, 3), (16, 16, 4)] {
            let data: Vec<u8> = (0..w * h)
                .map(|i| ((i * 97 + (i / w) * 13) % 251) as u8)
                .collect();
            let view = ImageView::from_slice(&data, w, h).unwrap();
            let out = open_gray(view, size).unwrap();
            assert_eq!(out.data(), reference_open(&data, w, h, size).as_slice(), "{w}x{h} size {size}");
        }
    }

    #[test]
    fn reads_strided_views() {
        let padded: Vec<u8> = (0..6 * 4).map(|i| (i * 11 % 256) as u8).collect();
        let view = ImageView::new(&padded, 4, 4, 6).unwrap();
        let out = open_gray(view, 1).unwrap();
        assert_eq!(&out.data()[4..8], &padded[6..10]);
    }

    #[test]
    fn oversized_element_is_rejected() {
        let data = vec![0u8; 16];
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        assert_eq!(
            open_gray(view, 256).err(),
            Some(RegionMatchError::InvalidInput("open_size must be <= 255"))
        );
    }

    #[test]
    fn size_one_is_identity() {
        let data: Vec<u8> = (0..25).map(|v| (v * 9) as u8).collect();
        let view = ImageView::from_slice(&data, 5, 5).unwrap();
        assert_eq!(open_gray(view, 1).unwrap().data(), data.as_slice());
    }
}
