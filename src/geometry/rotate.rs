//! Rotation of grayscale patches about their center.

use crate::image::{ImageView, OwnedImage};
use crate::util::math::sin_cos_deg;
use crate::util::RegionMatchResult;

/// Returns the canvas size that holds a `width x height` patch rotated by
/// `angle_deg` without clipping any corner.
///
/// `new_w = floor(h * |sin| + w * |cos|)` and
/// `new_h = floor(h * |cos| + w * |sin|)`, never smaller than one pixel.
pub fn rotated_canvas(width: usize, height: usize, angle_deg: f64) -> (usize, usize) {
    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let (sin_a, cos_a) = (sin_a.abs(), cos_a.abs());
    let w = width as f64;
    let h = height as f64;
    // Absorbs float noise such as 49.999999 for an exact 50.
    let eps = 1e-6;
    let new_w = (h * sin_a + w * cos_a + eps).floor() as usize;
    let new_h = (h * cos_a + w * sin_a + eps).floor() as usize;
    (new_w.max(1), new_h.max(1))
}

/// Rotates a grayscale patch using bilinear sampling on an enlarged canvas.
///
/// Positive angles rotate counter-clockwise on screen (y axis pointing
/// down), the same affine convention as OpenCV's `getRotationMatrix2D`.
/// The source center
/// `((w - 1) / 2, (h - 1) / 2)` maps onto the canvas center, every canvas
/// pixel is mapped back through the inverse rotation, and samples that fall
/// outside the source are set to `fill`. Interpolated values are rounded to
/// the nearest integer and clamped to `[0, 255]`.
pub fn rotate_gray(
    src: ImageView<'_, u8>,
    angle_deg: f64,
    fill: u8,
) -> RegionMatchResult<OwnedImage> {
    let width = src.width();
    let height = src.height();
    let (out_w, out_h) = rotated_canvas(width, height, angle_deg);
    let mut out = vec![fill; out_w * out_h];

    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let cx = (width as f64 - 1.0) * 0.5;
    let cy = (height as f64 - 1.0) * 0.5;
    let ox = (out_w as f64 - 1.0) * 0.5;
    let oy = (out_h as f64 - 1.0) * 0.5;
    let max_x = width as f64 - 1.0;
    let max_y = height as f64 - 1.0;
    let epsilon = 1e-6;

    for y in 0..out_h {
        for x in 0..out_w {
            let dx = x as f64 - ox;
            let dy = y as f64 - oy;
            let src_x = cos_a * dx - sin_a * dy + cx;
            let src_y = sin_a * dx + cos_a * dy + cy;

            if !src_x.is_finite()
                || !src_y.is_finite()
                || src_x < -epsilon
                || src_y < -epsilon
                || src_x > max_x + epsilon
                || src_y > max_y + epsilon
            {
                continue;
            }

            let src_x = src_x.clamp(0.0, max_x);
            let src_y = src_y.clamp(0.0, max_y);
            let x0 = src_x.floor() as usize;
            let y0 = src_y.floor() as usize;
            let x1 = (x0 + 1).min(width - 1);
            let y1 = (y0 + 1).min(height - 1);
            let fx = src_x - x0 as f64;
            let fy = src_y - y0 as f64;

            let (Some(row0), Some(row1)) = (src.row(y0), src.row(y1)) else {
                continue;
            };
            let a = f64::from(row0[x0]);
            let b = f64::from(row0[x1]);
            let c = f64::from(row1[x0]);
            let d = f64::from(row1[x1]);

            let w00 = (1.0 - fx) * (1.0 - fy);
            let w10 = fx * (1.0 - fy);
            let w01 = (1.0 - fx) * fy;
            let w11 = fx * fy;
            let value = a * w00 + b * w10 + c * w01 + d * w11;

            out[y * out_w + x] = value.round().clamp(0.0, 255.0) as u8;
        }
    }

    OwnedImage::new(out, out_w, out_h)
}
