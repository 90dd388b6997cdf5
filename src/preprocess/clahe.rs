//! Contrast limited adaptive histogram equalization.
//!
//! Each tile gets its own clipped-histogram lookup table; pixels blend the
//! tables of the four nearest tile centers bilinearly. Pixels beyond the
//! outermost tile centers use the nearest table only.

use crate::image::{ImageView, OwnedImage};
use crate::util::{RegionMatchError, RegionMatchResult};

const BINS: usize = 256;

/// Equalizes `image` over a `(columns, rows)` tile grid.
///
/// `clip_limit` is relative to a uniform histogram: a bin may hold at most
/// `clip_limit * tile_area / 256` pixels (at least one); the clipped excess is
/// spread evenly over all bins.
pub fn equalize_adaptive(
    image: ImageView<'_, u8>,
    clip_limit: f32,
    tiles: (usize, usize),
) -> RegionMatchResult<OwnedImage> {
    let width = image.width();
    let height = image.height();
    if tiles.0 == 0 || tiles.1 == 0 {
        return Err(RegionMatchError::InvalidInput("tile grid must be non-zero"));
    }
    let tiles_x = tiles.0.min(width);
    let tiles_y = tiles.1.min(height);

    let mut luts = Vec::with_capacity(tiles_x * tiles_y);
    for ty in 0..tiles_y {
        let y0 = ty * height / tiles_y;
        let y1 = (ty + 1) * height / tiles_y;
        for tx in 0..tiles_x {
            let x0 = tx * width / tiles_x;
            let x1 = (tx + 1) * width / tiles_x;
            luts.push(tile_lut(image, x0, y0, x1, y1, clip_limit));
        }
    }

    let tile_w = width as f32 / tiles_x as f32;
    let tile_h = height as f32 / tiles_y as f32;
    let mut out = vec![0u8; width * height];

    for y in 0..height {
        let (ty1, ty2, ya) = neighbors(y, tile_h, tiles_y);
        let Some(row) = image.row(y) else {
            continue;
        };
        for (x, &value) in row.iter().enumerate() {
            let (tx1, tx2, xa) = neighbors(x, tile_w, tiles_x);
            let v = value as usize;
            let top = (1.0 - xa) * luts[ty1 * tiles_x + tx1][v] as f32
                + xa * luts[ty1 * tiles_x + tx2][v] as f32;
            let bottom = (1.0 - xa) * luts[ty2 * tiles_x + tx1][v] as f32
                + xa * luts[ty2 * tiles_x + tx2][v] as f32;
            let blended = (1.0 - ya) * top + ya * bottom;
            out[y * width + x] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }

    OwnedImage::new(out, width, height)
}

/// Returns the two tile indices around `pos` and the weight of the second.
fn neighbors(pos: usize, tile_size: f32, tiles: usize) -> (usize, usize, f32) {
    let t = (pos as f32 + 0.5) / tile_size - 0.5;
    let first = t.floor();
    let weight = t - first;
    let last = tiles as isize - 1;
    let i1 = (first as isize).clamp(0, last) as usize;
    let i2 = (first as isize + 1).clamp(0, last) as usize;
    (i1, i2, weight)
}

fn tile_lut(
    image: ImageView<'_, u8>,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    clip_limit: f32,
) -> [u8; BINS] {
    let mut hist = [0usize; BINS];
    for y in y0..y1 {
        if let Some(row) = image.row(y) {
            for &value in &row[x0..x1] {
                hist[value as usize] += 1;
            }
        }
    }

    let area = (x1 - x0) * (y1 - y0);
    let limit = ((clip_limit * area as f32 / BINS as f32) as usize).max(1);
    clip_histogram(&mut hist, limit);

    let scale = 255.0 / area as f32;
    let mut lut = [0u8; BINS];
    let mut cdf = 0usize;
    for (bin, count) in hist.iter().enumerate() {
        cdf += count;
        lut[bin] = (cdf as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

fn clip_histogram(hist: &mut [usize; BINS], limit: usize) {
    let mut excess = 0usize;
    for count in hist.iter_mut() {
        if *count > limit {
            excess += *count - limit;
            *count = limit;
        }
    }

    let batch = excess / BINS;
    let mut residual = excess - batch * BINS;
    for count in hist.iter_mut() {
        *count += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut bin = 0;
        while bin < BINS && residual > 0 {
            hist[bin] += 1;
            residual -= 1;
            bin += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{clip_histogram, equalize_adaptive, BINS};
    use crate::image::ImageView;

    #[test]
    fn clipping_preserves_total_count() {
        let mut hist = [0usize; BINS];
        hist[10] = 900;
        hist[200] = 100;
        clip_histogram(&mut hist, 20);
        assert_eq!(hist.iter().sum::<usize>(), 1000);
        assert!(hist[10] <= 20 + 4);
    }

    #[test]
    fn constant_image_stays_constant() {
        let data = vec![90u8; 40 * 30];
        let view = ImageView::from_slice(&data, 40, 30).unwrap();
        let out = equalize_adaptive(view, 2.0, (2, 2)).unwrap();
        let first = out.data()[0];
        assert!(out.data().iter().all(|&v| v == first));
    }

    #[test]
    fn mapping_is_monotonic_within_a_tile() {
        let width = 64;
        let data: Vec<u8> = (0..width * 8).map(|i| (i % width * 4) as u8).collect();
        let view = ImageView::from_slice(&data, width, 8).unwrap();
        let out = equalize_adaptive(view, 2.0, (1, 1)).unwrap();
        let row = &out.data()[..width];
        assert!(row.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn image_smaller_than_grid_is_handled() {
        let data = [10u8, 200, 30, 40];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        let out = equalize_adaptive(view, 2.0, (8, 8)).unwrap();
        assert_eq!((out.width(), out.height()), (2, 2));
    }
}
