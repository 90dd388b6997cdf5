//! Summed-area tables for window statistics.
//!
//! Sums are kept as exact `u64` so the variance of a constant window is
//! exactly zero regardless of window size.

use crate::image::ImageView;

/// Integral image of pixel values and squared pixel values.
pub struct IntegralImage {
    width: usize,
    height: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl IntegralImage {
    /// Builds the tables for `image`; each has `(width + 1) * (height + 1)` entries.
    pub fn from_view(image: ImageView<'_, u8>) -> Self {
        let width = image.width();
        let height = image.height();
        let cols = width + 1;
        let mut sum = vec![0u64; cols * (height + 1)];
        let mut sum_sq = vec![0u64; cols * (height + 1)];

        for y in 0..height {
            let row = image.row(y).unwrap_or(&[]);
            let mut acc = 0u64;
            let mut acc_sq = 0u64;
            for (x, &value) in row.iter().enumerate() {
                let v = u64::from(value);
                acc += v;
                acc_sq += v * v;
                let above = y * cols + x + 1;
                let here = (y + 1) * cols + x + 1;
                sum[here] = sum[above] + acc;
                sum_sq[here] = sum_sq[above] + acc_sq;
            }
        }

        Self {
            width,
            height,
            sum,
            sum_sq,
        }
    }

    /// Returns the source image width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the source image height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(sum, sum_of_squares)` over the window at `(x, y)` of size `w x h`.
    ///
    /// The caller guarantees the window lies inside the image.
    pub fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (u64, u64) {
        let cols = self.width + 1;
        let a = y * cols + x;
        let b = y * cols + x + w;
        let c = (y + h) * cols + x;
        let d = (y + h) * cols + x + w;
        let s = self.sum[d] + self.sum[a] - self.sum[b] - self.sum[c];
        let s2 = self.sum_sq[d] + self.sum_sq[a] - self.sum_sq[b] - self.sum_sq[c];
        (s, s2)
    }

    /// Returns the centered sum of squares `sum((v - mean)^2)` of a window.
    pub fn window_variance(&self, x: usize, y: usize, w: usize, h: usize) -> f64 {
        let (s, s2) = self.window(x, y, w, h);
        let n = (w * h) as u128;
        let numer = n * u128::from(s2) - u128::from(s) * u128::from(s);
        numer as f64 / n as f64
    }
}
