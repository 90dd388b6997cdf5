//! Correlation kernel implementations.
//!
//! Every kernel computes the same zero-mean normalized cross-correlation:
//! `sum(t' * I) / sqrt(var_t * var_i)`, where `t'` is the zero-mean template
//! and `var_i` the centered energy of the image window. Window statistics
//! come from an integral image; only the dot product differs per kernel.

use crate::candidate::peak::Peak;
use crate::image::integral::IntegralImage;
use crate::image::ImageView;
use crate::template::TemplatePlan;

/// Scores within this distance below the threshold still count, so an exact
/// self-match passes `accuracy = 1.0` despite `f32` template rounding.
pub const SCORE_EPSILON: f64 = 1e-6;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Minimum score threshold (discard below this value).
    pub min_score: f64,
    /// Image windows with centered energy at or below this are skipped.
    pub min_var_i: f64,
}

/// Preprocessed search image plus its window statistics.
pub struct SearchImage<'a> {
    view: ImageView<'a, u8>,
    integral: IntegralImage,
}

impl<'a> SearchImage<'a> {
    pub fn new(view: ImageView<'a, u8>) -> Self {
        let integral = IntegralImage::from_view(view);
        Self { view, integral }
    }

    pub fn view(&self) -> ImageView<'a, u8> {
        self.view
    }

    pub fn integral(&self) -> &IntegralImage {
        &self.integral
    }

    pub fn width(&self) -> usize {
        self.view.width()
    }

    pub fn height(&self) -> usize {
        self.view.height()
    }

    /// Largest valid top-left placement for a `w x h` template, if any.
    pub fn max_placement(&self, w: usize, h: usize) -> Option<(usize, usize)> {
        if w > self.width() || h > self.height() {
            return None;
        }
        Some((self.width() - w, self.height() - h))
    }
}

/// Kernel trait for scoring and scan operations.
pub trait Kernel {
    /// Returns `sum(t' * I)` for the window at `(x, y)`.
    ///
    /// The caller guarantees the window lies inside the image.
    fn dot_at(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize) -> f64;

    /// Computes the score at a single placement (top-left coordinates).
    ///
    /// Returns `None` for placements outside the image and for flat windows.
    fn score_at(
        image: &SearchImage<'_>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
        min_var_i: f64,
    ) -> Option<f64> {
        let (max_x, max_y) = image.max_placement(plan.width(), plan.height())?;
        if x > max_x || y > max_y {
            return None;
        }
        let var_i = image
            .integral()
            .window_variance(x, y, plan.width(), plan.height());
        if var_i <= min_var_i {
            return None;
        }
        let dot = Self::dot_at(image.view(), plan, x, y);
        let score = dot / (plan.var_t() * var_i).sqrt();
        score.is_finite().then_some(score)
    }

    /// Scans row `y` of placements and appends passing peaks in `x` order.
    fn scan_row(
        image: &SearchImage<'_>,
        plan: &TemplatePlan,
        y: usize,
        max_x: usize,
        params: ScanParams,
        out: &mut Vec<Peak>,
    ) {
        for x in 0..=max_x {
            if let Some(score) = Self::score_at(image, plan, x, y, params.min_var_i) {
                if score + SCORE_EPSILON >= params.min_score {
                    out.push(Peak { x, y, score });
                }
            }
        }
    }

    /// Scans every valid placement and returns passing peaks in row-major order.
    ///
    /// A template larger than the image yields no peaks.
    fn scan_full(image: &SearchImage<'_>, plan: &TemplatePlan, params: ScanParams) -> Vec<Peak> {
        let Some((max_x, max_y)) = image.max_placement(plan.width(), plan.height()) else {
            return Vec::new();
        };
        let mut peaks = Vec::new();
        for y in 0..=max_y {
            Self::scan_row(image, plan, y, max_x, params, &mut peaks);
        }
        peaks
    }
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;
