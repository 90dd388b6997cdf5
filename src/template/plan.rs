//! Template plan precomputation for ZNCC.

use crate::image::ImageView;
use crate::util::{RegionMatchError, RegionMatchResult};

/// Zero-mean template buffer and its centered energy.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    var_t: f64,
    t_prime: Vec<f32>,
}

impl TemplatePlan {
    /// Builds a plan from a preprocessed template view.
    ///
    /// Fails with `DegenerateTemplate` when the template is constant.
    pub fn from_view(tpl: ImageView<'_, u8>) -> RegionMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(RegionMatchError::InvalidDimensions { width, height })?;

        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        for y in 0..height {
            let row = tpl.row(y).ok_or(RegionMatchError::BufferTooSmall {
                needed: (y + 1) * tpl.stride(),
                got: tpl.as_slice().len(),
            })?;
            for &value in row {
                let v = u64::from(value);
                sum += v;
                sum_sq += v * v;
            }
        }

        let n = count as u128;
        let numer = n * u128::from(sum_sq) - u128::from(sum) * u128::from(sum);
        if numer == 0 {
            return Err(RegionMatchError::DegenerateTemplate {
                reason: "zero variance",
            });
        }
        let var_t = numer as f64 / count as f64;
        let mean = sum as f64 / count as f64;

        let mut t_prime = Vec::with_capacity(count);
        for y in 0..height {
            if let Some(row) = tpl.row(y) {
                t_prime.extend(row.iter().map(|&v| (f64::from(v) - mean) as f32));
            }
        }

        Ok(Self {
            width,
            height,
            var_t,
            t_prime,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `sum((t - mean)^2)` over the template.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.t_prime
    }
}
