//! SIMD-accelerated kernel using the `wide` crate.
//!
//! The inner template pixel loop is vectorized to process 8 pixels at a time
//! using `f32x8`; window statistics still come from the integral image.

use crate::image::ImageView;
use crate::kernel::Kernel;
use crate::template::TemplatePlan;
use wide::f32x8;

const LANES: usize = 8;

/// Load 8 u8 values and convert to f32x8.
#[inline]
fn load_u8x8_as_f32x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}

#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Horizontal sum of f32x8.
#[inline]
fn hsum(v: f32x8) -> f32 {
    v.to_array().iter().sum()
}

/// SIMD ZNCC kernel.
///
/// Rows are reduced to `f64` one at a time to bound `f32` error growth on
/// large templates.
pub struct ZnccSimd;

impl Kernel for ZnccSimd {
    fn dot_at(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize) -> f64 {
        let tpl_width = plan.width();
        let t_prime = plan.t_prime();
        let simd_end = tpl_width / LANES * LANES;

        let mut dot = 0.0f64;
        for ty in 0..plan.height() {
            let Some(img_row) = image.row(y + ty) else {
                break;
            };
            let base = ty * tpl_width;

            let mut acc = f32x8::ZERO;
            let mut tx = 0;
            while tx < simd_end {
                let img_vals = load_u8x8_as_f32x8(&img_row[x + tx..]);
                let tpl_vals = load_f32x8(&t_prime[base + tx..]);
                acc += tpl_vals * img_vals;
                tx += LANES;
            }

            let mut rest = 0.0f32;
            while tx < tpl_width {
                rest += t_prime[base + tx] * img_row[x + tx] as f32;
                tx += 1;
            }
            dot += f64::from(hsum(acc)) + f64::from(rest);
        }
        dot
    }
}
