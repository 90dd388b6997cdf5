//! Scalar reference kernel.

use crate::image::ImageView;
use crate::kernel::Kernel;
use crate::template::TemplatePlan;

/// Scalar ZNCC kernel with `f64` accumulation.
pub struct ZnccScalar;

impl Kernel for ZnccScalar {
    fn dot_at(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize) -> f64 {
        let tpl_width = plan.width();
        let t_prime = plan.t_prime();
        let mut dot = 0.0f64;
        for ty in 0..plan.height() {
            let Some(img_row) = image.row(y + ty) else {
                break;
            };
            let base = ty * tpl_width;
            let window = &img_row[x..x + tpl_width];
            for (t, &value) in t_prime[base..base + tpl_width].iter().zip(window) {
                dot += f64::from(*t) * f64::from(value);
            }
        }
        dot
    }
}

#[cfg(test)]
mod tests {
    use super::ZnccScalar;
    use crate::image::ImageView;
    use crate::kernel::{Kernel, ScanParams, SearchImage};
    use crate::template::TemplatePlan;

    #[test]
    fn zncc_scan_matches_bruteforce() {
        let img_width = 6;
        let img_height = 5;
        let mut image = Vec::with_capacity(img_width * img_height);
        for y in 0..img_height {
            for x in 0..img_width {
                image.push(((x * 17 + y * 9 + x * y) & 0xFF) as u8);
            }
        }
        let tpl_width = 3;
        let tpl_height = 2;
        let mut tpl = Vec::with_capacity(tpl_width * tpl_height);
        for y in 0..tpl_height {
            for x in 0..tpl_width {
                tpl.push(((x * 5 + y * 11 + x * y) & 0xFF) as u8);
            }
        }

        let image_view = ImageView::from_slice(&image, img_width, img_height).unwrap();
        let search = SearchImage::new(image_view);
        let tpl_view = ImageView::from_slice(&tpl, tpl_width, tpl_height).unwrap();
        let plan = TemplatePlan::from_view(tpl_view).unwrap();

        let params = ScanParams {
            min_score: f64::NEG_INFINITY,
            min_var_i: 1e-8,
        };
        let peaks = ZnccScalar::scan_full(&search, &plan, params);

        let t_mean = tpl.iter().map(|&v| v as f64).sum::<f64>() / tpl.len() as f64;
        let var_t: f64 = tpl.iter().map(|&v| (v as f64 - t_mean).powi(2)).sum();
        let n = (tpl_width * tpl_height) as f64;
        let mut expected = Vec::new();
        for y in 0..=(img_height - tpl_height) {
            for x in 0..=(img_width - tpl_width) {
                let mut dot = 0.0f64;
                let mut sum_i = 0.0f64;
                let mut sum_i2 = 0.0f64;
                for ty in 0..tpl_height {
                    for tx in 0..tpl_width {
                        let value = image[(y + ty) * img_width + x + tx] as f64;
                        let t = tpl[ty * tpl_width + tx] as f64 - t_mean;
                        dot += t * value;
                        sum_i += value;
                        sum_i2 += value * value;
                    }
                }
                let var_i = sum_i2 - (sum_i * sum_i) / n;
                if var_i <= 1e-8 {
                    continue;
                }
                expected.push((x, y, dot / (var_t * var_i).sqrt()));
            }
        }

        assert_eq!(peaks.len(), expected.len());
        for (peak, (x, y, score)) in peaks.iter().zip(expected) {
            assert_eq!((peak.x, peak.y), (x, y));
            assert!((peak.score - score).abs() < 1e-5);
        }
    }

    #[test]
    fn flat_windows_produce_no_score() {
        let image = vec![7u8; 16];
        let view = ImageView::from_slice(&image, 4, 4).unwrap();
        let search = SearchImage::new(view);
        let tpl = [0u8, 255, 255, 0];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 2, 2).unwrap()).unwrap();
        assert_eq!(ZnccScalar::score_at(&search, &plan, 1, 1, 0.0), None);
        assert_eq!(ZnccScalar::score_at(&search, &plan, 3, 3, 0.0), None);
    }

    #[test]
    fn oversized_template_yields_nothing() {
        let image: Vec<u8> = (0..9).map(|v| v * 20).collect();
        let search = SearchImage::new(ImageView::from_slice(&image, 3, 3).unwrap());
        let tpl: Vec<u8> = (0..16).map(|v| v * 10).collect();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 4, 4).unwrap()).unwrap();
        let params = ScanParams {
            min_score: -1.0,
            min_var_i: 0.0,
        };
        assert!(ZnccScalar::scan_full(&search, &plan, params).is_empty());
    }
}
