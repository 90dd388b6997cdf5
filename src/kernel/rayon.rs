//! Rayon-parallel scan (feature-gated).
//!
//! Rows of placements are scored in parallel; results are concatenated in
//! row order so the output matches the sequential row-major scan exactly.

use crate::candidate::peak::Peak;
use crate::kernel::{Kernel, ScanParams, SearchImage};
use crate::template::TemplatePlan;
use rayon::prelude::*;

/// Row-parallel equivalent of [`Kernel::scan_full`].
pub fn scan_full_par<K: Kernel>(
    image: &SearchImage<'_>,
    plan: &TemplatePlan,
    params: ScanParams,
) -> Vec<Peak> {
    let Some((max_x, max_y)) = image.max_placement(plan.width(), plan.height()) else {
        return Vec::new();
    };

    let row_results: Vec<Vec<Peak>> = (0..=max_y)
        .into_par_iter()
        .map(|y| {
            let mut row_peaks = Vec::new();
            K::scan_row(image, plan, y, max_x, params, &mut row_peaks);
            row_peaks
        })
        .collect();

    row_results.into_iter().flatten().collect()
}
