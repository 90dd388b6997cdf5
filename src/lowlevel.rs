//! Low-level building blocks for custom matching pipelines.
//!
//! These expose correlation plans, kernels and the acceptance set for callers
//! that drive scans themselves. Most users should prefer `Session` or
//! `MatchEngine`.

pub use crate::bank::{AngleSweep, RotationBank};
pub use crate::candidate::accept::AcceptedSet;
pub use crate::candidate::peak::Peak;
pub use crate::image::integral::IntegralImage;
pub use crate::kernel::scalar::ZnccScalar;
pub use crate::kernel::{Kernel, ScanParams, SearchImage, SCORE_EPSILON};
pub use crate::preprocess::{equalize_adaptive, open_gray};
pub use crate::search::draw_outline;
pub use crate::template::{template_file_name, TemplatePlan};

#[cfg(feature = "simd")]
pub use crate::kernel::simd::ZnccSimd;

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::scan_full_par;
