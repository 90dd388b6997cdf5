//! Per-template rotation banks.
//!
//! A bank holds the luminance plane of one template and lazily builds the
//! correlation plan for each angle of the sweep: rotate the raw luminance,
//! then preprocess the rotated patch. Each slot is populated at most once and
//! stored in a `OnceLock`, so angles can be compiled from parallel workers.

mod angles;

pub use angles::AngleSweep;

use crate::geometry::rotate_gray;
use crate::image::OwnedImage;
use crate::preprocess::{preprocess, PreprocessConfig};
use crate::template::{Template, TemplatePlan};
use crate::trace::trace_warn;
use crate::util::{RegionMatchError, RegionMatchResult};
use std::sync::OnceLock;

/// Fill value for canvas area not covered by the rotated template.
pub const ROTATION_FILL: u8 = 0;

/// Preprocessed plan for one angle; `None` when the rotated template is flat.
pub(crate) struct RotatedPlan {
    angle_deg: u32,
    plan: Option<TemplatePlan>,
}

impl RotatedPlan {
    pub(crate) fn angle_deg(&self) -> u32 {
        self.angle_deg
    }

    pub(crate) fn plan(&self) -> Option<&TemplatePlan> {
        self.plan.as_ref()
    }
}

/// Rotation bank of a single template.
pub struct RotationBank {
    luma: OwnedImage,
    sweep: AngleSweep,
    cfg: PreprocessConfig,
    slots: Vec<OnceLock<RotatedPlan>>,
}

impl RotationBank {
    /// Prepares a bank; no angle is compiled yet.
    pub fn new(
        template: &Template,
        sweep: AngleSweep,
        cfg: PreprocessConfig,
    ) -> RegionMatchResult<Self> {
        let luma = template.luma()?;
        let slots = (0..sweep.len()).map(|_| OnceLock::new()).collect();
        Ok(Self {
            luma,
            sweep,
            cfg,
            slots,
        })
    }

    pub fn sweep(&self) -> &AngleSweep {
        &self.sweep
    }

    /// Returns the plan for `angle_idx`, building it on first use.
    pub(crate) fn rotated(&self, angle_idx: usize) -> RegionMatchResult<&RotatedPlan> {
        let slot = self
            .slots
            .get(angle_idx)
            .ok_or(RegionMatchError::InvalidInput("angle index out of range"))?;
        if let Some(rotated) = slot.get() {
            return Ok(rotated);
        }
        let angle_deg = self.sweep.angle_at(angle_idx);
        let rotated = self.compile(angle_deg)?;
        Ok(slot.get_or_init(|| rotated))
    }

    fn compile(&self, angle_deg: u32) -> RegionMatchResult<RotatedPlan> {
        let normalized = if angle_deg == 0 {
            preprocess(self.luma.view(), &self.cfg)?
        } else {
            let rotated = rotate_gray(self.luma.view(), f64::from(angle_deg), ROTATION_FILL)?;
            preprocess(rotated.view(), &self.cfg)?
        };
        let plan = match TemplatePlan::from_view(normalized.view()) {
            Ok(plan) => Some(plan),
            Err(RegionMatchError::DegenerateTemplate { .. }) => {
                trace_warn!("degenerate_rotation_skipped", angle_deg = angle_deg);
                None
            }
            Err(err) => return Err(err),
        };
        Ok(RotatedPlan { angle_deg, plan })
    }
}

#[cfg(test)]
mod tests {
    use super::{AngleSweep, RotationBank};
    use crate::label::Label;
    use crate::preprocess::PreprocessConfig;
    use crate::template::Template;
    use image::{Rgb, RgbImage};

    fn striped(width: u32, height: u32) -> Template {
        let patch = RgbImage::from_fn(width, height, |x, _| {
            if x % 6 < 3 {
                Rgb([220, 220, 220])
            } else {
                Rgb([30, 30, 30])
            }
        });
        Template::new(Label::new("stripes").unwrap(), patch)
    }

    #[test]
    fn quarter_turn_swaps_plan_dimensions() {
        let bank =
            RotationBank::new(&striped(24, 12), AngleSweep::new(90), PreprocessConfig::default())
                .unwrap();
        let upright = bank.rotated(0).unwrap();
        let turned = bank.rotated(1).unwrap();
        assert_eq!(upright.angle_deg(), 0);
        assert_eq!(turned.angle_deg(), 90);
        let plan = upright.plan().unwrap();
        assert_eq!((plan.width(), plan.height()), (24, 12));
        let plan = turned.plan().unwrap();
        assert_eq!((plan.width(), plan.height()), (12, 24));
    }

    #[test]
    fn flat_template_compiles_to_none() {
        let patch = RgbImage::from_pixel(10, 10, Rgb([90, 90, 90]));
        let template = Template::new(Label::new("flat").unwrap(), patch);
        let bank =
            RotationBank::new(&template, AngleSweep::new(0), PreprocessConfig::default()).unwrap();
        assert!(bank.rotated(0).unwrap().plan().is_none());
        assert!(bank.rotated(1).is_err());
    }
}
