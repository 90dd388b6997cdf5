//! Correlation, thresholding and first-accepted-wins deduplication.

use crate::bank::{AngleSweep, RotationBank};
use crate::candidate::accept::AcceptedSet;
use crate::candidate::peak::Peak;
use crate::geometry::Rect;
use crate::image::OwnedImage;
use crate::job::{MatchJob, MatchParams};
use crate::kernel::{Kernel, ScanParams, SearchImage};
use crate::label::{assign_colors, LabelColorTable, Rgb};
use crate::preprocess::{preprocess_rgb, PreprocessConfig};
use crate::search::draw::draw_outline;
use crate::search::matchset::MatchSet;
use crate::template::{collect_templates, Collection, Template, TemplateLibrary};
use crate::trace::{trace_event, trace_span};
use crate::util::RegionMatchResult;
use image::RgbImage;
use serde::{Deserialize, Serialize};

#[cfg(feature = "simd")]
type ActiveKernel = crate::kernel::simd::ZnccSimd;
#[cfg(not(feature = "simd"))]
type ActiveKernel = crate::kernel::scalar::ZnccScalar;

/// Engine tuning that does not change which detections are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scan rotation angles (or rows, for a single angle) in parallel.
    /// Only has an effect with the `rayon` feature.
    pub parallel: bool,
    /// Windows whose centered energy is at or below this are never candidates.
    pub min_var_i: f64,
    /// Outline width in pixels on the annotated image.
    pub outline_thickness: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            min_var_i: 1e-6,
            outline_thickness: 2,
        }
    }
}

/// Annotated image, accepted detections and their count.
#[derive(Clone, Debug)]
pub struct MatchOutcome {
    pub image: RgbImage,
    pub matches: MatchSet,
    pub total: usize,
    /// Colors of every label of the run, including labels without detections.
    pub colors: LabelColorTable,
}

struct AngleScan {
    angle_deg: u32,
    width: usize,
    height: usize,
    peaks: Vec<Peak>,
}

/// Template matching engine.
#[derive(Clone, Debug, Default)]
pub struct MatchEngine {
    preprocess: PreprocessConfig,
    config: EngineConfig,
}

impl MatchEngine {
    pub fn new(preprocess: PreprocessConfig, config: EngineConfig) -> Self {
        Self { preprocess, config }
    }

    pub fn preprocess_config(&self) -> &PreprocessConfig {
        &self.preprocess
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs a job end to end: normalize the source image, collect templates
    /// (masking ignored regions) and match every template.
    pub fn run(&self, job: &MatchJob, library: &TemplateLibrary) -> RegionMatchResult<MatchOutcome> {
        job.params.validate()?;
        self.preprocess.validate()?;
        let mut search = preprocess_rgb(job.source.pixels(), &self.preprocess)?;
        let collection = collect_templates(job, &mut search, library)?;
        self.match_collection(job.source.pixels(), &search, &collection, &job.params)
    }

    /// Matches collected templates against an already normalized (and masked)
    /// search image; outlines are drawn on a copy of `pixels`.
    ///
    /// Acceptance order is template order, then ascending angle, then
    /// row-major placement order.
    pub fn match_collection(
        &self,
        pixels: &RgbImage,
        search: &OwnedImage,
        collection: &Collection,
        params: &MatchParams,
    ) -> RegionMatchResult<MatchOutcome> {
        params.validate()?;
        let colors = assign_colors(&collection.labels);
        let sweep = AngleSweep::new(params.rotation_step);
        let search_image = SearchImage::new(search.view());
        let scan = ScanParams {
            min_score: f64::from(params.accuracy),
            min_var_i: self.config.min_var_i,
        };

        let mut canvas = pixels.clone();
        let mut accepted = AcceptedSet::new(f64::from(params.overlap));
        let mut matches = MatchSet::new();

        for template in &collection.templates {
            let _span = trace_span!("match_template", label = template.label().as_str()).entered();
            let color = colors.get(template.label()).unwrap_or(Rgb::WHITE);
            for angle in self.scan_template(&search_image, template, &sweep, scan)? {
                let mut kept = 0usize;
                for peak in &angle.peaks {
                    let rect = Rect::new(
                        peak.x as u32,
                        peak.y as u32,
                        angle.width as u32,
                        angle.height as u32,
                    );
                    if accepted.try_accept(rect) {
                        draw_outline(&mut canvas, rect, color, self.config.outline_thickness);
                        matches.push(template.label(), color, rect);
                        kept += 1;
                    }
                }
                trace_event!(
                    "angle_scanned",
                    angle_deg = angle.angle_deg,
                    candidates = angle.peaks.len(),
                    accepted = kept
                );
            }
        }

        let total = accepted.len();
        trace_event!("matching_finished", total = total, labels = matches.len());
        Ok(MatchOutcome {
            image: canvas,
            matches,
            total,
            colors,
        })
    }

    fn scan_template(
        &self,
        image: &SearchImage<'_>,
        template: &Template,
        sweep: &AngleSweep,
        params: ScanParams,
    ) -> RegionMatchResult<Vec<AngleScan>> {
        let bank = RotationBank::new(template, sweep.clone(), self.preprocess)?;

        #[cfg(feature = "rayon")]
        if self.config.parallel {
            use rayon::prelude::*;
            if sweep.len() == 1 {
                return Ok(vec![scan_angle(image, &bank, 0, params, true)?]);
            }
            return (0..sweep.len())
                .into_par_iter()
                .map(|idx| scan_angle(image, &bank, idx, params, false))
                .collect();
        }

        (0..sweep.len())
            .map(|idx| scan_angle(image, &bank, idx, params, false))
            .collect()
    }
}

fn scan_angle(
    image: &SearchImage<'_>,
    bank: &RotationBank,
    angle_idx: usize,
    params: ScanParams,
    row_parallel: bool,
) -> RegionMatchResult<AngleScan> {
    let rotated = bank.rotated(angle_idx)?;
    let Some(plan) = rotated.plan() else {
        return Ok(AngleScan {
            angle_deg: rotated.angle_deg(),
            width: 0,
            height: 0,
            peaks: Vec::new(),
        });
    };

    #[cfg(feature = "rayon")]
    let peaks = if row_parallel {
        crate::kernel::rayon::scan_full_par::<ActiveKernel>(image, plan, params)
    } else {
        ActiveKernel::scan_full(image, plan, params)
    };
    #[cfg(not(feature = "rayon"))]
    let peaks = {
        let _ = row_parallel;
        ActiveKernel::scan_full(image, plan, params)
    };

    Ok(AngleScan {
        angle_deg: rotated.angle_deg(),
        width: plan.width(),
        height: plan.height(),
        peaks,
    })
}
