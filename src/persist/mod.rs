//! Result artifacts: the annotated image and its detection JSON.
//!
//! Layout: `<results_root>/<stem>/<stem>_<timestamp>.png` plus the `.json`
//! with the same base name. Timestamps are UTC `YYYYMMDD_HHMMSS_mmm`; when
//! either file already exists a `_<n>` suffix is appended.

use crate::geometry::{Corners, Rect};
use crate::image::io::save_rgb_image;
use crate::job::AnnotatedRegion;
use crate::label::{Label, RegionKind, Rgb, IGNORE_LABEL};
use crate::search::MatchSet;
use crate::trace::{trace_event, trace_span};
use crate::util::{RegionMatchError, RegionMatchResult};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::OffsetDateTime;

/// One detection in corner-pair form, for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewBox {
    pub label: Label,
    pub color: Rgb,
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl PreviewBox {
    pub fn new(label: Label, color: Rgb, rect: Rect) -> Self {
        let Corners {
            xmin,
            ymin,
            xmax,
            ymax,
        } = rect.to_corners();
        Self {
            label,
            color,
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn corners(&self) -> Corners {
        Corners::new(self.xmin, self.ymin, self.xmax, self.ymax)
    }

    /// Back to origin + size; exact inverse of [`PreviewBox::new`].
    pub fn rect(&self) -> RegionMatchResult<Rect> {
        Rect::from_corners(self.corners())
    }

    /// Operator region with the same corners and label.
    pub fn to_region(&self) -> AnnotatedRegion {
        let kind = if self.label.as_str() == IGNORE_LABEL {
            RegionKind::Ignored
        } else {
            RegionKind::Detectable(self.label.clone())
        };
        AnnotatedRegion::new(self.corners(), kind)
    }
}

/// Flattens a match set into preview boxes, label by label.
pub fn preview_boxes(matches: &MatchSet) -> Vec<PreviewBox> {
    matches
        .detections()
        .map(|(label, color, rect)| PreviewBox::new(label.clone(), color, rect))
        .collect()
}

/// Writes and reads result artifacts under a results root.
#[derive(Clone, Debug)]
pub struct ResultPersister {
    root: PathBuf,
}

impl ResultPersister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `image` and the JSON of `matches`; returns `(image_path, json_path)`.
    ///
    /// If the JSON cannot be written the image is removed again.
    pub fn save(
        &self,
        image: &RgbImage,
        matches: &MatchSet,
        stem: &str,
    ) -> RegionMatchResult<(PathBuf, PathBuf)> {
        let _span = trace_span!("save_results", stem = stem).entered();
        let dir = self.root.join(stem);
        std::fs::create_dir_all(&dir).map_err(|err| RegionMatchError::persistence(&dir, err))?;

        let stamp = timestamp(OffsetDateTime::now_utc())
            .map_err(|err| RegionMatchError::persistence(&dir, err))?;
        let base = format!("{stem}_{stamp}");
        let (image_path, json_path) = free_pair(&dir, &base);

        let json = serde_json::to_string_pretty(matches)
            .map_err(|err| RegionMatchError::persistence(&json_path, err))?;
        save_rgb_image(image, &image_path)?;
        if let Err(err) = std::fs::write(&json_path, json) {
            let _ = std::fs::remove_file(&image_path);
            return Err(RegionMatchError::persistence(&json_path, err));
        }

        trace_event!("results_saved", detections = matches.total());
        Ok((image_path, json_path))
    }

    /// Reads a result JSON back as a match set.
    pub fn load(&self, json_path: &Path) -> RegionMatchResult<MatchSet> {
        load_match_set(json_path)
    }
}

/// Reads a result JSON back as a match set.
pub fn load_match_set(json_path: &Path) -> RegionMatchResult<MatchSet> {
    let text = std::fs::read_to_string(json_path)
        .map_err(|err| RegionMatchError::unavailable(json_path, err))?;
    serde_json::from_str(&text).map_err(|err| RegionMatchError::unavailable(json_path, err))
}

/// Reads a result JSON and expands it into corner-pair boxes.
pub fn load_for_preview(json_path: &Path) -> RegionMatchResult<Vec<PreviewBox>> {
    load_match_set(json_path).map(|matches| preview_boxes(&matches))
}

fn timestamp(now: OffsetDateTime) -> Result<String, time::error::Format> {
    let format =
        format_description!("[year][month][day]_[hour][minute][second]_[subsecond digits:3]");
    now.format(format)
}

fn free_pair(dir: &Path, base: &str) -> (PathBuf, PathBuf) {
    let pair = |name: &str| (dir.join(format!("{name}.png")), dir.join(format!("{name}.json")));
    let (mut image_path, mut json_path) = pair(base);
    let mut n = 0u32;
    while image_path.exists() || json_path.exists() {
        n += 1;
        (image_path, json_path) = pair(&format!("{base}_{n}"));
    }
    (image_path, json_path)
}
