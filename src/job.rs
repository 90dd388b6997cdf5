//! The immutable input bundle of one engine run.

use crate::geometry::{Corners, Rect};
use crate::image::io::load_rgb_image;
use crate::label::RegionKind;
use crate::util::{RegionMatchError, RegionMatchResult};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Operator rectangle with its meaning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegionRecord", into = "RegionRecord")]
pub struct AnnotatedRegion {
    pub corners: Corners,
    pub kind: RegionKind,
}

impl AnnotatedRegion {
    pub fn new(corners: Corners, kind: RegionKind) -> Self {
        Self { corners, kind }
    }

    /// Parses the UI label (`"ignore"` becomes `RegionKind::Ignored`).
    pub fn from_ui(
        xmin: i64,
        ymin: i64,
        xmax: i64,
        ymax: i64,
        label: &str,
    ) -> RegionMatchResult<Self> {
        Ok(Self {
            corners: Corners::new(xmin, ymin, xmax, ymax),
            kind: RegionKind::from_label(label)?,
        })
    }

    /// Validated origin + size form of the region.
    pub fn rect(&self) -> RegionMatchResult<Rect> {
        Rect::from_corners(self.corners)
    }
}

/// Wire form `{xmin, ymin, xmax, ymax, label}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RegionRecord {
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
    label: String,
}

impl TryFrom<RegionRecord> for AnnotatedRegion {
    type Error = RegionMatchError;

    fn try_from(r: RegionRecord) -> Result<Self, Self::Error> {
        AnnotatedRegion::from_ui(r.xmin, r.ymin, r.xmax, r.ymax, &r.label)
    }
}

impl From<AnnotatedRegion> for RegionRecord {
    fn from(r: AnnotatedRegion) -> Self {
        RegionRecord {
            xmin: r.corners.xmin,
            ymin: r.corners.ymin,
            xmax: r.corners.xmax,
            ymax: r.corners.ymax,
            label: r.kind.as_str().to_owned(),
        }
    }
}

/// Where templates come from.
#[derive(Clone, Debug, PartialEq)]
pub enum JobKind {
    /// Crop templates from the operator's regions on the source image.
    Annotate { regions: Vec<AnnotatedRegion> },
    /// Load templates from the named template library folders.
    File { folders: Vec<String> },
}

/// Thresholds and rotation sweep of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchParams {
    /// Minimum correlation score, in `(0, 1]`.
    pub accuracy: f32,
    /// Maximum overlap ratio between accepted detections, in `(0, 1]`.
    pub overlap: f32,
    /// Rotation step in degrees; 0 disables rotation.
    pub rotation_step: u32,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            accuracy: 0.8,
            overlap: 0.2,
            rotation_step: 0,
        }
    }
}

impl MatchParams {
    pub fn validate(&self) -> RegionMatchResult<()> {
        if !(self.accuracy > 0.0 && self.accuracy <= 1.0) {
            return Err(RegionMatchError::invalid_job(format!(
                "accuracy {} outside (0, 1]",
                self.accuracy
            )));
        }
        if !(self.overlap > 0.0 && self.overlap <= 1.0) {
            return Err(RegionMatchError::invalid_job(format!(
                "overlap {} outside (0, 1]",
                self.overlap
            )));
        }
        Ok(())
    }
}

/// Raw source pixels plus the path they came from.
#[derive(Clone, Debug)]
pub struct SourceImage {
    path: PathBuf,
    pixels: RgbImage,
}

impl SourceImage {
    /// Loads the image at `path`; failures are `ResourceUnavailable`.
    pub fn open(path: impl AsRef<Path>) -> RegionMatchResult<Self> {
        let path = path.as_ref();
        let pixels = load_rgb_image(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            pixels,
        })
    }

    /// Wraps pixels the caller already decoded.
    pub fn new(path: impl Into<PathBuf>, pixels: RgbImage) -> Self {
        Self {
            path: path.into(),
            pixels,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// File stem used to key the template library and result folders.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "image".to_owned())
    }
}

/// One engine invocation.
#[derive(Clone, Debug)]
pub struct MatchJob {
    pub source: SourceImage,
    pub kind: JobKind,
    pub params: MatchParams,
}

impl MatchJob {
    pub fn annotate(
        source: SourceImage,
        regions: Vec<AnnotatedRegion>,
        params: MatchParams,
    ) -> Self {
        Self {
            source,
            kind: JobKind::Annotate { regions },
            params,
        }
    }

    pub fn file(source: SourceImage, folders: Vec<String>, params: MatchParams) -> Self {
        Self {
            source,
            kind: JobKind::File { folders },
            params,
        }
    }
}
