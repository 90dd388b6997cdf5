//! Templates: labeled reference patches and their correlation plans.

mod collect;
mod plan;

pub use collect::{
    collect_templates, template_file_name, Collection, TemplateLibrary,
};
pub use plan::TemplatePlan;

use crate::image::io::luma_from_rgb;
use crate::image::OwnedImage;
use crate::label::Label;
use crate::util::RegionMatchResult;
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Labeled reference patch.
///
/// `patch` holds raw (not preprocessed) pixels; `path` is where the patch is
/// stored in the template library, when it is stored at all.
#[derive(Clone, Debug)]
pub struct Template {
    label: Label,
    patch: RgbImage,
    path: Option<PathBuf>,
}

impl Template {
    pub fn new(label: Label, patch: RgbImage) -> Self {
        Self {
            label,
            patch,
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn patch(&self) -> &RgbImage {
        &self.patch
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.patch.width()
    }

    pub fn height(&self) -> u32 {
        self.patch.height()
    }

    /// Returns the luminance plane of the raw patch.
    pub fn luma(&self) -> RegionMatchResult<OwnedImage> {
        luma_from_rgb(&self.patch)
    }
}
