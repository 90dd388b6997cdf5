//! Labels, the ignore sentinel, and per-label colors.

mod color;
mod table;

pub use color::{assign_colors, hsv_to_rgb, Rgb};
pub use table::LabelColorTable;

use crate::util::{RegionMatchError, RegionMatchResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved label marking areas excluded from templating and matching.
pub const IGNORE_LABEL: &str = "ignore";

/// A class name for detections.
///
/// Labels double as directory names in the template library, so they must be
/// non-empty, must not be `.`/`..` and must not contain path separators.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> RegionMatchResult<Self> {
        let name = name.into();
        if name.is_empty() || name == "." || name == ".." {
            return Err(RegionMatchError::invalid_job(format!("invalid label {name:?}")));
        }
        if name.contains(|c| matches!(c, '/' | '\\' | '\0')) {
            return Err(RegionMatchError::invalid_job(format!(
                "label {name:?} contains a path separator"
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Label {
    type Error = RegionMatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Label::new(value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

/// What an operator region means to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Cropped into a template for this label.
    Detectable(Label),
    /// Masked out of the search image.
    Ignored,
}

impl RegionKind {
    /// Parses a UI label, mapping the `"ignore"` sentinel to `Ignored`.
    pub fn from_label(name: &str) -> RegionMatchResult<Self> {
        if name == IGNORE_LABEL {
            return Ok(Self::Ignored);
        }
        Label::new(name).map(Self::Detectable)
    }

    /// Returns the UI label string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Detectable(label) => label.as_str(),
            Self::Ignored => IGNORE_LABEL,
        }
    }
}
