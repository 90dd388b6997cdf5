//! Error types for regionmatch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for regionmatch operations.
pub type RegionMatchResult<T> = std::result::Result<T, RegionMatchError>;

/// Errors that can occur while collecting templates, matching or persisting.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RegionMatchError {
    /// A source image, template file or library folder could not be read.
    #[error("resource unavailable: {}: {reason}", .path.display())]
    ResourceUnavailable { path: PathBuf, reason: String },
    /// The job cannot run as specified (no templates, bad thresholds, bad labels).
    #[error("invalid job: {reason}")]
    InvalidJob { reason: String },
    /// A region rectangle has non-positive size or lies outside the image.
    #[error("invalid geometry: ({xmin}, {ymin})-({xmax}, {ymax})")]
    InvalidGeometry {
        xmin: i64,
        ymin: i64,
        xmax: i64,
        ymax: i64,
    },
    /// Creating a directory or writing an artifact failed.
    #[error("persistence failed: {}: {reason}", .path.display())]
    Persistence { path: PathBuf, reason: String },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Width or height is zero or overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Template statistics cannot be normalized.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
}

impl RegionMatchError {
    pub(crate) fn invalid_job(reason: impl Into<String>) -> Self {
        Self::InvalidJob {
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ResourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
