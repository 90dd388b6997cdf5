//! RegionMatch finds every occurrence of operator-labeled image regions.
//!
//! Regions drawn on a source image become templates (or templates are loaded
//! from a library on disk). Each template is matched against the normalized
//! image with zero-mean normalized cross-correlation, optionally over a sweep
//! of rotation angles. Detections are deduplicated across all labels by area
//! overlap, drawn on the image, and persisted as an image plus JSON.
//!
//! Optional features: `rayon` (parallel scans), `simd` (`wide` dot
//! products) and `tracing` (spans and events).

pub mod annotation;
pub mod bank;
mod candidate;
pub mod geometry;
pub mod image;
pub mod job;
pub mod kernel;
pub mod label;
pub mod lowlevel;
pub mod persist;
pub mod preprocess;
pub mod search;
pub mod session;
pub mod template;
mod trace;
pub mod util;

pub use annotation::{prepare_annotate_data, AnnotatedImageData};
pub use geometry::{overlap_ratio, overlaps, rotate_gray, Corners, Rect};
pub use crate::image::{ImageView, OwnedImage};
pub use job::{AnnotatedRegion, JobKind, MatchJob, MatchParams, SourceImage};
pub use label::{assign_colors, Label, LabelColorTable, RegionKind, Rgb, IGNORE_LABEL};
pub use persist::{load_for_preview, PreviewBox, ResultPersister};
pub use preprocess::{preprocess, preprocess_rgb, PreprocessConfig};
pub use search::{EngineConfig, LabelMatches, MatchEngine, MatchOutcome, MatchSet};
pub use session::{JobReport, Session, StorageLayout};
pub use template::{collect_templates, Collection, Template, TemplateLibrary};
pub use util::{RegionMatchError, RegionMatchResult};
