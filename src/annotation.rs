//! Payload exchanged with an image annotation front end.

use crate::job::AnnotatedRegion;
use crate::persist::PreviewBox;
use crate::session::JobReport;
use serde::{Deserialize, Serialize};

/// Image path, boxes and calibration ratio as an annotation widget expects them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedImageData {
    pub image: String,
    #[serde(default)]
    pub boxes: Vec<PreviewBox>,
    #[serde(default)]
    pub calibration_ratio: [f64; 2],
}

impl AnnotatedImageData {
    /// Operator regions for a follow-up annotate job.
    pub fn regions(&self) -> Vec<AnnotatedRegion> {
        self.boxes.iter().map(PreviewBox::to_region).collect()
    }
}

/// Builds the widget payload showing a saved run's annotated image and boxes.
pub fn prepare_annotate_data(report: &JobReport) -> AnnotatedImageData {
    AnnotatedImageData {
        image: report.image_path.display().to_string(),
        boxes: report.boxes.clone(),
        calibration_ratio: [0.0, 0.0],
    }
}
