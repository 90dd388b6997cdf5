//! Caller-owned context for engine runs.
//!
//! A `Session` bundles the storage layout with preprocessing and engine
//! settings. Nothing is kept between runs except what lands on disk.

use crate::job::MatchJob;
use crate::label::LabelColorTable;
use crate::persist::{load_for_preview, PreviewBox, ResultPersister};
use crate::preprocess::PreprocessConfig;
use crate::search::{EngineConfig, MatchEngine, MatchOutcome, MatchSet};
use crate::template::TemplateLibrary;
use crate::trace::{trace_event, trace_span};
use crate::util::{RegionMatchError, RegionMatchResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk roots for the template library and the results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLayout {
    pub templates_root: PathBuf,
    pub results_root: PathBuf,
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self {
            templates_root: PathBuf::from("templates"),
            results_root: PathBuf::from("results"),
        }
    }
}

impl StorageLayout {
    /// `templates/` and `results/` under `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            templates_root: root.join("templates"),
            results_root: root.join("results"),
        }
    }

    pub fn library(&self) -> TemplateLibrary {
        TemplateLibrary::new(&self.templates_root)
    }

    pub fn persister(&self) -> ResultPersister {
        ResultPersister::new(&self.results_root)
    }
}

/// What a saved run hands back to the caller.
#[derive(Clone, Debug)]
pub struct JobReport {
    pub image_path: PathBuf,
    pub json_path: PathBuf,
    /// The persisted JSON text.
    pub json: String,
    /// Detections reconstructed from the persisted JSON.
    pub boxes: Vec<PreviewBox>,
    pub total: usize,
    pub matches: MatchSet,
    pub colors: LabelColorTable,
}

/// Explicit context passed into every engine call.
#[derive(Clone, Debug, Default)]
pub struct Session {
    layout: StorageLayout,
    engine: MatchEngine,
}

impl Session {
    pub fn new(layout: StorageLayout) -> Self {
        Self {
            layout,
            engine: MatchEngine::default(),
        }
    }

    pub fn with_config(mut self, preprocess: PreprocessConfig, config: EngineConfig) -> Self {
        self.engine = MatchEngine::new(preprocess, config);
        self
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn library(&self) -> TemplateLibrary {
        self.layout.library()
    }

    /// Runs `job` without writing result artifacts.
    ///
    /// Annotate jobs still store their cropped templates in the library.
    pub fn run(&self, job: &MatchJob) -> RegionMatchResult<MatchOutcome> {
        let _span = trace_span!("session_run", stem = job.source.stem().as_str()).entered();
        let outcome = self.engine.run(job, &self.library())?;
        trace_event!("session_run_finished", total = outcome.total);
        Ok(outcome)
    }

    /// Runs `job`, persists the annotated image and JSON, and reads the JSON
    /// back for preview.
    pub fn run_and_save(&self, job: &MatchJob) -> RegionMatchResult<JobReport> {
        let outcome = self.run(job)?;
        let (image_path, json_path) =
            self.layout
                .persister()
                .save(&outcome.image, &outcome.matches, &job.source.stem())?;
        let json = std::fs::read_to_string(&json_path)
            .map_err(|err| RegionMatchError::unavailable(&json_path, err))?;
        let boxes = load_for_preview(&json_path)?;
        Ok(JobReport {
            image_path,
            json_path,
            json,
            boxes,
            total: outcome.total,
            matches: outcome.matches,
            colors: outcome.colors,
        })
    }
}
