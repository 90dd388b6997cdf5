//! Template collection for both job kinds, and the on-disk template library.
//!
//! Library layout: `<root>/<source_image_stem>/<label>/<x><y><w><h>.png`.

use crate::geometry::Rect;
use crate::image::io::{has_image_extension, load_rgb_image, save_rgb_image};
use crate::image::OwnedImage;
use crate::job::{AnnotatedRegion, JobKind, MatchJob};
use crate::label::{Label, RegionKind, IGNORE_LABEL};
use crate::template::Template;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{RegionMatchError, RegionMatchResult};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Fill value painted over ignored areas of the preprocessed search image.
pub(crate) const IGNORE_FILL: u8 = 255;

/// Templates in matching order plus their labels in first-seen order.
#[derive(Debug)]
pub struct Collection {
    pub templates: Vec<Template>,
    pub labels: Vec<Label>,
}

impl Collection {
    fn from_templates(templates: Vec<Template>) -> Self {
        let mut labels: Vec<Label> = Vec::new();
        for template in &templates {
            if !labels.contains(template.label()) {
                labels.push(template.label().clone());
            }
        }
        Self { templates, labels }
    }
}

/// File name of a cropped template: its geometry digits concatenated.
pub fn template_file_name(rect: Rect) -> String {
    format!("{}{}{}{}.png", rect.x, rect.y, rect.width, rect.height)
}

/// Root of the template library.
#[derive(Clone, Debug)]
pub struct TemplateLibrary {
    root: PathBuf,
}

impl TemplateLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the crops of `label` taken from image `stem`.
    pub fn label_dir(&self, stem: &str, label: &Label) -> PathBuf {
        self.root.join(stem).join(label.as_str())
    }

    /// Lists selectable library folders, sorted by name.
    ///
    /// A missing root yields an empty list.
    pub fn folders(&self) -> RegionMatchResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        sorted_entries(&self.root, |path| path.is_dir())
            .map(|paths| paths.iter().filter_map(|p| file_name(p)).collect())
    }

    /// Lists the labels stored under `folder`, sorted by name.
    pub fn labels(&self, folder: &str) -> RegionMatchResult<Vec<Label>> {
        let dir = self.folder_dir(folder)?;
        let mut labels = Vec::new();
        for path in sorted_entries(&dir, |path| path.is_dir())? {
            if let Some(label) = label_from_dir(&path) {
                labels.push(label);
            }
        }
        Ok(labels)
    }

    /// Writes a cropped patch and returns its path.
    pub fn store(
        &self,
        stem: &str,
        label: &Label,
        rect: Rect,
        patch: &RgbImage,
    ) -> RegionMatchResult<PathBuf> {
        let path = self.label_dir(stem, label).join(template_file_name(rect));
        save_rgb_image(patch, &path)?;
        Ok(path)
    }

    /// Loads every template under `folder`: label subfolders, then image
    /// files, both in name order.
    ///
    /// A file with an image extension that cannot be decoded fails the load
    /// with `ResourceUnavailable`. Files without an image extension are
    /// skipped with a warning.
    pub fn load_folder(&self, folder: &str) -> RegionMatchResult<Vec<Template>> {
        let dir = self.folder_dir(folder)?;
        let mut templates = Vec::new();
        for label_dir in sorted_entries(&dir, |path| path.is_dir())? {
            let Some(label) = label_from_dir(&label_dir) else {
                continue;
            };
            for file in sorted_entries(&label_dir, |path| path.is_file())? {
                if !has_image_extension(&file) {
                    trace_warn!("non_image_file_skipped", path = file.display().to_string().as_str());
                    continue;
                }
                let patch = load_rgb_image(&file)?;
                templates.push(Template::new(label.clone(), patch).with_path(file));
            }
        }
        Ok(templates)
    }

    fn folder_dir(&self, folder: &str) -> RegionMatchResult<PathBuf> {
        if folder.is_empty()
            || folder == "."
            || folder == ".."
            || folder.contains(|c| matches!(c, '/' | '\\'))
        {
            return Err(RegionMatchError::invalid_job(format!(
                "invalid library folder {folder:?}"
            )));
        }
        let dir = self.root.join(folder);
        if !dir.is_dir() {
            return Err(RegionMatchError::unavailable(&dir, "not a directory"));
        }
        Ok(dir)
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn label_from_dir(path: &Path) -> Option<Label> {
    let name = file_name(path)?;
    if name == IGNORE_LABEL {
        trace_warn!("ignore_folder_skipped", path = path.display().to_string().as_str());
        return None;
    }
    match Label::new(name) {
        Ok(label) => Some(label),
        Err(err) => {
            trace_warn!(
                "invalid_label_folder_skipped",
                path = path.display().to_string().as_str(),
                reason = err.to_string().as_str()
            );
            None
        }
    }
}

fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> RegionMatchResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|err| RegionMatchError::unavailable(dir, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| RegionMatchError::unavailable(dir, err))?;
        let path = entry.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Builds the job's templates.
///
/// Annotate jobs paint ignored regions of the preprocessed `search` image
/// white, sort source regions by area (largest first, input order on ties),
/// crop each from the unmasked source pixels and store the crop in the
/// library. File jobs load the selected library folders and leave `search`
/// untouched.
pub fn collect_templates(
    job: &MatchJob,
    search: &mut OwnedImage,
    library: &TemplateLibrary,
) -> RegionMatchResult<Collection> {
    let _span = trace_span!("collect_templates").entered();
    let templates = match &job.kind {
        JobKind::Annotate { regions } => collect_annotate(job, regions, search, library)?,
        JobKind::File { folders } => {
            let mut templates = Vec::new();
            for folder in folders {
                templates.extend(library.load_folder(folder)?);
            }
            templates
        }
    };
    if templates.is_empty() {
        return Err(RegionMatchError::invalid_job(
            "no templates: supply at least one labeled region or library folder",
        ));
    }
    let collection = Collection::from_templates(templates);
    trace_event!(
        "templates_collected",
        templates = collection.templates.len(),
        labels = collection.labels.len()
    );
    Ok(collection)
}

fn collect_annotate(
    job: &MatchJob,
    regions: &[AnnotatedRegion],
    search: &mut OwnedImage,
    library: &TemplateLibrary,
) -> RegionMatchResult<Vec<Template>> {
    let pixels = job.source.pixels();
    let (img_w, img_h) = pixels.dimensions();

    let mut ignored = Vec::new();
    let mut sources = Vec::new();
    for region in regions {
        let rect = region
            .rect()?
            .clip_to(img_w, img_h)
            .ok_or(RegionMatchError::InvalidGeometry {
                xmin: region.corners.xmin,
                ymin: region.corners.ymin,
                xmax: region.corners.xmax,
                ymax: region.corners.ymax,
            })?;
        match &region.kind {
            RegionKind::Ignored => ignored.push(rect),
            RegionKind::Detectable(label) => sources.push((label, rect)),
        }
    }

    for rect in &ignored {
        search.fill_rect(*rect, IGNORE_FILL);
    }

    sources.sort_by(|a, b| b.1.area().cmp(&a.1.area()));

    let stem = job.source.stem();
    let mut templates = Vec::with_capacity(sources.len());
    for (label, rect) in sources {
        let patch =
            image::imageops::crop_imm(pixels, rect.x, rect.y, rect.width, rect.height).to_image();
        let path = library.store(&stem, label, rect, &patch)?;
        templates.push(Template::new(label.clone(), patch).with_path(path));
    }
    Ok(templates)
}
