use image::{Rgb, RgbImage};
use regionmatch::persist::load_match_set;
use regionmatch::{
    load_for_preview, prepare_annotate_data, AnnotatedRegion, Label, MatchJob, MatchParams,
    MatchSet, Rect, RegionKind, RegionMatchError, ResultPersister, Session, SourceImage,
    StorageLayout,
};
use serde_json::{json, Value};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir =
        std::env::temp_dir().join(format!("regionmatch-persist-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn scene() -> RgbImage {
    RgbImage::from_fn(160, 120, |x, y| {
        let inside = (40..80).contains(&x) && (30..70).contains(&y);
        if inside && ((x / 8) + (y / 8)) % 2 == 0 {
            Rgb([20, 20, 20])
        } else if inside {
            Rgb([240, 240, 240])
        } else {
            Rgb([180, 180, 180])
        }
    })
}

#[test]
fn saved_json_follows_label_schema() {
    let root = scratch_dir("schema");
    let session = Session::new(StorageLayout::under(&root));
    let region = AnnotatedRegion::from_ui(40, 30, 80, 70, "tile").unwrap();
    let job = MatchJob::annotate(
        SourceImage::new(root.join("board.png"), scene()),
        vec![region],
        MatchParams {
            accuracy: 0.95,
            overlap: 0.2,
            rotation_step: 0,
        },
    );

    let report = session.run_and_save(&job).unwrap();
    assert!(report.image_path.starts_with(root.join("results/board")));
    assert_eq!(report.image_path.extension().unwrap(), "png");
    assert_eq!(report.json_path.extension().unwrap(), "json");
    let name = report.json_path.file_stem().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("board_"));
    assert!(report.image_path.is_file());

    let value: Value = serde_json::from_str(&report.json).unwrap();
    let entry = &value["tile"];
    assert_eq!(entry["color"], json!([255, 0, 0]));
    let rects = entry["rects"].as_array().unwrap();
    assert!(rects.contains(&json!([40, 30, 40, 40])));
    assert_eq!(rects.len(), report.total);

    let preview = report
        .boxes
        .iter()
        .find(|b| (b.xmin, b.ymin) == (40, 30))
        .unwrap();
    assert_eq!((preview.xmax, preview.ymax), (80, 70));
    assert_eq!(preview.label.as_str(), "tile");

    let data = prepare_annotate_data(&report);
    assert_eq!(data.boxes.len(), report.total);
    assert!(data.image.ends_with(".png"));
    let regions = data.regions();
    assert!(regions
        .iter()
        .all(|r| r.kind == RegionKind::Detectable(Label::new("tile").unwrap())));
}

#[test]
fn empty_match_set_writes_empty_object() {
    let root = scratch_dir("empty");
    let persister = ResultPersister::new(&root);
    let image = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
    let (image_path, json_path) = persister.save(&image, &MatchSet::new(), "blank").unwrap();

    assert!(image_path.is_file());
    let text = std::fs::read_to_string(&json_path).unwrap();
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), json!({}));
    assert!(load_for_preview(&json_path).unwrap().is_empty());
}

#[test]
fn preview_round_trips_corners() {
    let root = scratch_dir("roundtrip");
    let persister = ResultPersister::new(&root);
    let a = Label::new("a").unwrap();
    let b = Label::new("b").unwrap();
    let mut matches = MatchSet::new();
    matches.push(&b, regionmatch::Rgb([0, 255, 0]), Rect::new(5, 6, 7, 8));
    matches.push(&a, regionmatch::Rgb([255, 0, 0]), Rect::new(0, 0, 3, 3));
    matches.push(&b, regionmatch::Rgb([0, 255, 0]), Rect::new(20, 1, 2, 9));

    let image = RgbImage::new(32, 32);
    let (_, json_path) = persister.save(&image, &matches, "grid").unwrap();
    assert_eq!(load_match_set(&json_path).unwrap(), matches);

    let boxes = load_for_preview(&json_path).unwrap();
    let labels: Vec<&str> = boxes.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["b", "b", "a"]);
    assert_eq!(
        (boxes[0].xmin, boxes[0].ymin, boxes[0].xmax, boxes[0].ymax),
        (5, 6, 12, 14)
    );
    let rects: Vec<Rect> = boxes.iter().map(|b| b.rect().unwrap()).collect();
    assert_eq!(
        rects,
        vec![Rect::new(5, 6, 7, 8), Rect::new(20, 1, 2, 9), Rect::new(0, 0, 3, 3)]
    );
}

#[test]
fn repeated_saves_do_not_collide() {
    let root = scratch_dir("collide");
    let persister = ResultPersister::new(&root);
    let image = RgbImage::new(4, 4);
    let first = persister.save(&image, &MatchSet::new(), "same").unwrap();
    let second = persister.save(&image, &MatchSet::new(), "same").unwrap();
    assert_ne!(first.0, second.0);
    assert_ne!(first.1, second.1);
    assert!(first.0.is_file() && second.0.is_file());
}

#[test]
fn unwritable_results_root_is_a_persistence_error() {
    let root = scratch_dir("blocked");
    let blocker = root.join("results");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let persister = ResultPersister::new(&blocker);
    let err = persister
        .save(&RgbImage::new(2, 2), &MatchSet::new(), "x")
        .unwrap_err();
    assert!(matches!(err, RegionMatchError::Persistence { .. }));
}

#[test]
fn unreadable_result_json_is_unavailable() {
    let root = scratch_dir("unreadable");
    let err = load_for_preview(&root.join("nope.json")).unwrap_err();
    assert!(matches!(err, RegionMatchError::ResourceUnavailable { .. }));

    let bad = root.join("bad.json");
    std::fs::write(&bad, b"{\"a\": 3}").unwrap();
    assert!(load_for_preview(&bad).is_err());
}
