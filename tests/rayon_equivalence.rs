#![cfg(feature = "rayon")]

use image::{Rgb, RgbImage};
use regionmatch::lowlevel::{scan_full_par, Kernel, ScanParams, SearchImage, TemplatePlan, ZnccScalar};
use regionmatch::{
    AnnotatedRegion, EngineConfig, ImageView, MatchJob, MatchParams, PreprocessConfig, Session,
    SourceImage, StorageLayout,
};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("regionmatch-rayon-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 11) ^ (y * 3) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

#[test]
fn row_parallel_scan_matches_sequential() {
    let (w, h) = (90, 70);
    let image = make_image(w, h);
    let search = SearchImage::new(ImageView::from_slice(&image, w, h).unwrap());
    let mut tpl = Vec::new();
    for y in 20..32 {
        tpl.extend_from_slice(&image[y * w + 30..y * w + 46]);
    }
    let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 16, 12).unwrap()).unwrap();
    let params = ScanParams {
        min_score: 0.3,
        min_var_i: 1e-6,
    };

    let sequential = ZnccScalar::scan_full(&search, &plan, params);
    let parallel = scan_full_par::<ZnccScalar>(&search, &plan, params);
    assert!(!sequential.is_empty());
    assert_eq!(sequential, parallel);
}

#[test]
fn parallel_engine_matches_sequential() {
    let (w, h) = (150, 120);
    let data = make_image(w, h);
    let pixels = RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let v = data[y as usize * w + x as usize];
        Rgb([v, v, v])
    });
    let regions = vec![
        AnnotatedRegion::from_ui(30, 20, 60, 44, "wide").unwrap(),
        AnnotatedRegion::from_ui(90, 70, 106, 90, "tall").unwrap(),
    ];

    for step in [0u32, 90, 45] {
        let params = MatchParams {
            accuracy: 0.6,
            overlap: 0.2,
            rotation_step: step,
        };
        let mut outcomes = Vec::new();
        for parallel in [false, true] {
            let root = scratch_dir(&format!("engine-{step}-{parallel}"));
            let session = Session::new(StorageLayout::under(&root)).with_config(
                PreprocessConfig::default(),
                EngineConfig {
                    parallel,
                    ..EngineConfig::default()
                },
            );
            let job = MatchJob::annotate(
                SourceImage::new(root.join("xor.png"), pixels.clone()),
                regions.clone(),
                params,
            );
            outcomes.push(session.run(&job).unwrap());
        }
        assert_eq!(outcomes[0].matches, outcomes[1].matches);
        assert_eq!(outcomes[0].total, outcomes[1].total);
        assert_eq!(outcomes[0].image, outcomes[1].image);
    }
}
