use clap::Parser;
use regionmatch::{
    prepare_annotate_data, AnnotatedImageData, AnnotatedRegion, EngineConfig, MatchJob,
    MatchParams, PreprocessConfig, Session, SourceImage, StorageLayout,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "RegionMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// List template library folders and their labels, then exit.
    #[arg(long)]
    list_library: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JobConfig {
    Annotate { regions: Vec<AnnotatedRegion> },
    File { folders: Vec<String> },
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    templates_dir: PathBuf,
    results_dir: PathBuf,
    job: JobConfig,
    accuracy: f32,
    overlap: f32,
    rotation_step: u32,
    parallel: bool,
    preprocess: PreprocessConfig,
    outline_thickness: u32,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let params = MatchParams::default();
        let layout = StorageLayout::default();
        Self {
            image_path: String::new(),
            templates_dir: layout.templates_root,
            results_dir: layout.results_root,
            job: JobConfig::Annotate {
                regions: Vec::new(),
            },
            accuracy: params.accuracy,
            overlap: params.overlap,
            rotation_step: params.rotation_step,
            parallel: false,
            preprocess: PreprocessConfig::default(),
            outline_thickness: EngineConfig::default().outline_thickness,
            output_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct LibraryFolder {
    folder: String,
    labels: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Output {
    image_path: String,
    json_path: String,
    total: usize,
    annotate_data: AnnotatedImageData,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("regionmatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;

    let layout = StorageLayout {
        templates_root: config.templates_dir.clone(),
        results_root: config.results_dir.clone(),
    };

    if cli.list_library {
        let library = layout.library();
        let mut folders = Vec::new();
        for folder in library.folders()? {
            let labels = library
                .labels(&folder)?
                .into_iter()
                .map(String::from)
                .collect();
            folders.push(LibraryFolder { folder, labels });
        }
        println!("{}", serde_json::to_string_pretty(&folders)?);
        return Ok(());
    }

    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }

    let engine_cfg = EngineConfig {
        parallel: config.parallel,
        outline_thickness: config.outline_thickness,
        ..EngineConfig::default()
    };
    let session = Session::new(layout).with_config(config.preprocess, engine_cfg);

    let source = SourceImage::open(&config.image_path)?;
    let params = MatchParams {
        accuracy: config.accuracy,
        overlap: config.overlap,
        rotation_step: config.rotation_step,
    };
    let job = match config.job {
        JobConfig::Annotate { regions } => MatchJob::annotate(source, regions, params),
        JobConfig::File { folders } => MatchJob::file(source, folders, params),
    };

    let report = session.run_and_save(&job)?;
    let output = Output {
        image_path: report.image_path.display().to_string(),
        json_path: report.json_path.display().to_string(),
        total: report.total,
        annotate_data: prepare_annotate_data(&report),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
