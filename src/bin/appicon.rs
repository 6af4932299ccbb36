//! appicon - render Android, iOS and web icon sets from an SVG
//!
//! Prints a summary (or the outcome as JSON with `--json`).
//! Returns non-zero on invalid input or when any icon failed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use appicon_renderer::{
    DEFAULT_FILE_STEM, ExportOptions, ExportRequest, IconExportPipeline, Platform, PngCompression,
    ScaleMode, VectorSource,
};

#[derive(Parser)]
#[command(name = "appicon")]
#[command(about = "Render Android, iOS and web icon sets from a single SVG")]
struct Cli {
    /// SVG file to render
    input: PathBuf,

    /// Destination root directory
    output: PathBuf,

    /// Base file name of the generated icons
    #[arg(short, long, default_value = DEFAULT_FILE_STEM)]
    name: String,

    /// JSON file with export options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Platform to export (repeatable, defaults to all)
    #[arg(short, long = "platform", value_enum)]
    platforms: Vec<Platform>,

    #[arg(long, value_enum)]
    scale_mode: Option<ScaleMode>,

    #[arg(long, value_enum)]
    compression: Option<PngCompression>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn export_options(&self) -> Result<ExportOptions, String> {
        let mut options = match &self.options {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
                ExportOptions::from_json(&json)
                    .map_err(|e| format!("invalid options in {}: {e}", path.display()))?
            }
            None => ExportOptions::default(),
        };

        if !self.platforms.is_empty() {
            options.platforms = self.platforms.clone();
        }
        if let Some(scale_mode) = self.scale_mode {
            options.scale_mode = scale_mode;
        }
        if let Some(compression) = self.compression {
            options.compression = compression;
        }
        if self.threads.is_some() {
            options.threads = self.threads;
        }
        Ok(options)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let options = match cli.export_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match IconExportPipeline::from_options(&options) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let request = match VectorSource::open(&cli.input)
        .and_then(|source| ExportRequest::new(source, &cli.output).with_file_stem(&cli.name))
    {
        Ok(request) => request,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = pipeline.export(&request);

    if cli.json {
        match outcome.to_json_pretty() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize outcome: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", outcome.summary());
        for failure in &outcome.failures {
            eprintln!("  {}: {}", failure.spec, failure.message());
        }
    }

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
