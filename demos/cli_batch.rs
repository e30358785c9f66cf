//! Batch CLI for spice_scan
//!
//! Classifies every supported image in a directory and prints one JSON
//! line per file. Failures are reported inline and do not stop the run.

use clap::Parser;
use serde_json::json;
use spice_scan::{classify_with_config, image_loader, ClassifierConfig};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "spice-scan-batch")]
#[command(about = "Classify every image in a directory")]
struct Cli {
    /// Directory containing the images.
    input: PathBuf,

    /// JSON configuration overriding the default thresholds.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ClassifierConfig::from_json_file(path)?,
        None => ClassifierConfig::default(),
    };

    let files = find_image_files(&cli.input)?;
    if files.is_empty() {
        return Err(format!("No supported images found in {}", cli.input.display()).into());
    }
    eprintln!("Found {} image(s)", files.len());

    let mut failures = 0usize;
    for path in &files {
        let outcome = image_loader::load_image(path)
            .and_then(|image| classify_with_config(&image, &config));

        let line = match outcome {
            Ok(result) => json!({ "file": path.display().to_string(), "result": result }),
            Err(e) => {
                failures += 1;
                json!({ "file": path.display().to_string(), "error": e.to_string() })
            }
        };
        println!("{}", line);
    }

    eprintln!("{} classified, {} failed", files.len() - failures, failures);
    Ok(())
}

fn find_image_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(image_loader::is_supported_extension)
        })
        .collect();
    files.sort();
    Ok(files)
}
