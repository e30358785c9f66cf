//! Command-line interface for spice_scan
//!
//! Classifies one image, prints the result as JSON on stdout and a short
//! summary on stderr. Optionally writes every pipeline layer as a PNG.

use clap::Parser;
use spice_scan::session::{ClassificationSession, JsonReporter};
use spice_scan::{image_loader::load_image, ClassifierConfig};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "spice-scan")]
#[command(about = "Identify red chili, green chili, shallot or garlic in a photograph")]
#[command(version)]
struct Cli {
    /// Path to the input image (png, jpg, bmp).
    image: PathBuf,

    /// JSON configuration overriding the default thresholds.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to write the intermediate layers to.
    #[arg(long)]
    layers: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ClassifierConfig::from_json_file(path)?,
        None => ClassifierConfig::default(),
    };

    tracing::info!("Loading image: {}", cli.image.display());
    let image = load_image(&cli.image)?;

    let mut session = ClassificationSession::new(&config)?;
    session.load(image)?;

    if let Err(e) = session.process() {
        eprintln!("{}", e.user_message());
        return Err(e.into());
    }

    if let Some(dir) = &cli.layers {
        if let Some(layers) = session.layers() {
            write_layers(dir, layers)?;
        }
    }

    if let Some(result) = session.result() {
        eprintln!("{}", result.explanation);
        if result.is_low_confidence() {
            eprintln!("warning: low confidence, no object found inside the background");
        }
    }

    let stdout = std::io::stdout();
    let mut reporter = JsonReporter::new(stdout.lock());
    session.report(&mut reporter)?;

    Ok(())
}

fn write_layers(dir: &Path, layers: &spice_scan::PipelineLayers) -> CliResult<()> {
    std::fs::create_dir_all(dir)?;
    for (index, (name, layer)) in layers.named().into_iter().enumerate() {
        let path = dir.join(format!("{}_{}.png", index + 1, name));
        layer.save(&path)?;
        tracing::debug!("wrote {}", path.display());
    }
    tracing::info!("Layers written to {}", dir.display());
    Ok(())
}
