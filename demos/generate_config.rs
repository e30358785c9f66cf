//! Generate the default configuration file
//!
//! Creates a JSON config with all default thresholds, ready to be edited
//! and passed to the other demos with `--config`.

use spice_scan::ClassifierConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = ClassifierConfig::default();

    match config.to_json_file(output_path) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!("  Median kernel: {}", config.preprocessing.median_kernel_size);
            eprintln!(
                "  Morphology: radius {}, close x{}, open x{}",
                config.segmentation.morph_radius,
                config.segmentation.close_iterations,
                config.segmentation.open_iterations
            );
            eprintln!(
                "  Locator: background > {:.0}%, min area {:.0} px²",
                config.locator.background_area_ratio * 100.0,
                config.locator.min_object_area
            );
            eprintln!(
                "  Decision: green > {:.0}%, red > {:.0}%, chili if ratio > {} or solidity < {} or circularity < {}",
                config.decision.green_pct,
                config.decision.red_pct,
                config.decision.chili_aspect_ratio,
                config.decision.chili_max_solidity,
                config.decision.chili_max_circularity
            );
        }
        Err(e) => {
            eprintln!("Error saving configuration: {}", e);
            process::exit(1);
        }
    }
}
