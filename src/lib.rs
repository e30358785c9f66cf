//! # Spice Scan
//!
//! A Rust crate for identifying kitchen spices in a single photograph.
//!
//! Each image is expected to show one specimen of red chili, green chili,
//! shallot or garlic. Classification is fully deterministic and uses no
//! trained parameters:
//! - Median denoising
//! - HSV range segmentation into red, green and white masks
//! - Dominant-object isolation with background rejection
//! - Per-class pixel voting and contour shape metrics
//! - A fixed-priority decision table
//!
//! ## Example
//!
//! ```rust,no_run
//! use spice_scan::{classify, image_loader::load_image};
//! use std::path::Path;
//!
//! let image = load_image(Path::new("photo.jpg"))?;
//! let result = classify(&image)?;
//! println!("{} ({})", result.predicted_class, result.dominant_color);
//! # Ok::<(), spice_scan::ClassificationError>(())
//! ```

use image::RgbImage;
use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod color;
pub mod config;
pub mod constants;
pub mod decision;
pub mod detection;
pub mod error;
pub mod image_loader;
pub mod pipeline;
pub mod preprocess;
pub mod session;
pub mod visualize;

pub use analysis::{PixelVote, RotatedRect, ShapeMetrics};
pub use config::ClassifierConfig;
pub use decision::{DominantColor, SpiceClass};
pub use error::{ClassificationError, ClassificationWarning, Result};
pub use pipeline::{Pipeline, PipelineLayers};
pub use session::{ClassificationSession, JsonReporter, Reporter, SessionState};

/// Outcome of one successful classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub predicted_class: SpiceClass,
    pub dominant_color: DominantColor,
    pub shape_metrics: ShapeMetrics,
    pub pixel_vote: PixelVote,
    /// The combined mask covered the frame and was replaced or flagged
    pub background_rejected: bool,
    /// Human-readable summary of the decision
    pub explanation: String,
    /// Enclosed area of the located contour in px²
    pub area: f64,
    pub rotated_rect: RotatedRect,
    /// Non-fatal conditions, e.g. a failed background fallback
    #[serde(default)]
    pub warnings: Vec<ClassificationWarning>,
}

impl ClassificationResult {
    /// Whether the result should be treated as low-confidence
    pub fn is_low_confidence(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Classify a spice image with the default thresholds
///
/// # Errors
///
/// Returns `ClassificationError` if:
/// - The image is empty
/// - No object is found in any color range
/// - The located object is smaller than the minimum area
pub fn classify(image: &RgbImage) -> Result<ClassificationResult> {
    classify_with_config(image, &ClassifierConfig::default())
}

/// Classify a spice image with custom thresholds
pub fn classify_with_config(image: &RgbImage, config: &ClassifierConfig) -> Result<ClassificationResult> {
    let pipeline = Pipeline::new(config)?;
    Ok(pipeline.run(image.clone())?.result())
}

/// Classify and also return every intermediate layer for display
pub fn classify_debug(
    image: &RgbImage,
    config: &ClassifierConfig,
) -> Result<(ClassificationResult, PipelineLayers)> {
    let classified = Pipeline::new(config)?.run(image.clone())?;
    let result = classified.result();
    Ok((result, classified.into_layers()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serialization() {
        let result = ClassificationResult {
            predicted_class: SpiceClass::Shallot,
            dominant_color: DominantColor::Red,
            shape_metrics: ShapeMetrics {
                aspect_ratio: 1.12,
                solidity: 0.97,
                circularity: 0.81,
            },
            pixel_vote: PixelVote::from_counts(4200, 0, 300),
            background_rejected: false,
            explanation: "Prediction: SHALLOT".to_string(),
            area: 4480.5,
            rotated_rect: RotatedRect {
                center: (64.0, 48.5),
                long_side: 80.0,
                short_side: 71.5,
                angle: 12.0,
            },
            warnings: vec![ClassificationWarning::BackgroundFallbackFailed { area_ratio: 0.97 }],
        };

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: ClassificationResult = serde_json::from_str(&json).unwrap();

        assert_eq!(result, deserialized);
        assert!(deserialized.is_low_confidence());
    }

    #[test]
    fn test_repeating_percentages_survive_json() {
        // 28 / 30 has no short decimal form
        let vote = PixelVote::from_counts(28, 2, 0);
        let json = serde_json::to_string(&vote).unwrap();
        let back: PixelVote = serde_json::from_str(&json).unwrap();

        assert_eq!(back.pct_red.to_bits(), vote.pct_red.to_bits());
        assert_eq!(back.pct_green.to_bits(), vote.pct_green.to_bits());
        assert_eq!(back, vote);
    }

    #[test]
    fn test_empty_image_is_invalid() {
        let err = classify(&RgbImage::new(0, 0)).unwrap_err();
        assert!(matches!(err, ClassificationError::ImageInvalid { .. }));
    }
}
