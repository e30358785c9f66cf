//! Configuration structures for the spice classification pipeline.
//!
//! All thresholds of the pipeline are named here instead of being embedded
//! as literals, organized into groups for preprocessing, segmentation,
//! object location and the decision tree.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use spice_scan::ClassifierConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = ClassifierConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = ClassifierConfig::default();
//! # Ok::<(), spice_scan::ClassificationError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`PreprocessingConfig`]: median denoising
//! - [`SegmentationConfig`]: HSV ranges and mask morphology
//! - [`LocatorConfig`]: background rejection and minimum object size
//! - [`DecisionConfig`]: color-share and shape cutoffs

use crate::constants::{decision, hsv, locator, morphology, preprocess};
use crate::error::{ClassificationError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete pipeline configuration for spice classification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Preprocessing configuration
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,

    /// Color segmentation configuration
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Object location configuration
    #[serde(default)]
    pub locator: LocatorConfig,

    /// Decision tree configuration
    #[serde(default)]
    pub decision: DecisionConfig,
}

/// Denoising parameters applied before segmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Median filter neighborhood side length (odd)
    pub median_kernel_size: u32,
}

/// Inclusive HSV box on the 8-bit scale (hue 0-180, saturation/value 0-255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub hue: (u8, u8),
    pub saturation: (u8, u8),
    pub value: (u8, u8),
}

impl HsvRange {
    pub const fn new(hue: (u8, u8), saturation: (u8, u8), value: (u8, u8)) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Check whether an HSV triple lies inside the box (bounds inclusive)
    #[inline]
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        (self.hue.0..=self.hue.1).contains(&h)
            && (self.saturation.0..=self.saturation.1).contains(&s)
            && (self.value.0..=self.value.1).contains(&v)
    }

    fn is_well_formed(&self) -> bool {
        self.hue.0 <= self.hue.1
            && self.hue.1 <= hsv::HUE_MAX
            && self.saturation.0 <= self.saturation.1
            && self.value.0 <= self.value.1
    }
}

/// HSV class ranges and morphological cleanup of the combined mask.
///
/// Red is a union of two ranges to cover the hue wraparound at 0/180.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    pub red_ranges: [HsvRange; 2],
    pub green_range: HsvRange,
    pub white_range: HsvRange,

    /// Elliptical structuring element radius
    pub morph_radius: u8,

    /// Closing passes (fill small interior holes)
    pub close_iterations: u32,

    /// Opening passes (remove isolated false-positive blobs)
    pub open_iterations: u32,
}

/// Object isolation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Candidate area as fraction of image area above which the
    /// candidate is treated as captured background (0.0-1.0)
    pub background_area_ratio: f64,

    /// Minimum viable object area in px²
    pub min_object_area: f64,
}

/// Decision tree cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Green share (%) above which the result is a green chili
    pub green_pct: f64,

    /// Red share (%) above which the red branch is taken
    pub red_pct: f64,

    /// Aspect ratio above which a red object is a chili
    pub chili_aspect_ratio: f64,

    /// Solidity below which a red object is a chili
    pub chili_max_solidity: f64,

    /// Circularity below which a red object is a chili
    pub chili_max_circularity: f64,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            median_kernel_size: preprocess::MEDIAN_KERNEL_SIZE,
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            red_ranges: [
                HsvRange::new(
                    hsv::RED_LOW_HUE,
                    (hsv::RED_MIN_SATURATION, u8::MAX),
                    (hsv::RED_MIN_VALUE, u8::MAX),
                ),
                HsvRange::new(
                    hsv::RED_HIGH_HUE,
                    (hsv::RED_MIN_SATURATION, u8::MAX),
                    (hsv::RED_MIN_VALUE, u8::MAX),
                ),
            ],
            green_range: HsvRange::new(
                hsv::GREEN_HUE,
                (hsv::GREEN_MIN_SATURATION, u8::MAX),
                (hsv::GREEN_MIN_VALUE, u8::MAX),
            ),
            white_range: HsvRange::new(
                (0, hsv::HUE_MAX),
                (0, hsv::WHITE_MAX_SATURATION),
                (hsv::WHITE_MIN_VALUE, u8::MAX),
            ),
            morph_radius: morphology::ELEMENT_RADIUS,
            close_iterations: morphology::CLOSE_ITERATIONS,
            open_iterations: morphology::OPEN_ITERATIONS,
        }
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            background_area_ratio: locator::BACKGROUND_AREA_RATIO,
            min_object_area: locator::MIN_OBJECT_AREA,
        }
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            green_pct: decision::GREEN_PCT,
            red_pct: decision::RED_PCT,
            chili_aspect_ratio: decision::CHILI_ASPECT_RATIO,
            chili_max_solidity: decision::CHILI_MAX_SOLIDITY,
            chili_max_circularity: decision::CHILI_MAX_CIRCULARITY,
        }
    }
}

impl ClassifierConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassificationError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            ClassificationError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClassificationError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            ClassificationError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Reject parameter combinations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        let kernel = self.preprocessing.median_kernel_size;
        if kernel == 0 || kernel % 2 == 0 || kernel > preprocess::MAX_MEDIAN_KERNEL_SIZE {
            return Err(ClassificationError::invalid_parameter(
                "preprocessing.median_kernel_size",
                kernel,
            ));
        }

        let seg = &self.segmentation;
        let ranges = [
            ("segmentation.red_ranges[0]", &seg.red_ranges[0]),
            ("segmentation.red_ranges[1]", &seg.red_ranges[1]),
            ("segmentation.green_range", &seg.green_range),
            ("segmentation.white_range", &seg.white_range),
        ];
        for (name, range) in ranges {
            if !range.is_well_formed() {
                return Err(ClassificationError::invalid_parameter(
                    name,
                    format!("{:?}", range),
                ));
            }
        }

        let ratio = self.locator.background_area_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ClassificationError::invalid_parameter(
                "locator.background_area_ratio",
                ratio,
            ));
        }
        if !(self.locator.min_object_area >= 0.0) {
            return Err(ClassificationError::invalid_parameter(
                "locator.min_object_area",
                self.locator.min_object_area,
            ));
        }

        let d = &self.decision;
        let cutoffs = [
            ("decision.green_pct", d.green_pct, 0.0, 100.0),
            ("decision.red_pct", d.red_pct, 0.0, 100.0),
            ("decision.chili_aspect_ratio", d.chili_aspect_ratio, 0.0, f64::MAX),
            ("decision.chili_max_solidity", d.chili_max_solidity, 0.0, 1.0),
            ("decision.chili_max_circularity", d.chili_max_circularity, 0.0, f64::MAX),
        ];
        for (name, value, lo, hi) in cutoffs {
            // NaN fails both comparisons
            if !(value >= lo && value <= hi) {
                return Err(ClassificationError::invalid_parameter(name, value));
            }
        }

        Ok(())
    }
}
