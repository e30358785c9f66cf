//! Default thresholds for the classification pipeline
//!
//! These values were tuned empirically on phone photographs of single
//! spice specimens. They seed [`ClassifierConfig::default`](crate::ClassifierConfig)
//! and can be overridden from a JSON configuration file.

/// Denoising parameters
pub mod preprocess {
    /// Median filter neighborhood (5x5)
    pub const MEDIAN_KERNEL_SIZE: u32 = 5;
    /// Largest accepted median neighborhood
    pub const MAX_MEDIAN_KERNEL_SIZE: u32 = 31;
}

/// HSV range bounds on the 8-bit scale: hue in [0, 180], saturation/value in [0, 255]
pub mod hsv {
    /// Upper end of the hue scale
    pub const HUE_MAX: u8 = 180;

    /// Red, low end of the hue circle
    pub const RED_LOW_HUE: (u8, u8) = (0, 15);
    /// Red, high end of the hue circle (wraparound at 180)
    pub const RED_HIGH_HUE: (u8, u8) = (155, 180);
    pub const RED_MIN_SATURATION: u8 = 40;
    pub const RED_MIN_VALUE: u8 = 40;

    pub const GREEN_HUE: (u8, u8) = (35, 90);
    pub const GREEN_MIN_SATURATION: u8 = 40;
    pub const GREEN_MIN_VALUE: u8 = 40;

    /// Tight bound so faded red glare is not taken for white
    pub const WHITE_MAX_SATURATION: u8 = 40;
    /// Excludes shadows and gray regions
    pub const WHITE_MIN_VALUE: u8 = 140;
}

/// Morphological cleanup of the combined mask
pub mod morphology {
    /// Elliptical structuring element radius (5x5 element)
    pub const ELEMENT_RADIUS: u8 = 2;
    pub const CLOSE_ITERATIONS: u32 = 2;
    pub const OPEN_ITERATIONS: u32 = 1;
}

/// Object isolation
pub mod locator {
    /// Candidate area fraction above which the contour is taken to be background
    pub const BACKGROUND_AREA_RATIO: f64 = 0.90;

    /// Minimum viable object area in px²
    pub const MIN_OBJECT_AREA: f64 = 1000.0;
}

/// Decision tree cutoffs
pub mod decision {
    /// Green share (%) above which the specimen is a green chili
    pub const GREEN_PCT: f64 = 10.0;

    /// Red share (%) above which color alone selects the red branch
    pub const RED_PCT: f64 = 40.0;

    /// Red branch: elongated bodies are chilies
    pub const CHILI_ASPECT_RATIO: f64 = 1.6;

    /// Red branch: non-convex (curved) bodies are chilies
    pub const CHILI_MAX_SOLIDITY: f64 = 0.8;

    /// Red branch: thin bodies have low circularity
    pub const CHILI_MAX_CIRCULARITY: f64 = 0.4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_ranges_within_scale() {
        assert!(hsv::RED_LOW_HUE.0 <= hsv::RED_LOW_HUE.1);
        assert!(hsv::RED_HIGH_HUE.1 <= hsv::HUE_MAX);
        assert!(hsv::GREEN_HUE.0 > hsv::RED_LOW_HUE.1);
        assert!(hsv::GREEN_HUE.1 < hsv::RED_HIGH_HUE.0);
    }

    #[test]
    fn test_decision_thresholds_ordering() {
        // Red needs stronger evidence than green
        assert!(decision::GREEN_PCT < decision::RED_PCT);
        assert!(decision::CHILI_ASPECT_RATIO > 1.0);
        assert!(locator::BACKGROUND_AREA_RATIO > 0.0 && locator::BACKGROUND_AREA_RATIO <= 1.0);
    }

    #[test]
    fn test_median_kernel_is_odd() {
        assert_eq!(preprocess::MEDIAN_KERNEL_SIZE % 2, 1);
    }
}
