//! Impulse-noise suppression ahead of color segmentation
//!
//! A median filter removes salt-and-pepper speckle while keeping the
//! specimen's edges sharper than a mean filter would.

use crate::config::PreprocessingConfig;
use crate::error::{ClassificationError, Result};
use crate::image_loader::ensure_non_empty;
use image::RgbImage;

/// Median-filter denoiser
#[derive(Debug, Clone)]
pub struct Preprocessor {
    kernel_size: u32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::from_config(&PreprocessingConfig::default())
    }
}

impl Preprocessor {
    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self {
            kernel_size: config.median_kernel_size,
        }
    }

    /// Apply the median filter; output has the input's dimensions and layout
    ///
    /// # Errors
    ///
    /// `ImageInvalid` for an empty image, `InvalidParameter` for an even kernel.
    pub fn denoise(&self, image: &RgbImage) -> Result<RgbImage> {
        ensure_non_empty(image)?;
        if self.kernel_size % 2 == 0 {
            return Err(ClassificationError::invalid_parameter(
                "median_kernel_size",
                self.kernel_size,
            ));
        }

        let radius = self.kernel_size / 2;
        Ok(imageproc::filter::median_filter(image, radius, radius))
    }
}
