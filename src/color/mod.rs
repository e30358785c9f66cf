//! Color space conversion and HSV segmentation
//!
//! This module converts the denoised image to 8-bit HSV and splits it
//! into the red, green and white class masks used by the rest of the
//! pipeline.

pub mod conversion;
pub mod segmentation;

pub use conversion::{rgb_to_hsv, HsvImage};
pub use segmentation::{ColorSegmenter, SegmentationMasks, MASK_ON};
