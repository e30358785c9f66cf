//! HSV range segmentation into per-class binary masks
//!
//! Produces three independent class masks (red, green, white) from the
//! denoised image plus a combined foreground mask that is morphologically
//! closed and then opened. All thresholds are fixed for a run; nothing
//! adapts to image statistics.

use super::conversion::HsvImage;
use crate::config::{HsvRange, SegmentationConfig};
use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};

/// Foreground value in every binary mask
pub const MASK_ON: u8 = 255;

/// Output of the segmentation stage
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationMasks {
    pub hsv: HsvImage,
    pub red: GrayImage,
    pub green: GrayImage,
    pub white: GrayImage,
    /// `red | green | white`, closed then opened
    pub combined: GrayImage,
}

/// Color segmenter over fixed HSV ranges
#[derive(Debug, Clone)]
pub struct ColorSegmenter {
    config: SegmentationConfig,
}

impl Default for ColorSegmenter {
    fn default() -> Self {
        Self::new(SegmentationConfig::default())
    }
}

impl ColorSegmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Derive the class masks and the cleaned combined mask
    pub fn segment(&self, image: &RgbImage) -> SegmentationMasks {
        let hsv = HsvImage::from_rgb(image);

        let red = threshold(&hsv, &self.config.red_ranges);
        let green = threshold(&hsv, std::slice::from_ref(&self.config.green_range));
        let white = threshold(&hsv, std::slice::from_ref(&self.config.white_range));

        let union = union_masks(&[&red, &green, &white]);
        let element = elliptical_element(self.config.morph_radius);
        let closed = close(&union, &element, self.config.close_iterations);
        let combined = open(&closed, &element, self.config.open_iterations);

        tracing::debug!(
            red = count_nonzero(&red),
            green = count_nonzero(&green),
            white = count_nonzero(&white),
            combined = count_nonzero(&combined),
            "segmentation masks"
        );

        SegmentationMasks {
            hsv,
            red,
            green,
            white,
            combined,
        }
    }
}

/// Binary mask of pixels falling inside any of `ranges`
pub fn threshold(hsv: &HsvImage, ranges: &[HsvRange]) -> GrayImage {
    let (width, height) = hsv.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        let (h, s, v) = hsv.get(x, y);
        if ranges.iter().any(|range| range.contains(h, s, v)) {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}

/// Pixelwise OR of same-sized masks
pub fn union_masks(masks: &[&GrayImage]) -> GrayImage {
    let (width, height) = masks.first().map(|m| m.dimensions()).unwrap_or((0, 0));
    ImageBuffer::from_fn(width, height, |x, y| {
        if masks.iter().any(|m| m.get_pixel(x, y)[0] != 0) {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    })
}

/// Count of nonzero pixels
pub fn count_nonzero(mask: &GrayImage) -> u64 {
    mask.pixels().filter(|p| p[0] != 0).count() as u64
}

/// Elliptical structuring element of side `2 * radius + 1`
///
/// Rows are filled the same way the usual vision-library ellipse kernel is,
/// so radius 2 gives the 5x5 element with clipped corners.
pub fn elliptical_element(radius: u8) -> Mask {
    let r = i32::from(radius);
    let side = 2 * u32::from(radius) + 1;
    let inv_r2 = if r > 0 { 1.0 / f64::from(r * r) } else { 0.0 };

    let kernel = ImageBuffer::from_fn(side, side, |x, y| {
        let dy = y as i32 - r;
        let dx = (f64::from(r) * (f64::from(r * r - dy * dy) * inv_r2).sqrt()).round() as i32;
        let col = x as i32;
        if col >= r - dx && col <= r + dx {
            Luma([MASK_ON])
        } else {
            Luma([0])
        }
    });

    Mask::from_image(&kernel, radius, radius)
}

/// Dilate `iterations` times then erode `iterations` times
pub fn close(mask: &GrayImage, element: &Mask, iterations: u32) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = grayscale_dilate(&out, element);
    }
    for _ in 0..iterations {
        out = grayscale_erode(&out, element);
    }
    out
}

/// Erode `iterations` times then dilate `iterations` times
pub fn open(mask: &GrayImage, element: &Mask, iterations: u32) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = grayscale_erode(&out, element);
    }
    for _ in 0..iterations {
        out = grayscale_dilate(&out, element);
    }
    out
}
