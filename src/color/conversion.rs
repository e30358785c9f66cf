//! RGB to HSV conversion on the 8-bit scale
//!
//! Hue is stored halved so it fits a byte (0-180), saturation and value are
//! scaled to 0-255. This is the scale the segmentation ranges are written in.

use crate::constants::hsv::HUE_MAX;
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use palette::{FromColor, Hsv, Srgb};

/// HSV raster with the same dimensions as its source image
#[derive(Debug, Clone, PartialEq)]
pub struct HsvImage {
    /// Channels are (hue, saturation, value)
    pixels: ImageBuffer<Rgb<u8>, Vec<u8>>,
}

impl HsvImage {
    /// Convert a whole RGB image
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = ImageBuffer::from_fn(width, height, |x, y| {
            let Rgb([r, g, b]) = *image.get_pixel(x, y);
            let (h, s, v) = rgb_to_hsv(r, g, b);
            Rgb([h, s, v])
        });
        Self { pixels }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// (hue, saturation, value) at a pixel
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let Rgb([h, s, v]) = *self.pixels.get_pixel(x, y);
        (h, s, v)
    }

    /// Value channel as a grayscale image, for display
    pub fn value_channel(&self) -> GrayImage {
        let (width, height) = self.dimensions();
        ImageBuffer::from_fn(width, height, |x, y| Luma([self.pixels.get_pixel(x, y)[2]]))
    }
}

/// Convert one RGB pixel to 8-bit HSV
///
/// Achromatic pixels get hue 0 and saturation 0.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let hsv: Hsv = Hsv::from_color(Srgb::new(r, g, b).into_format::<f32>());

    let degrees = hsv.hue.into_positive_degrees();
    let hue = (degrees / 2.0).round().min(f32::from(HUE_MAX)) as u8;
    let saturation = (hsv.saturation * 255.0).round().clamp(0.0, 255.0) as u8;
    // Value is the largest channel; take it directly to stay exact
    let value = r.max(g).max(b);

    (hue, saturation, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_colors() {
        assert_eq!(rgb_to_hsv(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), (120, 255, 255));
    }

    #[test]
    fn test_achromatic() {
        assert_eq!(rgb_to_hsv(0, 0, 0), (0, 0, 0));
        assert_eq!(rgb_to_hsv(230, 230, 230), (0, 0, 230));
    }

    #[test]
    fn test_chili_red_sample() {
        // hue 10°, saturation ~200/255, value 200
        let (h, s, v) = rgb_to_hsv(200, 69, 43);
        assert_eq!(v, 200);
        assert_eq!(h, 5);
        assert!((199..=201).contains(&s));
    }

    #[test]
    fn test_magenta_red_wraps_high() {
        // 350° lands at the top of the hue scale
        let (h, _, _) = rgb_to_hsv(255, 0, 42);
        assert!(h >= 170 && h <= HUE_MAX);
    }

    #[test]
    fn test_value_channel_dimensions() {
        let image = RgbImage::from_pixel(6, 4, Rgb([10, 200, 30]));
        let hsv = HsvImage::from_rgb(&image);
        let value = hsv.value_channel();
        assert_eq!(value.dimensions(), (6, 4));
        assert_eq!(value.get_pixel(3, 2)[0], 200);
    }
}
