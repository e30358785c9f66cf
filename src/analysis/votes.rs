//! Per-class pixel voting inside the located object

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Pixel evidence for each color class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelVote {
    pub red_count: u64,
    pub green_count: u64,
    pub white_count: u64,
    /// Sum of the three counts, floored to 1
    pub total: u64,
    pub pct_red: f64,
    pub pct_green: f64,
    pub pct_white: f64,
}

impl PixelVote {
    /// Build a vote from raw counts
    pub fn from_counts(red_count: u64, green_count: u64, white_count: u64) -> Self {
        let total = (red_count + green_count + white_count).max(1);
        let pct = |count: u64| count as f64 / total as f64 * 100.0;

        Self {
            red_count,
            green_count,
            white_count,
            total,
            pct_red: pct(red_count),
            pct_green: pct(green_count),
            pct_white: pct(white_count),
        }
    }
}

/// Counts class-mask pixels that fall inside the object mask
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelVoter;

impl PixelVoter {
    pub fn new() -> Self {
        Self
    }

    /// Tally red, green and white evidence restricted to `object`
    ///
    /// When the background was rejected, white pixels are treated as
    /// leakage from the background and not counted.
    pub fn vote(
        &self,
        red: &GrayImage,
        green: &GrayImage,
        white: &GrayImage,
        object: &GrayImage,
        background_rejected: bool,
    ) -> PixelVote {
        let red_count = count_within(red, object);
        let green_count = count_within(green, object);
        let white_count = if background_rejected {
            0
        } else {
            count_within(white, object)
        };

        let vote = PixelVote::from_counts(red_count, green_count, white_count);
        tracing::debug!(
            red = vote.red_count,
            green = vote.green_count,
            white = vote.white_count,
            total = vote.total,
            "pixel vote"
        );
        vote
    }
}

fn count_within(mask: &GrayImage, object: &GrayImage) -> u64 {
    mask.pixels()
        .zip(object.pixels())
        .filter(|(m, o)| m[0] != 0 && o[0] != 0)
        .count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::MASK_ON;
    use image::Luma;

    fn mask_from(width: u32, height: u32, on: impl Fn(u32, u32) -> bool) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            if on(x, y) {
                Luma([MASK_ON])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_counts_restricted_to_object() {
        let red = mask_from(10, 10, |x, _| x < 5);
        let green = mask_from(10, 10, |x, _| x >= 5);
        let white = GrayImage::new(10, 10);
        let object = mask_from(10, 10, |x, y| x < 8 && y < 5);

        let vote = PixelVoter::new().vote(&red, &green, &white, &object, false);

        assert_eq!(vote.red_count, 25);
        assert_eq!(vote.green_count, 15);
        assert_eq!(vote.white_count, 0);
        assert_eq!(vote.total, 40);
        assert!((vote.pct_red - 62.5).abs() < 1e-9);
        assert!((vote.pct_green - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_background_rejection_drops_white() {
        let red = mask_from(10, 10, |x, _| x < 2);
        let green = GrayImage::new(10, 10);
        let white = GrayImage::from_pixel(10, 10, Luma([MASK_ON]));
        let object = GrayImage::from_pixel(10, 10, Luma([MASK_ON]));

        let kept = PixelVoter::new().vote(&red, &green, &white, &object, false);
        assert_eq!(kept.white_count, 100);

        let dropped = PixelVoter::new().vote(&red, &green, &white, &object, true);
        assert_eq!(dropped.white_count, 0);
        assert_eq!(dropped.total, 20);
        assert_eq!(dropped.pct_red, 100.0);
    }

    #[test]
    fn test_total_floored_to_one() {
        let empty = GrayImage::new(6, 6);
        let object = GrayImage::from_pixel(6, 6, Luma([MASK_ON]));

        let vote = PixelVoter::new().vote(&empty, &empty, &empty, &object, false);

        assert_eq!(vote.total, 1);
        assert_eq!(vote.pct_red, 0.0);
        assert_eq!(vote.pct_green, 0.0);
        assert_eq!(vote.pct_white, 0.0);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let vote = PixelVote::from_counts(3, 5, 12);
        assert_eq!(vote.total, 20);
        assert!((vote.pct_red + vote.pct_green + vote.pct_white - 100.0).abs() < 1e-9);
    }
}
