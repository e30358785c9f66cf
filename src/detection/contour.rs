//! Plain contour representation and mask/contour conversions
//!
//! Contours are ordered sequences of integer pixel positions along a
//! region's outer boundary. Areas and perimeters are measured on the
//! polygon through those pixel centers, so a filled `w x h` rectangle
//! has contour area `(w - 1) * (h - 1)`.

use crate::color::MASK_ON;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{arc_length, contour_area};
use serde::{Deserialize, Serialize};

/// Integer pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_imageproc(self) -> imageproc::point::Point<i32> {
        imageproc::point::Point::new(self.x, self.y)
    }

    pub(crate) fn from_imageproc(p: imageproc::point::Point<i32>) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Closed boundary of a mask region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle outline, corners inclusive
    pub fn rectangle(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(vec![
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area (shoelace, non-negative)
    pub fn area(&self) -> f64 {
        contour_area(&self.imageproc_points())
    }

    /// Closed perimeter
    pub fn perimeter(&self) -> f64 {
        arc_length(&self.imageproc_points(), true)
    }

    pub(crate) fn imageproc_points(&self) -> Vec<imageproc::point::Point<i32>> {
        self.points.iter().map(|p| p.to_imageproc()).collect()
    }
}

/// Outer boundaries of the top-level regions of `mask`; holes and
/// regions nested inside holes are ignored
pub fn external_contours(mask: &GrayImage) -> Vec<Contour> {
    // Borders starting in column 0 are only found when the region is
    // separated from the image edge, so trace on a zero-padded copy.
    let (width, height) = mask.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] != 0 {
            padded.put_pixel(x + 1, y + 1, Luma([MASK_ON]));
        }
    }

    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            Contour::new(
                c.points
                    .into_iter()
                    .map(|p| Point::new(p.x - 1, p.y - 1))
                    .collect(),
            )
        })
        .collect()
}

/// Contour with the largest enclosed area, with that area
///
/// Ties keep the first contour in trace order.
pub fn largest_contour(contours: Vec<Contour>) -> Option<(Contour, f64)> {
    contours
        .into_iter()
        .map(|c| {
            let area = c.area();
            (c, area)
        })
        .fold(None, |best, (contour, area)| match best {
            Some((_, best_area)) if best_area >= area => best,
            _ => Some((contour, area)),
        })
}

/// Render `contour` filled (boundary included) into a blank mask
pub fn fill_contour(contour: &Contour, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let points = &contour.points;
    if points.is_empty() {
        return mask;
    }

    let min_y = points.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let max_y = points
        .iter()
        .map(|p| p.y)
        .max()
        .unwrap_or(0)
        .min(height as i32 - 1);

    // Half-open crossing rule on pixel centers keeps crossings paired
    let mut crossings: Vec<f64> = Vec::new();
    for y in min_y..=max_y {
        crossings.clear();
        for (i, p0) in points.iter().enumerate() {
            let p1 = points[(i + 1) % points.len()];
            let (lo, hi) = if p0.y < p1.y { (*p0, p1) } else { (p1, *p0) };
            if lo.y <= y && y < hi.y {
                let t = f64::from(y - lo.y) / f64::from(hi.y - lo.y);
                crossings.push(f64::from(lo.x) + t * f64::from(hi.x - lo.x));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            let from = span[0].ceil().max(0.0) as i64;
            let to = span[1].floor().min(f64::from(width) - 1.0) as i64;
            for x in from..=to {
                mask.put_pixel(x as u32, y as u32, Luma([MASK_ON]));
            }
        }
    }

    for p in points {
        if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
            mask.put_pixel(p.x as u32, p.y as u32, Luma([MASK_ON]));
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::segmentation::count_nonzero;

    fn rect_mask(width: u32, height: u32, left: u32, top: u32, w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            if x >= left && x < left + w && y >= top && y < top + h {
                Luma([MASK_ON])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_rectangle_contour_area() {
        let mask = rect_mask(50, 40, 5, 5, 41, 26);
        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area(), 1000.0);
    }

    #[test]
    fn test_region_touching_image_border() {
        let mask = GrayImage::from_pixel(20, 10, Luma([MASK_ON]));
        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area(), 19.0 * 9.0);
        assert!(contours[0].points.contains(&Point::new(0, 0)));
        assert!(contours[0].points.contains(&Point::new(19, 9)));
    }

    #[test]
    fn test_nested_region_is_not_external() {
        // Ring with a blob inside its hole
        let mut mask = rect_mask(60, 60, 5, 5, 50, 50);
        for y in 15..45 {
            for x in 15..45 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        for y in 25..35 {
            for x in 25..35 {
                mask.put_pixel(x, y, Luma([MASK_ON]));
            }
        }

        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area(), 49.0 * 49.0);
    }

    #[test]
    fn test_largest_contour_selection() {
        let mut mask = rect_mask(100, 50, 2, 2, 10, 10);
        for y in 20..45 {
            for x in 40..90 {
                mask.put_pixel(x, y, Luma([MASK_ON]));
            }
        }
        let (contour, area) = largest_contour(external_contours(&mask)).unwrap();
        assert_eq!(area, 49.0 * 24.0);
        assert!(contour.points.contains(&Point::new(40, 20)));

        assert!(largest_contour(Vec::new()).is_none());
    }

    #[test]
    fn test_fill_recovers_region_with_hole() {
        let mut mask = rect_mask(40, 40, 10, 10, 20, 15);
        mask.put_pixel(20, 17, Luma([0]));

        let contour = external_contours(&mask).remove(0);
        let filled = fill_contour(&contour, 40, 40);

        assert_eq!(count_nonzero(&filled), 20 * 15);
        assert_eq!(filled.get_pixel(20, 17)[0], MASK_ON);
        assert_eq!(filled.get_pixel(9, 10)[0], 0);
    }

    #[test]
    fn test_fill_diagonal_shape_covers_boundary() {
        // Diamond
        let mask = GrayImage::from_fn(41, 41, |x, y| {
            let d = (x as i32 - 20).abs() + (y as i32 - 20).abs();
            if d <= 15 {
                Luma([MASK_ON])
            } else {
                Luma([0])
            }
        });
        let contour = external_contours(&mask).remove(0);
        let filled = fill_contour(&contour, 41, 41);
        assert_eq!(filled, mask);
    }

    #[test]
    fn test_single_pixel_contour() {
        let mut mask = GrayImage::new(10, 10);
        mask.put_pixel(4, 4, Luma([MASK_ON]));
        let contour = external_contours(&mask).remove(0);
        assert_eq!(contour.points, vec![Point::new(4, 4)]);
        assert_eq!(contour.area(), 0.0);

        let filled = fill_contour(&contour, 10, 10);
        assert_eq!(count_nonzero(&filled), 1);
    }
}
