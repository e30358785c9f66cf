//! Geometric shape descriptors of the located object
//!
//! Three scale-free metrics describe the specimen's outline:
//!
//! - aspect ratio of the minimum-area enclosing rectangle (elongation)
//! - solidity, contour area over convex-hull area (concavity)
//! - circularity, `4π·area / perimeter²` (1.0 for a perfect disc)
//!
//! The enclosing rectangle is found with rotating calipers over the convex
//! hull in floating point, so sides are not rounded to whole pixels.

use crate::detection::{Contour, Point};
use imageproc::geometry::{contour_area, convex_hull};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Minimum-area enclosing rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: (f64, f64),
    pub long_side: f64,
    pub short_side: f64,
    /// Direction of the long side in degrees, `[0, 180)`, clockwise from
    /// the x axis in image coordinates
    pub angle: f64,
}

impl RotatedRect {
    /// Degenerate rectangle at a point
    pub fn empty(center: (f64, f64)) -> Self {
        Self {
            center,
            long_side: 0.0,
            short_side: 0.0,
            angle: 0.0,
        }
    }

    pub fn area(&self) -> f64 {
        self.long_side * self.short_side
    }

    /// Corner points in drawing order
    pub fn corners(&self) -> [(f64, f64); 4] {
        let theta = self.angle.to_radians();
        let (ux, uy) = (theta.cos(), theta.sin());
        let (vx, vy) = (-uy, ux);
        let (hl, hs) = (self.long_side / 2.0, self.short_side / 2.0);
        let (cx, cy) = self.center;

        [
            (cx - ux * hl - vx * hs, cy - uy * hl - vy * hs),
            (cx + ux * hl - vx * hs, cy + uy * hl - vy * hs),
            (cx + ux * hl + vx * hs, cy + uy * hl + vy * hs),
            (cx - ux * hl + vx * hs, cy - uy * hl + vy * hs),
        ]
    }
}

/// Elongation, concavity and roundness of a contour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeMetrics {
    /// Long over short rectangle side; 0 when the short side is 0
    pub aspect_ratio: f64,
    /// Contour area over hull area, capped at 1; 0 when the hull is empty
    pub solidity: f64,
    pub circularity: f64,
}

/// Metrics together with the geometry they were computed from
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescription {
    pub metrics: ShapeMetrics,
    pub rotated_rect: RotatedRect,
    pub hull: Vec<Point>,
}

/// Shape analyzer; stateless
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeAnalyzer;

impl ShapeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compute the three shape metrics of `contour`
    pub fn analyze(&self, contour: &Contour) -> ShapeMetrics {
        self.describe(contour).metrics
    }

    /// Compute the metrics and keep the hull and rectangle for drawing
    pub fn describe(&self, contour: &Contour) -> ShapeDescription {
        let hull = hull_of(contour);
        let rotated_rect = min_area_rect(&hull);

        let area = contour.area();
        let hull_area = contour_area(
            &hull.iter().map(|p| p.to_imageproc()).collect::<Vec<_>>(),
        );
        let perimeter = contour.perimeter().max(1.0);

        let aspect_ratio = if rotated_rect.short_side > 0.0 {
            rotated_rect.long_side / rotated_rect.short_side
        } else {
            0.0
        };
        let solidity = if hull_area > 0.0 {
            (area / hull_area).min(1.0)
        } else {
            0.0
        };
        let circularity = 4.0 * PI * area / (perimeter * perimeter);

        let metrics = ShapeMetrics {
            aspect_ratio,
            solidity,
            circularity,
        };
        tracing::debug!(
            aspect_ratio,
            solidity,
            circularity,
            area,
            hull_area,
            "shape metrics"
        );

        ShapeDescription {
            metrics,
            rotated_rect,
            hull,
        }
    }
}

/// Convex hull; repeated contour points are removed first since the hull
/// ordering cannot rank identical points
fn hull_of(contour: &Contour) -> Vec<Point> {
    let mut points: Vec<Point> = contour.points.clone();
    points.sort_by_key(|p| (p.y, p.x));
    points.dedup();

    convex_hull(points.into_iter().map(Point::to_imageproc).collect::<Vec<_>>())
        .into_iter()
        .map(Point::from_imageproc)
        .collect()
}

/// Rotating calipers over the hull edges; the first edge wins ties
fn min_area_rect(hull: &[Point]) -> RotatedRect {
    let pts: Vec<(f64, f64)> = hull
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();

    match pts.len() {
        0 => return RotatedRect::empty((0.0, 0.0)),
        1 => return RotatedRect::empty(pts[0]),
        _ => {}
    }

    let mut best: Option<(f64, RotatedRect)> = None;
    for i in 0..pts.len() {
        let (ax, ay) = pts[i];
        let (bx, by) = pts[(i + 1) % pts.len()];
        let len = (bx - ax).hypot(by - ay);
        if len == 0.0 {
            continue;
        }
        let (ux, uy) = ((bx - ax) / len, (by - ay) / len);
        let (vx, vy) = (-uy, ux);

        let (mut min_u, mut max_u) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_v, mut max_v) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(px, py) in &pts {
            let u = (px - ax) * ux + (py - ay) * uy;
            let v = (px - ax) * vx + (py - ay) * vy;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }

        let (along, across) = (max_u - min_u, max_v - min_v);
        let area = along * across;
        if best.as_ref().is_some_and(|(best_area, _)| *best_area <= area) {
            continue;
        }

        let mid_u = (min_u + max_u) / 2.0;
        let mid_v = (min_v + max_v) / 2.0;
        let center = (
            ax + ux * mid_u + vx * mid_v,
            ay + uy * mid_u + vy * mid_v,
        );

        let (long_side, short_side, direction) = if along >= across {
            (along, across, uy.atan2(ux))
        } else {
            (across, along, vy.atan2(vx))
        };

        best = Some((
            area,
            RotatedRect {
                center,
                long_side,
                short_side,
                angle: normalize_angle(direction.to_degrees()),
            },
        ));
    }

    best.map(|(_, rect)| rect)
        .unwrap_or_else(|| RotatedRect::empty(pts[0]))
}

fn normalize_angle(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(180.0);
    // rem_euclid can round up to exactly 180.0 for tiny negative inputs
    if a >= 180.0 {
        0.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::MASK_ON;
    use crate::detection::contour::external_contours;
    use image::{GrayImage, Luma};

    fn polygon(points: &[(i32, i32)]) -> Contour {
        Contour::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_axis_aligned_rectangle() {
        let description = ShapeAnalyzer::new().describe(&Contour::rectangle(10, 10, 50, 30));
        let m = description.metrics;

        assert!(approx(m.aspect_ratio, 2.0, 1e-9));
        assert!(approx(m.solidity, 1.0, 1e-9));
        assert!(approx(m.circularity, 4.0 * PI * 800.0 / (120.0 * 120.0), 1e-9));

        let rect = description.rotated_rect;
        assert!(approx(rect.long_side, 40.0, 1e-9));
        assert!(approx(rect.short_side, 20.0, 1e-9));
        assert!(approx(rect.center.0, 30.0, 1e-9));
        assert!(approx(rect.center.1, 20.0, 1e-9));
        assert!(approx(rect.angle, 0.0, 1e-9));
    }

    #[test]
    fn test_traced_rectangle_matches_outline() {
        let mask = GrayImage::from_fn(80, 60, |x, y| {
            if (10..51).contains(&x) && (10..31).contains(&y) {
                Luma([MASK_ON])
            } else {
                Luma([0])
            }
        });
        let contour = external_contours(&mask).remove(0);
        let m = ShapeAnalyzer::new().analyze(&contour);
        assert!(approx(m.aspect_ratio, 2.0, 1e-9));
        assert!(approx(m.solidity, 1.0, 1e-9));
    }

    #[test]
    fn test_rotated_elongated_rectangle() {
        // 45° strip, sides 30√2 and 5√2
        let contour = polygon(&[(0, 0), (30, 30), (25, 35), (-5, 5)]);
        let description = ShapeAnalyzer::new().describe(&contour);

        assert!(approx(description.metrics.aspect_ratio, 6.0, 1e-9));
        assert!(approx(description.rotated_rect.area(), 300.0, 1e-6));
        assert!(approx(description.rotated_rect.angle, 45.0, 1e-9));
        assert!(approx(description.metrics.solidity, 1.0, 1e-9));
    }

    #[test]
    fn test_concave_shape_has_low_solidity() {
        let contour = polygon(&[(0, 0), (20, 0), (20, 5), (5, 5), (5, 20), (0, 20)]);
        let m = ShapeAnalyzer::new().analyze(&contour);
        assert!(approx(m.solidity, 175.0 / 287.5, 1e-9));
        assert!(m.solidity < 0.8);
    }

    #[test]
    fn test_disc_is_round_and_compact() {
        let mask = GrayImage::from_fn(100, 100, |x, y| {
            let (dx, dy) = (x as f64 - 50.0, y as f64 - 50.0);
            if dx * dx + dy * dy <= 30.0 * 30.0 {
                Luma([MASK_ON])
            } else {
                Luma([0])
            }
        });
        let contour = external_contours(&mask).remove(0);
        let m = ShapeAnalyzer::new().analyze(&contour);

        assert!(m.aspect_ratio >= 1.0 && m.aspect_ratio < 1.1);
        assert!(m.solidity > 0.95);
        assert!(m.circularity > 0.8);
    }

    #[test]
    fn test_collinear_contour_is_degenerate() {
        let contour = polygon(&[(0, 0), (5, 0), (10, 0), (5, 0)]);
        let description = ShapeAnalyzer::new().describe(&contour);

        assert_eq!(description.metrics.aspect_ratio, 0.0);
        assert_eq!(description.metrics.solidity, 0.0);
        assert_eq!(description.metrics.circularity, 0.0);
        assert!(approx(description.rotated_rect.long_side, 10.0, 1e-9));
    }

    #[test]
    fn test_empty_contour() {
        let m = ShapeAnalyzer::new().analyze(&Contour::new(Vec::new()));
        assert_eq!(m.aspect_ratio, 0.0);
        assert_eq!(m.solidity, 0.0);
        assert_eq!(m.circularity, 0.0);
    }

    #[test]
    fn test_corners_span_rectangle() {
        let rect = RotatedRect {
            center: (10.0, 5.0),
            long_side: 20.0,
            short_side: 10.0,
            angle: 0.0,
        };
        let corners = rect.corners();
        assert!(approx(corners[0].0, 0.0, 1e-9) && approx(corners[0].1, 0.0, 1e-9));
        assert!(approx(corners[2].0, 20.0, 1e-9) && approx(corners[2].1, 10.0, 1e-9));
    }
}
