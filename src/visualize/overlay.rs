//! Annotated result image
//!
//! Draws the located contour, its minimum-area rectangle, its convex hull
//! and the predicted label onto a copy of the original image.

use super::glyphs::{draw_text, text_width};
use crate::analysis::RotatedRect;
use crate::detection::{BackgroundRecovery, Contour, Point};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

pub const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const RECOVERED_CONTOUR_COLOR: Rgb<u8> = Rgb([255, 0, 255]);
pub const BOX_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const HULL_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Bottom-left corner of the label
pub const LABEL_ORIGIN: (i32, i32) = (30, 60);
const LABEL_SCALE: u32 = 4;

/// Geometry and text to draw
#[derive(Debug, Clone, Copy)]
pub struct Annotation<'a> {
    pub contour: &'a Contour,
    pub recovery: Option<BackgroundRecovery>,
    pub rotated_rect: &'a RotatedRect,
    pub hull: &'a [Point],
    pub label: &'a str,
}

/// Render the annotation over a copy of `original`
///
/// The contour is green when taken directly from the combined mask and
/// magenta when recovered from a single color mask. A contour kept after
/// a failed background fallback is not drawn, since it outlines the frame.
pub fn annotate(original: &RgbImage, annotation: &Annotation<'_>) -> RgbImage {
    let mut canvas = original.clone();

    let contour_color = match annotation.recovery {
        None => Some(CONTOUR_COLOR),
        Some(BackgroundRecovery::Red | BackgroundRecovery::Green) => Some(RECOVERED_CONTOUR_COLOR),
        Some(BackgroundRecovery::Failed) => None,
    };
    if let Some(color) = contour_color {
        let points = to_f32(&annotation.contour.points);
        draw_polyline(&mut canvas, &points, color, 2);
    }

    let corners: Vec<(f32, f32)> = annotation
        .rotated_rect
        .corners()
        .iter()
        .map(|&(x, y)| (x as f32, y as f32))
        .collect();
    draw_polyline(&mut canvas, &corners, BOX_COLOR, 2);
    draw_polyline(&mut canvas, &to_f32(annotation.hull), HULL_COLOR, 1);

    let scale = label_scale(annotation.label, canvas.width());
    draw_text(&mut canvas, annotation.label, LABEL_ORIGIN, scale, LABEL_COLOR);

    canvas
}

/// Largest scale up to `LABEL_SCALE` whose label fits the canvas width
fn label_scale(label: &str, canvas_width: u32) -> u32 {
    let room = canvas_width.saturating_sub(LABEL_ORIGIN.0 as u32);
    (1..=LABEL_SCALE)
        .rev()
        .find(|&scale| text_width(label, scale) <= room)
        .unwrap_or(1)
}

fn to_f32(points: &[Point]) -> Vec<(f32, f32)> {
    points.iter().map(|p| (p.x as f32, p.y as f32)).collect()
}

/// Closed polyline; thickness is approximated by offset copies
fn draw_polyline(canvas: &mut RgbImage, points: &[(f32, f32)], color: Rgb<u8>, thickness: u32) {
    match points {
        [] => {}
        [(x, y)] => {
            if *x >= 0.0 && *y >= 0.0 && (*x as u32) < canvas.width() && (*y as u32) < canvas.height() {
                canvas.put_pixel(*x as u32, *y as u32, color);
            }
        }
        _ => {
            for offset in 0..thickness.max(1) {
                let d = offset as f32;
                for (i, &(x0, y0)) in points.iter().enumerate() {
                    let (x1, y1) = points[(i + 1) % points.len()];
                    draw_line_segment_mut(canvas, (x0 + d, y0), (x1 + d, y1), color);
                    if offset > 0 {
                        draw_line_segment_mut(canvas, (x0, y0 + d), (x1, y1 + d), color);
                    }
                }
            }
        }
    }
}
