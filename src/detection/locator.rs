//! Dominant-object isolation with background rejection
//!
//! Selects the largest external contour of the combined mask. When that
//! contour covers nearly the whole frame the white range has most likely
//! captured the background; the locator then looks for the specimen in
//! the red and green masks alone before giving up and keeping the
//! oversized contour as a low-confidence result.

use super::contour::{external_contours, fill_contour, largest_contour, Contour};
use crate::config::LocatorConfig;
use crate::error::{ClassificationError, ClassificationWarning, Result};
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// How the background-rejection check resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundRecovery {
    /// Replaced by the largest red-mask region
    Red,
    /// Replaced by the largest green-mask region
    Green,
    /// No viable replacement; the background-covering contour was kept
    Failed,
}

/// The selected specimen region
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedObject {
    pub contour: Contour,
    /// Contour area in px²
    pub area: f64,
    pub background_rejected: bool,
    /// Set whenever `background_rejected` is
    pub recovery: Option<BackgroundRecovery>,
    /// 255 inside the contour, 0 elsewhere
    pub object_mask: GrayImage,
    pub warnings: Vec<ClassificationWarning>,
}

/// Object locator over the segmentation masks
#[derive(Debug, Clone)]
pub struct ObjectLocator {
    background_area_ratio: f64,
    min_object_area: f64,
}

impl Default for ObjectLocator {
    fn default() -> Self {
        Self::from_config(&LocatorConfig::default())
    }
}

impl ObjectLocator {
    pub fn from_config(config: &LocatorConfig) -> Self {
        Self {
            background_area_ratio: config.background_area_ratio,
            min_object_area: config.min_object_area,
        }
    }

    /// Locate the dominant object
    ///
    /// # Errors
    ///
    /// - `NoObjectDetected` if `combined` has no contours
    /// - `ObjectTooSmall` if the final candidate is below the minimum area
    pub fn locate(
        &self,
        combined: &GrayImage,
        red: &GrayImage,
        green: &GrayImage,
        image_area: f64,
    ) -> Result<LocatedObject> {
        let contours = external_contours(combined);
        tracing::debug!(count = contours.len(), "external contours in combined mask");

        let (mut contour, mut area) =
            largest_contour(contours).ok_or(ClassificationError::NoObjectDetected)?;

        let mut background_rejected = false;
        let mut recovery = None;
        let mut warnings = Vec::new();

        if area > self.background_area_ratio * image_area {
            background_rejected = true;
            let area_ratio = area / image_area;
            tracing::warn!(
                area_ratio,
                "candidate covers the frame, searching red and green masks"
            );

            match self.recover(red, green) {
                Some((found, found_area, source)) => {
                    tracing::info!(?source, area = found_area, "recovered object inside background");
                    contour = found;
                    area = found_area;
                    recovery = Some(source);
                }
                None => {
                    tracing::warn!("no viable red or green region, keeping background contour");
                    recovery = Some(BackgroundRecovery::Failed);
                    warnings.push(ClassificationWarning::BackgroundFallbackFailed { area_ratio });
                }
            }
        }

        if area < self.min_object_area {
            return Err(ClassificationError::ObjectTooSmall {
                area,
                minimum: self.min_object_area,
            });
        }

        let (width, height) = combined.dimensions();
        let object_mask = fill_contour(&contour, width, height);

        Ok(LocatedObject {
            contour,
            area,
            background_rejected,
            recovery,
            object_mask,
            warnings,
        })
    }

    /// Red wins when viable; green replaces it only when strictly larger
    fn recover(
        &self,
        red: &GrayImage,
        green: &GrayImage,
    ) -> Option<(Contour, f64, BackgroundRecovery)> {
        let mut best: Option<(Contour, f64, BackgroundRecovery)> = None;

        if let Some((contour, area)) = largest_contour(external_contours(red)) {
            if area > self.min_object_area {
                best = Some((contour, area, BackgroundRecovery::Red));
            }
        }

        if let Some((contour, area)) = largest_contour(external_contours(green)) {
            let to_beat = best.as_ref().map_or(0.0, |(_, a, _)| *a);
            if area > to_beat && area > self.min_object_area {
                best = Some((contour, area, BackgroundRecovery::Green));
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::segmentation::count_nonzero;
    use crate::color::MASK_ON;
    use image::Luma;

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::new(width, height)
    }

    /// Fill a `w x h` pixel block; its contour area is `(w - 1) * (h - 1)`
    fn paint(mask: &mut GrayImage, left: u32, top: u32, w: u32, h: u32) {
        for y in top..top + h {
            for x in left..left + w {
                mask.put_pixel(x, y, Luma([MASK_ON]));
            }
        }
    }

    fn area_of(mask: &GrayImage) -> f64 {
        let (w, h) = mask.dimensions();
        f64::from(w * h)
    }

    #[test]
    fn test_no_contours() {
        let empty = blank(50, 50);
        let result = ObjectLocator::default().locate(&empty, &empty, &empty, 2500.0);
        assert!(matches!(result, Err(ClassificationError::NoObjectDetected)));
    }

    #[test]
    fn test_exact_minimum_area_accepted() {
        let mut combined = blank(100, 100);
        paint(&mut combined, 10, 10, 41, 26); // 40 * 25 = 1000
        let empty = blank(100, 100);

        let object = ObjectLocator::default()
            .locate(&combined, &empty, &empty, area_of(&combined))
            .unwrap();

        assert_eq!(object.area, 1000.0);
        assert!(!object.background_rejected);
        assert_eq!(object.recovery, None);
        assert_eq!(count_nonzero(&object.object_mask), 41 * 26);
    }

    #[test]
    fn test_below_minimum_area_rejected() {
        let mut combined = blank(100, 100);
        paint(&mut combined, 10, 10, 28, 38); // 27 * 37 = 999
        let empty = blank(100, 100);

        let result = ObjectLocator::default().locate(&combined, &empty, &empty, 10_000.0);
        match result {
            Err(ClassificationError::ObjectTooSmall { area, minimum }) => {
                assert_eq!(area, 999.0);
                assert_eq!(minimum, 1000.0);
            }
            other => panic!("expected ObjectTooSmall, got {:?}", other),
        }
    }

    #[test]
    fn test_largest_region_wins() {
        let mut combined = blank(200, 200);
        paint(&mut combined, 5, 5, 40, 40);
        paint(&mut combined, 100, 100, 80, 60);
        let empty = blank(200, 200);

        let object = ObjectLocator::default()
            .locate(&combined, &empty, &empty, area_of(&combined))
            .unwrap();
        assert_eq!(object.area, 79.0 * 59.0);
        assert_eq!(object.object_mask.get_pixel(120, 120)[0], MASK_ON);
        assert_eq!(object.object_mask.get_pixel(10, 10)[0], 0);
    }

    #[test]
    fn test_background_recovers_red_region() {
        let combined = GrayImage::from_pixel(200, 200, Luma([MASK_ON]));
        let mut red = blank(200, 200);
        paint(&mut red, 40, 60, 101, 51); // 100 * 50 = 5000
        let empty = blank(200, 200);

        let object = ObjectLocator::default()
            .locate(&combined, &red, &empty, area_of(&combined))
            .unwrap();

        assert!(object.background_rejected);
        assert_eq!(object.recovery, Some(BackgroundRecovery::Red));
        assert_eq!(object.area, 5000.0);
        assert!(object.warnings.is_empty());
        assert_eq!(count_nonzero(&object.object_mask), 101 * 51);
    }

    #[test]
    fn test_background_prefers_larger_green() {
        let combined = GrayImage::from_pixel(200, 200, Luma([MASK_ON]));
        let mut red = blank(200, 200);
        paint(&mut red, 10, 10, 41, 41);
        let mut green = blank(200, 200);
        paint(&mut green, 80, 80, 61, 61);

        let object = ObjectLocator::default()
            .locate(&combined, &red, &green, area_of(&combined))
            .unwrap();
        assert_eq!(object.recovery, Some(BackgroundRecovery::Green));
        assert_eq!(object.area, 3600.0);
    }

    #[test]
    fn test_background_keeps_red_over_smaller_green() {
        let combined = GrayImage::from_pixel(200, 200, Luma([MASK_ON]));
        let mut red = blank(200, 200);
        paint(&mut red, 10, 10, 61, 61);
        let mut green = blank(200, 200);
        paint(&mut green, 100, 100, 41, 41);

        let object = ObjectLocator::default()
            .locate(&combined, &red, &green, area_of(&combined))
            .unwrap();
        assert_eq!(object.recovery, Some(BackgroundRecovery::Red));
    }

    #[test]
    fn test_background_fallback_failed_keeps_contour() {
        let combined = GrayImage::from_pixel(100, 100, Luma([MASK_ON]));
        let mut red = blank(100, 100);
        paint(&mut red, 10, 10, 20, 20); // too small to be viable
        let empty = blank(100, 100);

        let object = ObjectLocator::default()
            .locate(&combined, &red, &empty, area_of(&combined))
            .unwrap();

        assert!(object.background_rejected);
        assert_eq!(object.recovery, Some(BackgroundRecovery::Failed));
        assert_eq!(object.area, 99.0 * 99.0);
        assert!(matches!(
            object.warnings.as_slice(),
            [ClassificationWarning::BackgroundFallbackFailed { .. }]
        ));
    }

    #[test]
    fn test_recovery_viability_is_strict() {
        // A red region of exactly the minimum area is not a viable replacement
        let combined = GrayImage::from_pixel(100, 100, Luma([MASK_ON]));
        let mut red = blank(100, 100);
        paint(&mut red, 10, 10, 41, 26);
        let empty = blank(100, 100);

        let object = ObjectLocator::default()
            .locate(&combined, &red, &empty, area_of(&combined))
            .unwrap();
        assert_eq!(object.recovery, Some(BackgroundRecovery::Failed));
    }
}
