//! Object detection module
//!
//! This module traces region boundaries in the segmentation masks and
//! isolates the single dominant specimen, rejecting frames where the
//! background itself was segmented as foreground.

pub mod contour;
pub mod locator;

pub use contour::{Contour, Point};
pub use locator::{BackgroundRecovery, LocatedObject, ObjectLocator};
