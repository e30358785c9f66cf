//! Evidence gathered from the located object
//!
//! Color evidence comes from per-class pixel votes inside the object mask,
//! shape evidence from geometric descriptors of the object's contour. The
//! two are independent of each other given the located object.

pub mod shape;
pub mod votes;

pub use shape::{RotatedRect, ShapeAnalyzer, ShapeDescription, ShapeMetrics};
pub use votes::{PixelVote, PixelVoter};
