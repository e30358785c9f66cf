//! Rendering of the annotated overlay layer

pub mod glyphs;
pub mod overlay;

pub use overlay::{annotate, Annotation};
