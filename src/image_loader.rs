//! Image loading for the classification pipeline
//!
//! The pipeline works on decoded 8-bit RGB rasters. This module is the thin
//! loader in front of it: it detects the format from the file extension,
//! decodes through the `image` crate and rejects empty images before any
//! processing starts.

use crate::error::{ClassificationError, Result};
use image::{ImageReader, RgbImage};
use std::path::Path;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    fn as_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Load an image from disk as an 8-bit RGB raster
///
/// # Errors
///
/// Returns `ClassificationError::ImageLoadError` if the file cannot be opened,
/// the format is not supported or decoding fails, and
/// `ClassificationError::ImageInvalid` if the decoded image is empty.
///
/// # Example
///
/// ```rust,no_run
/// use spice_scan::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("shallot.jpg"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), spice_scan::ClassificationError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| {
        ClassificationError::ImageLoadError {
            message: format!("Unknown image format for file: {}", path.display()),
            source: None,
        }
    })?;

    let mut reader = ImageReader::open(path).map_err(|e| {
        ClassificationError::image_load(
            format!("Failed to open image file: {}", path.display()),
            e,
        )
    })?;
    reader.set_format(format.as_image_format());

    let decoded = reader.decode().map_err(|e| {
        ClassificationError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let rgb = decoded.to_rgb8();
    ensure_non_empty(&rgb)?;
    Ok(rgb)
}

/// Reject images with a zero dimension
pub fn ensure_non_empty(image: &RgbImage) -> Result<()> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ClassificationError::ImageInvalid { width, height });
    }
    Ok(())
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
