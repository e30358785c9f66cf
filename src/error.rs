//! Error types for the spice_scan library

use thiserror::Error;

/// Result type alias for spice_scan operations
pub type Result<T> = std::result::Result<T, ClassificationError>;

/// Error types for classification operations
#[derive(Error, Debug)]
pub enum ClassificationError {
    /// Input image is empty or has a zero dimension
    #[error("Invalid image: {width}x{height}")]
    ImageInvalid { width: u32, height: u32 },

    /// The combined color mask produced no contours
    #[error("No object detected within the configured color ranges")]
    NoObjectDetected,

    /// The selected object is below the viability threshold
    #[error("Object too small: {area:.0} px² (minimum {minimum:.0} px²)")]
    ObjectTooSmall { area: f64, minimum: f64 },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration file could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Reporter could not deliver a result
    #[error("Failed to write report: {message}")]
    ReportError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Session action attempted from a state that does not allow it
    #[error("Cannot {action} while session is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

impl ClassificationError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a report delivery error with context
    pub fn report<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ReportError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if a fresh attempt (another image, another call) can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClassificationError::NoObjectDetected
                | ClassificationError::ObjectTooSmall { .. }
                | ClassificationError::InvalidTransition { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            ClassificationError::ImageInvalid { .. } | ClassificationError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file and try again.".to_string()
            }
            ClassificationError::NoObjectDetected => {
                "No object was found in the red, green or white color ranges.".to_string()
            }
            ClassificationError::ObjectTooSmall { area, minimum } => format!(
                "The object is too small to analyze ({:.0} px², minimum {:.0} px²). Move the camera closer.",
                area, minimum
            ),
            _ => "Classification failed. Please try with a different image.".to_string(),
        }
    }
}

/// Non-fatal conditions attached to a successful classification
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ClassificationWarning {
    /// Background was over-captured and no red/green candidate was viable;
    /// the oversized contour was kept
    BackgroundFallbackFailed { area_ratio: f64 },
}
