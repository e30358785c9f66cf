//! Classification session lifecycle
//!
//! A session walks `Unloaded -> Loaded -> Processed -> Reported`. Loading
//! an image always replaces the whole state, so nothing derived from a
//! previous image can survive into the next one. A failed `process` on a
//! valid image leaves the session `Loaded`, ready for another attempt.

use crate::config::ClassifierConfig;
use crate::error::{ClassificationError, Result};
use crate::image_loader::ensure_non_empty;
use crate::pipeline::{Pipeline, PipelineLayers};
use crate::ClassificationResult;
use image::RgbImage;
use std::io::Write;

/// Consumer of finished classifications
pub trait Reporter {
    fn report(&mut self, result: &ClassificationResult, layers: &PipelineLayers) -> Result<()>;
}

/// Writes each result as pretty-printed JSON followed by a newline
#[derive(Debug)]
pub struct JsonReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, result: &ClassificationResult, _layers: &PipelineLayers) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, result)
            .map_err(|e| ClassificationError::report("could not serialize result", e))?;
        writeln!(self.writer).map_err(|e| ClassificationError::report("could not write result", e))?;
        self.writer
            .flush()
            .map_err(|e| ClassificationError::report("could not flush report", e))
    }
}

/// Session states; each carries exactly the artifacts valid for it
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Unloaded,
    Loaded {
        image: RgbImage,
    },
    Processed {
        image: RgbImage,
        result: ClassificationResult,
        layers: PipelineLayers,
    },
    Reported {
        image: RgbImage,
        result: ClassificationResult,
        layers: PipelineLayers,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unloaded => "unloaded",
            SessionState::Loaded { .. } => "loaded",
            SessionState::Processed { .. } => "processed",
            SessionState::Reported { .. } => "reported",
        }
    }
}

/// Interactive classification session over one image at a time
#[derive(Debug)]
pub struct ClassificationSession {
    pipeline: Pipeline,
    state: SessionState,
}

impl ClassificationSession {
    /// # Errors
    ///
    /// `InvalidParameter` if `config` fails validation.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        Ok(Self {
            pipeline: Pipeline::new(config)?,
            state: SessionState::Unloaded,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Latest result, if the session is processed or reported
    pub fn result(&self) -> Option<&ClassificationResult> {
        match &self.state {
            SessionState::Processed { result, .. } | SessionState::Reported { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn layers(&self) -> Option<&PipelineLayers> {
        match &self.state {
            SessionState::Processed { layers, .. } | SessionState::Reported { layers, .. } => Some(layers),
            _ => None,
        }
    }

    /// Accept a new image, discarding everything derived from the previous one
    ///
    /// An invalid image leaves the session `Unloaded`.
    pub fn load(&mut self, image: RgbImage) -> Result<()> {
        self.state = SessionState::Unloaded;
        ensure_non_empty(&image)?;
        tracing::debug!(width = image.width(), height = image.height(), "image loaded");
        self.state = SessionState::Loaded { image };
        Ok(())
    }

    /// Classify the loaded image and return a copy of the stored result
    ///
    /// # Errors
    ///
    /// `InvalidTransition` when no image is loaded; `NoObjectDetected` or
    /// `ObjectTooSmall` leave the session `Loaded`.
    pub fn process(&mut self) -> Result<ClassificationResult> {
        let image = match std::mem::take(&mut self.state) {
            SessionState::Unloaded => {
                return Err(ClassificationError::InvalidTransition {
                    from: "unloaded",
                    action: "process",
                })
            }
            SessionState::Loaded { image }
            | SessionState::Processed { image, .. }
            | SessionState::Reported { image, .. } => image,
        };

        match self.pipeline.run(image.clone()) {
            Ok(classified) => {
                let result = classified.result();
                let layers = classified.into_layers();
                self.state = SessionState::Processed {
                    image,
                    result: result.clone(),
                    layers,
                };
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "classification failed, image kept");
                self.state = SessionState::Loaded { image };
                Err(e)
            }
        }
    }

    /// Hand the result to `reporter`
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the session is `Processed`; reporter
    /// failures leave the session `Processed`.
    pub fn report(&mut self, reporter: &mut dyn Reporter) -> Result<()> {
        match std::mem::take(&mut self.state) {
            SessionState::Processed {
                image,
                result,
                layers,
            } => {
                if let Err(e) = reporter.report(&result, &layers) {
                    self.state = SessionState::Processed {
                        image,
                        result,
                        layers,
                    };
                    return Err(e);
                }
                self.state = SessionState::Reported {
                    image,
                    result,
                    layers,
                };
                Ok(())
            }
            other => {
                let from = other.name();
                self.state = other;
                Err(ClassificationError::InvalidTransition {
                    from,
                    action: "report",
                })
            }
        }
    }
}
