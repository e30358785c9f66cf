//! Stage-by-stage classification pipeline
//!
//! Every stage consumes the context produced by the previous one and
//! returns a new, larger context. Nothing is shared between runs and no
//! field is ever reset in place: a new image always starts from a fresh
//! [`Denoised`] context.
//!
//! ```text
//! RgbImage -> Denoised -> Segmented -> Located -> Analyzed -> Classified
//! ```

use crate::analysis::{PixelVote, PixelVoter, ShapeAnalyzer, ShapeDescription};
use crate::color::{ColorSegmenter, SegmentationMasks};
use crate::config::ClassifierConfig;
use crate::decision::{Classifier, Decision};
use crate::detection::{LocatedObject, ObjectLocator};
use crate::error::Result;
use crate::preprocess::Preprocessor;
use crate::visualize::{annotate, Annotation};
use crate::ClassificationResult;
use image::{GrayImage, RgbImage};

/// Intermediate rasters for an external renderer
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineLayers {
    pub original: RgbImage,
    pub denoised: RgbImage,
    pub hsv_value: GrayImage,
    pub mask_red: GrayImage,
    pub mask_green: GrayImage,
    pub mask_white: GrayImage,
    pub mask_combined: GrayImage,
    pub object_mask: GrayImage,
    pub annotated: RgbImage,
}

impl PipelineLayers {
    /// Layers paired with stable file-friendly names, in pipeline order
    pub fn named(&self) -> Vec<(&'static str, image::DynamicImage)> {
        use image::DynamicImage;
        vec![
            ("original", DynamicImage::ImageRgb8(self.original.clone())),
            ("denoised", DynamicImage::ImageRgb8(self.denoised.clone())),
            ("hsv_value", DynamicImage::ImageLuma8(self.hsv_value.clone())),
            ("mask_red", DynamicImage::ImageLuma8(self.mask_red.clone())),
            ("mask_green", DynamicImage::ImageLuma8(self.mask_green.clone())),
            ("mask_white", DynamicImage::ImageLuma8(self.mask_white.clone())),
            ("mask_combined", DynamicImage::ImageLuma8(self.mask_combined.clone())),
            ("object_mask", DynamicImage::ImageLuma8(self.object_mask.clone())),
            ("annotated", DynamicImage::ImageRgb8(self.annotated.clone())),
        ]
    }
}

/// Output of denoising
#[derive(Debug, Clone)]
pub struct Denoised {
    pub original: RgbImage,
    pub denoised: RgbImage,
}

/// Output of color segmentation
#[derive(Debug, Clone)]
pub struct Segmented {
    pub original: RgbImage,
    pub denoised: RgbImage,
    pub masks: SegmentationMasks,
}

/// Output of object location
#[derive(Debug, Clone)]
pub struct Located {
    pub original: RgbImage,
    pub denoised: RgbImage,
    pub masks: SegmentationMasks,
    pub object: LocatedObject,
}

/// Output of voting and shape analysis
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub original: RgbImage,
    pub denoised: RgbImage,
    pub masks: SegmentationMasks,
    pub object: LocatedObject,
    pub vote: PixelVote,
    pub shape: ShapeDescription,
}

/// Final context
#[derive(Debug, Clone)]
pub struct Classified {
    pub original: RgbImage,
    pub denoised: RgbImage,
    pub masks: SegmentationMasks,
    pub object: LocatedObject,
    pub vote: PixelVote,
    pub shape: ShapeDescription,
    pub decision: Decision,
}

impl Classified {
    pub fn result(&self) -> ClassificationResult {
        ClassificationResult {
            predicted_class: self.decision.class,
            dominant_color: self.decision.dominant_color,
            shape_metrics: self.shape.metrics,
            pixel_vote: self.vote,
            background_rejected: self.object.background_rejected,
            explanation: self.decision.explanation.clone(),
            area: self.object.area,
            rotated_rect: self.shape.rotated_rect,
            warnings: self.object.warnings.clone(),
        }
    }

    /// Build the visualization layers, consuming the context
    pub fn into_layers(self) -> PipelineLayers {
        let annotated = annotate(
            &self.original,
            &Annotation {
                contour: &self.object.contour,
                recovery: self.object.recovery,
                rotated_rect: &self.shape.rotated_rect,
                hull: &self.shape.hull,
                label: self.decision.class.label(),
            },
        );

        PipelineLayers {
            hsv_value: self.masks.hsv.value_channel(),
            original: self.original,
            denoised: self.denoised,
            mask_red: self.masks.red,
            mask_green: self.masks.green,
            mask_white: self.masks.white,
            mask_combined: self.masks.combined,
            object_mask: self.object.object_mask,
            annotated,
        }
    }
}

/// The configured stage components
#[derive(Debug, Clone)]
pub struct Pipeline {
    preprocessor: Preprocessor,
    segmenter: ColorSegmenter,
    locator: ObjectLocator,
    voter: PixelVoter,
    shape_analyzer: ShapeAnalyzer,
    classifier: Classifier,
}

impl Pipeline {
    /// Build the stages from a validated configuration
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the configuration fails validation.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::from_config(&config.preprocessing),
            segmenter: ColorSegmenter::new(config.segmentation.clone()),
            locator: ObjectLocator::from_config(&config.locator),
            voter: PixelVoter::new(),
            shape_analyzer: ShapeAnalyzer::new(),
            classifier: Classifier::new(config.decision.clone()),
        })
    }

    /// Run every stage
    pub fn run(&self, image: RgbImage) -> Result<Classified> {
        let denoised = self.denoise(image)?;
        let segmented = self.segment(denoised);
        let located = self.locate(segmented)?;
        let analyzed = self.analyze(located);
        Ok(self.decide(analyzed))
    }

    pub fn denoise(&self, image: RgbImage) -> Result<Denoised> {
        let denoised = self.preprocessor.denoise(&image)?;
        tracing::debug!(width = image.width(), height = image.height(), "denoised");
        Ok(Denoised {
            original: image,
            denoised,
        })
    }

    pub fn segment(&self, ctx: Denoised) -> Segmented {
        let masks = self.segmenter.segment(&ctx.denoised);
        Segmented {
            original: ctx.original,
            denoised: ctx.denoised,
            masks,
        }
    }

    /// # Errors
    ///
    /// `NoObjectDetected` or `ObjectTooSmall` from the locator.
    pub fn locate(&self, ctx: Segmented) -> Result<Located> {
        let (width, height) = ctx.original.dimensions();
        let image_area = f64::from(width) * f64::from(height);
        let object = self.locator.locate(
            &ctx.masks.combined,
            &ctx.masks.red,
            &ctx.masks.green,
            image_area,
        )?;
        Ok(Located {
            original: ctx.original,
            denoised: ctx.denoised,
            masks: ctx.masks,
            object,
        })
    }

    pub fn analyze(&self, ctx: Located) -> Analyzed {
        let vote = self.voter.vote(
            &ctx.masks.red,
            &ctx.masks.green,
            &ctx.masks.white,
            &ctx.object.object_mask,
            ctx.object.background_rejected,
        );
        let shape = self.shape_analyzer.describe(&ctx.object.contour);
        Analyzed {
            original: ctx.original,
            denoised: ctx.denoised,
            masks: ctx.masks,
            object: ctx.object,
            vote,
            shape,
        }
    }

    pub fn decide(&self, ctx: Analyzed) -> Classified {
        let mut decision = self.classifier.classify(&ctx.vote, &ctx.shape.metrics);
        if ctx.object.background_rejected {
            decision = decision.with_background_note();
        }

        tracing::info!(
            class = %decision.class,
            dominant_color = %decision.dominant_color,
            red = ctx.vote.red_count,
            green = ctx.vote.green_count,
            white = ctx.vote.white_count,
            pct_red = ctx.vote.pct_red,
            pct_green = ctx.vote.pct_green,
            aspect_ratio = ctx.shape.metrics.aspect_ratio,
            solidity = ctx.shape.metrics.solidity,
            circularity = ctx.shape.metrics.circularity,
            "classified"
        );

        Classified {
            original: ctx.original,
            denoised: ctx.denoised,
            masks: ctx.masks,
            object: ctx.object,
            vote: ctx.vote,
            shape: ctx.shape,
            decision,
        }
    }
}
