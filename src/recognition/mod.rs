pub mod bbox;
pub mod classifier;
pub mod preprocessing;
pub mod steps;

use std::path::Path;
use std::sync::Arc;

use image::GrayImage;
use tracing::debug;

use crate::error::RecognizeError;
use crate::models::{BoundingBox, NormalizedTensor, Point, Prediction};
use crate::pipeline::Pipeline;
use classifier::Classifier;

/// Outcome of recognizing one drawn region
#[derive(Debug, Clone)]
pub struct Recognition {
    pub bbox: BoundingBox,
    /// The region handed to the normalizer
    pub crop: GrayImage,
    pub prediction: Prediction,
}

/// Crop, normalize and classify the drawn content of `buffer`.
///
/// A blank buffer yields `NoDigit` without calling the classifier.
pub fn preprocess_and_classify(
    buffer: &GrayImage,
    classifier: &dyn Classifier,
) -> Result<Prediction, RecognizeError> {
    let bbox = bbox::from_buffer(buffer, bbox::BOUNDARY_MARGIN).ok_or(RecognizeError::NoDigit)?;
    let crop = bbox.crop(buffer);
    let tensor = preprocessing::normalize(&preprocessing::standard_pipeline(), &crop)
        .map_err(RecognizeError::Normalize)?;
    classify(classifier, &tensor)
}

fn classify(classifier: &dyn Classifier, tensor: &NormalizedTensor) -> Result<Prediction, RecognizeError> {
    let probabilities = classifier.predict(tensor).map_err(RecognizeError::Classifier)?;
    Ok(Prediction::from_probabilities(probabilities))
}

/// Classifier handle plus the normalizer, shared by every front-end
pub struct Recognizer {
    classifier: Arc<dyn Classifier>,
    normalizer: Pipeline,
    margin: u32,
}

impl Recognizer {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            normalizer: preprocessing::standard_pipeline(),
            margin: bbox::BOUNDARY_MARGIN,
        }
    }

    /// Store every normalization stage under `output_dir`
    pub fn with_debug(mut self, output_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        self.normalizer = self.normalizer.with_debug(output_dir)?;
        Ok(self)
    }

    /// Recognize whatever is drawn anywhere in `buffer`
    pub fn recognize_buffer(&self, buffer: &GrayImage) -> Result<Recognition, RecognizeError> {
        let bbox = bbox::from_buffer(buffer, self.margin).ok_or(RecognizeError::NoDigit)?;
        self.recognize_region(buffer, bbox)
    }

    /// Recognize the region around a just-finished stroke
    pub fn recognize_stroke(
        &self,
        buffer: &GrayImage,
        stroke: &[Point],
    ) -> Result<Recognition, RecognizeError> {
        let (width, height) = buffer.dimensions();
        let bbox = bbox::from_points(stroke, width, height, self.margin)
            .ok_or(RecognizeError::NoDigit)?;
        self.recognize_region(buffer, bbox)
    }

    pub fn recognize_region(
        &self,
        buffer: &GrayImage,
        bbox: BoundingBox,
    ) -> Result<Recognition, RecognizeError> {
        let crop = bbox.crop(buffer);
        let tensor = preprocessing::normalize(&self.normalizer, &crop)
            .map_err(RecognizeError::Normalize)?;
        let prediction = classify(self.classifier.as_ref(), &tensor)?;

        debug!(
            digit = prediction.digit,
            confidence = prediction.confidence,
            ?bbox,
            "recognized digit"
        );

        Ok(Recognition { bbox, crop, prediction })
    }
}
