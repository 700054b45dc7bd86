use std::sync::Arc;

use anyhow::{Result, anyhow};
use image::GrayImage;
use image::imageops::FilterType;

use crate::models::{INPUT_SIZE, NormalizedTensor};
use crate::pipeline::Pipeline;
use crate::recognition::steps::{PadStep, ResizeStep};

/// Border added around the first resize, mirroring the margins of the
/// training digits.
pub const PAD_BORDER: u32 = 10;

/// Resize → pad → resize, the order the classifier was trained on
pub fn standard_pipeline() -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(ResizeStep {
            width: INPUT_SIZE,
            height: INPUT_SIZE,
            filter: FilterType::Triangle,
        }))
        .add_step(Arc::new(PadStep { border: PAD_BORDER, value: 0 }))
        .add_step(Arc::new(ResizeStep {
            width: INPUT_SIZE,
            height: INPUT_SIZE,
            filter: FilterType::Triangle,
        }))
}

/// Run a cropped digit through `pipeline` and scale it into [0, 1]
pub fn normalize(pipeline: &Pipeline, crop: &GrayImage) -> Result<NormalizedTensor> {
    let resized = pipeline.run(crop.clone())?;
    NormalizedTensor::from_gray(&resized).ok_or_else(|| {
        anyhow!(
            "normalizer produced {}x{}, expected {}x{}",
            resized.width(),
            resized.height(),
            INPUT_SIZE,
            INPUT_SIZE
        )
    })
}
