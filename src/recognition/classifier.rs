use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rten::Model;
use rten_tensor::NdTensor;
use rten_tensor::prelude::*;
use tracing::{debug, info};

use crate::models::{NUM_CLASSES, NormalizedTensor};

/// Anything that maps a normalized digit to a distribution over 0-9.
///
/// Implementations are shared between requests, so `predict` takes `&self`.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: &NormalizedTensor) -> Result<[f32; NUM_CLASSES]>;
}

/// Classifier backed by an `.rten` model taking `[1, 28, 28, 1]` input
pub struct RtenClassifier {
    model: Model,
}

impl RtenClassifier {
    /// Load the model file. Called once at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!(
                "Model file not found: {}\n\
                 Convert the trained network to ONNX and then to .rten (rten-convert model.onnx)",
                path.display()
            );
        }

        let model = Model::load_file(path)
            .with_context(|| format!("Failed to load model {}", path.display()))?;
        info!("loaded classifier model from {}", path.display());

        Ok(Self { model })
    }
}

impl Classifier for RtenClassifier {
    fn predict(&self, input: &NormalizedTensor) -> Result<[f32; NUM_CLASSES]> {
        let tensor = NdTensor::from_data(NormalizedTensor::SHAPE, input.as_slice().to_vec());
        let output = self.model.run_one(tensor.view().into(), None)?;
        let output: NdTensor<f32, 2> = output
            .try_into()
            .map_err(|e| anyhow!("Unexpected classifier output: {:?}", e))?;

        let values: Vec<f32> = output.iter().copied().collect();
        debug!(shape = ?output.shape(), "classifier output");
        to_probabilities(&values)
    }
}

/// Validate raw model output. Outputs that are not already a distribution are
/// treated as logits.
pub fn to_probabilities(values: &[f32]) -> Result<[f32; NUM_CLASSES]> {
    let mut probs: [f32; NUM_CLASSES] = values.try_into().map_err(|_| {
        anyhow!(
            "classifier returned {} values, expected {}",
            values.len(),
            NUM_CLASSES
        )
    })?;

    if probs.iter().any(|p| !p.is_finite()) {
        anyhow::bail!("classifier returned non-finite values: {:?}", probs);
    }

    let sum: f32 = probs.iter().sum();
    let is_distribution = probs.iter().all(|&p| p >= 0.0) && (sum - 1.0).abs() < 1e-3;
    if !is_distribution {
        softmax(&mut probs);
    }

    Ok(probs)
}

fn softmax(values: &mut [f32]) {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}
