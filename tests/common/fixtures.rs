use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use digitpad::{Classifier, NormalizedTensor, Recognizer};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};

/// Classifier returning a fixed distribution and remembering its inputs
pub struct StubClassifier {
    probabilities: [f32; 10],
    calls: AtomicUsize,
    inputs: Mutex<Vec<NormalizedTensor>>,
}

impl StubClassifier {
    /// Most mass on `digit`, the rest spread evenly
    pub fn confident(digit: usize) -> Arc<Self> {
        let mut probabilities = [0.05; 10];
        probabilities[digit] = 0.55;
        Arc::new(Self {
            probabilities,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<NormalizedTensor> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Classifier for StubClassifier {
    fn predict(&self, input: &NormalizedTensor) -> anyhow::Result<[f32; 10]> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.clone());
        Ok(self.probabilities)
    }
}

/// Classifier standing in for a broken model
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict(&self, _input: &NormalizedTensor) -> anyhow::Result<[f32; 10]> {
        anyhow::bail!("model exploded")
    }
}

pub fn recognizer_with(classifier: Arc<dyn Classifier>) -> Arc<Recognizer> {
    Arc::new(Recognizer::new(classifier))
}

/// Black `size` x `size` image with a white `square` x `square` block centered
pub fn centered_square(size: u32, square: u32) -> GrayImage {
    let start = (size - square) / 2;
    GrayImage::from_fn(size, size, |x, y| {
        let inside = (start..start + square).contains(&x) && (start..start + square).contains(&y);
        Luma([if inside { 255 } else { 0 }])
    })
}

pub fn encode_png(image: DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes
}

pub fn base64_png(image: &GrayImage) -> String {
    STANDARD.encode(encode_png(DynamicImage::ImageLuma8(image.clone())))
}

/// What a browser canvas `toDataURL()` sends: RGBA with a data-URL header
pub fn data_url_png(image: &GrayImage) -> String {
    let rgba = DynamicImage::ImageLuma8(image.clone()).to_rgba8();
    let encoded = STANDARD.encode(encode_png(DynamicImage::ImageRgba8(rgba)));
    format!("data:image/png;base64,{}", encoded)
}
