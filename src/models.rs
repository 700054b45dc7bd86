use std::collections::BTreeMap;

use image::GrayImage;
use serde::Serialize;

/// Side length of the square classifier input
pub const INPUT_SIZE: u32 = 28;

/// Number of digit classes the classifier distinguishes
pub const NUM_CLASSES: usize = 10;

pub const LABELS: [&str; NUM_CLASSES] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

/// Pointer position in canvas pixels. May lie outside the canvas while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Region of drawn content, upper bounds exclusive.
///
/// Covers columns `min_x..max_x` and rows `min_y..max_y`; never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y
    }

    /// Crop the box out of a buffer
    pub fn crop(&self, buffer: &GrayImage) -> GrayImage {
        image::imageops::crop_imm(buffer, self.min_x, self.min_y, self.width(), self.height())
            .to_image()
    }
}

/// 28x28x1 classifier input with every value in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Vec<f32>,
}

impl NormalizedTensor {
    /// Batch shape handed to the model (NHWC)
    pub const SHAPE: [usize; 4] = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 1];

    /// Scale a 28x28 grayscale image into [0, 1].
    ///
    /// Returns `None` for any other size.
    pub fn from_gray(image: &GrayImage) -> Option<Self> {
        if image.dimensions() != (INPUT_SIZE, INPUT_SIZE) {
            return None;
        }
        let data = image.pixels().map(|p| p[0] as f32 / 255.0).collect();
        Some(Self { data })
    }

    /// Row-major values
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.data[(y * INPUT_SIZE + x) as usize]
    }
}

/// Classifier output together with its argmax
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub digit: usize,
    pub confidence: f32,
    pub probabilities: [f32; NUM_CLASSES],
}

impl Prediction {
    pub fn from_probabilities(probabilities: [f32; NUM_CLASSES]) -> Self {
        let mut digit = 0;
        for (i, &p) in probabilities.iter().enumerate() {
            if p > probabilities[digit] {
                digit = i;
            }
        }
        Self {
            digit,
            confidence: probabilities[digit],
            probabilities,
        }
    }

    pub fn label(&self) -> &'static str {
        LABELS[self.digit]
    }

    pub fn report(&self) -> PredictionReport {
        let probabilities = self
            .probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| (i.to_string(), percent(p)))
            .collect();
        PredictionReport {
            success: true,
            digit: self.digit,
            label: self.label(),
            confidence: percent(self.confidence),
            probabilities,
        }
    }
}

/// Presenter output shared by the web endpoint and the command line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub success: bool,
    pub digit: usize,
    pub label: &'static str,
    pub confidence: f64,
    pub probabilities: BTreeMap<String, f64>,
}

/// Probability as a percentage rounded to 2 decimals
fn percent(p: f32) -> f64 {
    (p as f64 * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn argmax_picks_first_maximum() {
        let mut probs = [0.0; NUM_CLASSES];
        probs[3] = 0.4;
        probs[7] = 0.4;
        probs[1] = 0.2;
        let prediction = Prediction::from_probabilities(probs);
        assert_eq!(prediction.digit, 3);
        assert_eq!(prediction.label(), "Three");
        assert_eq!(prediction.confidence, 0.4);
    }

    #[test]
    fn report_rounds_to_two_decimals() {
        let mut probs = [0.0; NUM_CLASSES];
        probs[9] = 0.987654;
        probs[4] = 0.012346;
        let report = Prediction::from_probabilities(probs).report();
        assert!(report.success);
        assert_eq!(report.digit, 9);
        assert_eq!(report.label, "Nine");
        assert_eq!(report.confidence, 98.77);
        assert_eq!(report.probabilities["4"], 1.23);
        assert_eq!(report.probabilities["0"], 0.0);
        assert_eq!(report.probabilities.len(), NUM_CLASSES);
    }

    #[test]
    fn tensor_rejects_wrong_size() {
        assert!(NormalizedTensor::from_gray(&GrayImage::new(27, 28)).is_none());
        assert!(NormalizedTensor::from_gray(&GrayImage::new(48, 48)).is_none());
    }

    #[test]
    fn tensor_scales_into_unit_range() {
        let mut img = GrayImage::new(INPUT_SIZE, INPUT_SIZE);
        img.put_pixel(3, 5, Luma([255]));
        img.put_pixel(4, 5, Luma([51]));
        let tensor = NormalizedTensor::from_gray(&img).unwrap();
        assert_eq!(tensor.as_slice().len(), 784);
        assert_eq!(tensor.get(3, 5), 1.0);
        assert!((tensor.get(4, 5) - 0.2).abs() < 1e-6);
        assert_eq!(tensor.get(0, 0), 0.0);
    }

    #[test]
    fn bbox_crop_matches_dimensions() {
        let buffer = GrayImage::new(100, 80);
        let bbox = BoundingBox { min_x: 10, min_y: 20, max_x: 35, max_y: 30 };
        let crop = bbox.crop(&buffer);
        assert_eq!(crop.dimensions(), (25, 10));
    }
}
