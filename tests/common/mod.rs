mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from digitpad for tests
pub use digitpad::{
    Classifier, NormalizedTensor, Point, Prediction, RecognizeError, Recognizer,
};
