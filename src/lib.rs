pub mod canvas;
pub mod crops;
pub mod error;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod recognition;
pub mod server;

pub use error::RecognizeError;
pub use models::{BoundingBox, NormalizedTensor, Point, Prediction, PredictionReport};
pub use pipeline::{DebugConfig, Pipeline, PipelineContext, PipelineStep};
pub use recognition::classifier::{Classifier, RtenClassifier};
pub use recognition::{Recognition, Recognizer, preprocess_and_classify};

#[cfg(feature = "gui")]
pub mod gui;
