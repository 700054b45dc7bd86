use thiserror::Error;

/// Failures of a single recognition request.
///
/// Everything except `Normalize` and `Classifier` is caused by the caller's input.
#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("No digit detected. Please draw on the canvas.")]
    NoDigit,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("preprocessing failed: {0}")]
    Normalize(#[source] anyhow::Error),
    #[error("classifier failed: {0}")]
    Classifier(#[source] anyhow::Error),
}

impl RecognizeError {
    /// Whether the error stems from user input rather than the model
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            RecognizeError::Normalize(_) | RecognizeError::Classifier(_)
        )
    }
}
