//! Error taxonomy for the screening core

use std::path::PathBuf;

/// Errors raised while screening a student profile.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    /// A raw profile field is outside its documented range.
    #[error("invalid input: {field} = {value} is outside {min}..={max}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The classifier produced a label or probability outside its domain.
    #[error("invalid classification result: {reason}")]
    InvalidClassificationResult { reason: String },

    /// The model artifact could not be loaded.
    #[error("model unavailable at {path:?}: {reason}")]
    ModelUnavailable { path: PathBuf, reason: String },

    /// The classifier failed while running inference.
    #[error("inference failed in {model}: {reason}")]
    Inference { model: String, reason: String },
}

impl ScreeningError {
    /// True for errors caused by the request itself or the classifier's output,
    /// which are reported back to the caller instead of only being logged.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ScreeningError::InvalidInput { .. } | ScreeningError::InvalidClassificationResult { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScreeningError>;
