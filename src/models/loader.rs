//! ONNX model loader

use crate::error::{Result, ScreeningError};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX model with metadata
pub struct LoadedModel {
    /// Model name
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature tensor
    pub input_name: String,
    /// Output holding the predicted label, if the export has one
    pub label_output: Option<String>,
    /// Output holding class probabilities
    pub probability_output: String,
}

/// Loader for ONNX models
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier from file.
    ///
    /// Fails with `ScreeningError::ModelUnavailable` when the file is missing
    /// or ONNX Runtime cannot build a session from it.
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> Result<LoadedModel> {
        let path = path.as_ref();
        let unavailable = |reason: String| ScreeningError::ModelUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        if !path.exists() {
            return Err(unavailable("model file not found".to_string()));
        }

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()
            .map_err(|e| unavailable(format!("session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| unavailable(format!("optimization error: {}", e)))?
            .with_intra_threads(self.onnx_threads)
            .map_err(|e| unavailable(format!("thread setup error: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| unavailable(format!("failed to load model: {}", e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let (label_output, probability_output) = select_outputs(&output_names)
            .ok_or_else(|| unavailable("model has no probability output".to_string()))?;

        info!(
            model = %name,
            input = %input_name,
            label_output = ?label_output,
            probability_output = %probability_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session,
            input_name,
            label_output,
            probability_output,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the label and probability outputs from a model's output names.
///
/// scikit-learn exports name them `output_label` and `output_probability`;
/// other exporters may only emit a single probability tensor.
pub(crate) fn select_outputs(names: &[String]) -> Option<(Option<String>, String)> {
    let label = names.iter().find(|n| n.contains("label")).cloned();

    let probability = names
        .iter()
        .find(|n| n.contains("prob"))
        .or_else(|| names.iter().rev().find(|n| !n.contains("label")))
        .cloned()?;

    Some((label, probability))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let loader = ModelLoader::new();
        let result = loader.load_model("models/does_not_exist.onnx", "depression_model");

        match result {
            Err(ScreeningError::ModelUnavailable { path, reason }) => {
                assert_eq!(path, Path::new("models/does_not_exist.onnx"));
                assert_eq!(reason, "model file not found");
            }
            Err(other) => panic!("expected ModelUnavailable, got {}", other),
            Ok(_) => panic!("expected ModelUnavailable, got a model"),
        }
    }

    #[test]
    fn test_select_sklearn_outputs() {
        let (label, prob) = select_outputs(&names(&["output_label", "output_probability"])).unwrap();
        assert_eq!(label.as_deref(), Some("output_label"));
        assert_eq!(prob, "output_probability");
    }

    #[test]
    fn test_select_single_output() {
        let (label, prob) = select_outputs(&names(&["variable"])).unwrap();
        assert_eq!(label, None);
        assert_eq!(prob, "variable");
    }

    #[test]
    fn test_select_label_only_fails() {
        assert!(select_outputs(&names(&["output_label"])).is_none());
        assert!(select_outputs(&[]).is_none());
    }
}
