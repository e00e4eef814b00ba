//! Classifier interface and its ONNX Runtime implementation

use crate::error::{Result, ScreeningError};
use crate::feature_engineer::EngineeredFeatureVector;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::assessment::ClassificationResult;
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Pre-trained binary classifier consumed by the screening pipeline.
///
/// `predict` returns both the label and the probability of label 1.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, features: &EngineeredFeatureVector) -> Result<ClassificationResult>;
}

/// Classifier backed by an ONNX export of the trained model
pub struct OnnxClassifier {
    name: String,
    /// Sessions need exclusive access per run
    model: Mutex<LoadedModel>,
}

impl OnnxClassifier {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            name: model.name.clone(),
            model: Mutex::new(model),
        }
    }

    /// Load the model file and wrap it as a classifier
    pub fn load<P: AsRef<Path>>(path: P, name: &str, onnx_threads: usize) -> Result<Self> {
        let model = ModelLoader::with_threads(onnx_threads).load_model(path, name)?;
        Ok(Self::new(model))
    }

    fn inference_error(&self, reason: impl std::fmt::Display) -> ScreeningError {
        ScreeningError::Inference {
            model: self.name.clone(),
            reason: reason.to_string(),
        }
    }

    fn run(
        &self,
        model: &mut LoadedModel,
        features: &EngineeredFeatureVector,
    ) -> Result<ClassificationResult> {
        // Prepare input tensor - shape [1, num_features]
        let input = features.to_f32_vec();
        let shape = vec![1_i64, input.len() as i64];
        let input_tensor = Tensor::from_array((shape, input))
            .map_err(|e| self.inference_error(format!("failed to create input tensor: {}", e)))?;

        let outputs = model
            .session
            .run(ort::inputs![model.input_name.as_str() => input_tensor])
            .map_err(|e| self.inference_error(e))?;

        let probability = self.extract_probability(&outputs, &model.probability_output)?;

        let label = match model.label_output.as_deref() {
            Some(label_output) => self.extract_label(&outputs, label_output)?,
            None => label_from_probability(probability),
        };

        debug!(model = %self.name, label = label, probability = probability, "Inference complete");

        Ok(ClassificationResult { label, probability })
    }

    /// Read the predicted label from an int64 tensor output
    fn extract_label(&self, outputs: &ort::session::SessionOutputs, output_name: &str) -> Result<i64> {
        let output = outputs
            .get(output_name)
            .ok_or_else(|| self.inference_error(format!("missing output {}", output_name)))?;

        let (_, data) = output
            .try_extract_tensor::<i64>()
            .map_err(|e| self.inference_error(format!("label output is not an int64 tensor: {}", e)))?;

        data.first()
            .copied()
            .ok_or_else(|| self.inference_error("empty label output"))
    }

    /// Extract the class-1 probability.
    /// Handles both tensor outputs and the seq(map) outputs of scikit-learn exports.
    fn extract_probability(&self, outputs: &ort::session::SessionOutputs, output_name: &str) -> Result<f64> {
        let output = outputs
            .get(output_name)
            .ok_or_else(|| self.inference_error(format!("missing output {}", output_name)))?;

        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return positive_class_probability(&dims, data)
                .ok_or_else(|| self.inference_error(format!("unexpected probability shape {:?}", dims)));
        }

        let dtype = output.dtype();
        if DynSequenceValueType::can_downcast(&dtype) {
            return self.extract_from_sequence_map(output);
        }

        Err(self.inference_error(format!("unsupported probability output type {:?}", dtype)))
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(&self, output: &ort::value::DynValue) -> Result<f64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| self.inference_error(format!("failed to downcast to sequence: {}", e)))?;

        let maps = sequence
            .try_extract_sequence::<DynMapValueType>(&allocator)
            .map_err(|e| self.inference_error(e))?;

        // batch size is always 1
        let map_value = maps
            .first()
            .ok_or_else(|| self.inference_error("empty probability sequence"))?;

        let kv_pairs = map_value
            .try_extract_key_values::<i64, f32>()
            .map_err(|e| self.inference_error(e))?;

        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 1) {
            return Ok(f64::from(*prob));
        }
        if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
            return Ok(1.0 - f64::from(*prob));
        }

        Err(self.inference_error("no class probability found in map"))
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &EngineeredFeatureVector) -> Result<ClassificationResult> {
        let mut guard = self
            .model
            .lock()
            .map_err(|e| self.inference_error(format!("lock error: {}", e)))?;
        self.run(&mut guard, features)
    }
}

/// Class-1 probability from a `[batch, classes]` or `[classes]` tensor
fn positive_class_probability(dims: &[i64], data: &[f32]) -> Option<f64> {
    let num_classes = *dims.last()?;
    let value = match num_classes {
        n if n >= 2 => data.get(1)?,
        1 => data.first()?,
        _ => return None,
    };
    Some(f64::from(*value))
}

/// Label used when the model exports probabilities only; ties go to class 0
fn label_from_probability(probability: f64) -> i64 {
    if probability > 0.5 {
        1
    } else {
        0
    }
}
