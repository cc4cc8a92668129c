//! Model-backed document classification

use crate::config::ModelsConfig;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::models::probabilities::ClassProbabilities;
use crate::types::document::DocumentType;
use anyhow::Result;
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

/// Reasons a model inference call can fail.
///
/// Every variant is recoverable: the classifier answers from its keyword
/// rules instead.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model lock poisoned")]
    LockPoisoned,
    #[error("failed to build input tensor: {0}")]
    Input(String),
    #[error("model run failed: {0}")]
    Run(String),
    #[error("could not read class probabilities: {0}")]
    Output(String),
    #[error("predicted class {index} has no label ({labels} labels loaded)")]
    LabelOutOfRange { index: usize, labels: usize },
}

/// Result of one model inference
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Raw class name from the labels file
    pub label: String,
    /// Label mapped onto the canonical document types
    pub document_type: DocumentType,
    /// Probability of the predicted class (0.0 - 1.0)
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
}

/// A trained classifier that maps text to a document type
pub trait ModelInference: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, text: &str) -> Result<Prediction, InferenceError>;
}

/// Document classifier backed by an ONNX model
pub struct ModelClassifier {
    /// ort sessions need exclusive access to run; weights are never mutated
    model: Mutex<LoadedModel>,
    name: String,
}

impl ModelClassifier {
    /// Load the classifier artifacts described by the configuration
    pub fn new(config: &ModelsConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.onnx_threads)?;
        let model = loader.load(config)?;
        info!(model = %model.name, labels = ?model.labels, "Model classifier initialized");
        Ok(Self::from_loaded(model))
    }

    pub fn from_loaded(model: LoadedModel) -> Self {
        let name = model.name.clone();
        Self {
            model: Mutex::new(model),
            name,
        }
    }
}

impl ModelInference for ModelClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    /// Run the model on `text` and return the arg-max class
    fn predict(&self, text: &str) -> Result<Prediction, InferenceError> {
        let mut model = self.model.lock().map_err(|_| InferenceError::LockPoisoned)?;

        let features = model.vectorizer.transform(text);
        let num_labels = model.labels.len();
        let probabilities = run_model(&mut model, features, num_labels)?;

        let (index, confidence) = probabilities
            .best()
            .ok_or_else(|| InferenceError::Output("empty probability vector".to_string()))?;
        let label = model
            .labels
            .get(index)
            .cloned()
            .ok_or(InferenceError::LabelOutOfRange {
                index,
                labels: model.labels.len(),
            })?;
        let document_type = DocumentType::from_model_label(&label);

        debug!(
            model = %model.name,
            label = %label,
            document_type = %document_type,
            confidence = confidence,
            "Model inference complete"
        );

        Ok(Prediction {
            label,
            document_type,
            confidence,
            probabilities,
        })
    }
}

/// Run a single feature row through the session
fn run_model(
    model: &mut LoadedModel,
    features: Vec<f32>,
    num_labels: usize,
) -> Result<ClassProbabilities, InferenceError> {
    // Prepare input tensor - shape [1, num_features]
    let shape = vec![1_i64, features.len() as i64];
    let input_tensor =
        Tensor::from_array((shape, features)).map_err(|e| InferenceError::Input(e.to_string()))?;

    let outputs = model
        .session
        .run(ort::inputs![&model.input_name => input_tensor])
        .map_err(|e| InferenceError::Run(e.to_string()))?;

    if let Some(output) = outputs.get(model.output_name.as_str()) {
        if let Some(probabilities) = read_probabilities(output, num_labels) {
            return Ok(probabilities);
        }
    }

    // Fallback: first non-label output that reads as probabilities
    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }
        if let Some(probabilities) = read_probabilities(&output, num_labels) {
            debug!(model = %model.name, output = %name, "Read probabilities from fallback output");
            return Ok(probabilities);
        }
    }

    Err(InferenceError::Output(format!(
        "no usable output for model {}",
        model.name
    )))
}

/// Read class probabilities from a tensor or a seq(map(int64, float)) output
fn read_probabilities(output: &DynValue, num_labels: usize) -> Option<ClassProbabilities> {
    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        let row = match dims.as_slice() {
            // [batch, num_classes] - first (only) row
            [_, classes] if *classes > 0 => &data[..(*classes as usize).min(data.len())],
            _ => data,
        };
        let probabilities = ClassProbabilities::from_scores(row);
        return (!probabilities.is_empty()).then_some(probabilities);
    }

    let dtype = output.dtype();
    if DynSequenceValueType::can_downcast(&dtype) {
        return read_sequence_map(output, num_labels).ok();
    }

    None
}

/// Classifier exports with a zipmap emit one `{class_id: probability}` map per row
fn read_sequence_map(output: &DynValue, num_labels: usize) -> Result<ClassProbabilities> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
    let map_value = maps
        .first()
        .ok_or_else(|| anyhow::anyhow!("Empty sequence"))?;

    let pairs = map_value.try_extract_key_values::<i64, f32>()?;
    let probabilities = ClassProbabilities::from_class_map(&pairs, num_labels);
    if probabilities.is_empty() {
        anyhow::bail!("No probability found in map");
    }
    Ok(probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_error_messages() {
        let err = InferenceError::LabelOutOfRange {
            index: 4,
            labels: 3,
        };
        assert_eq!(err.to_string(), "predicted class 4 has no label (3 labels loaded)");

        let err = InferenceError::Run("shape mismatch".to_string());
        assert_eq!(err.to_string(), "model run failed: shape mismatch");
    }
}
