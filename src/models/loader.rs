//! Classifier artifact loader (ONNX model, vectorizer, labels)

use crate::config::ModelsConfig;
use crate::models::vectorizer::TfidfVectorizer;
use anyhow::{bail, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded document classifier with everything needed to run it
pub struct LoadedModel {
    /// Model name (file stem)
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature row
    pub input_name: String,
    /// Output name for class probabilities
    pub output_name: String,
    /// Text → feature row transform
    pub vectorizer: TfidfVectorizer,
    /// Class names in model output order
    pub labels: Vec<String>,
}

/// Loader for classifier artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Result<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load the classifier, its vectorizer and label list as configured
    pub fn load(&self, config: &ModelsConfig) -> Result<LoadedModel> {
        let vectorizer = TfidfVectorizer::load(config.vectorizer_path())?;
        let labels = load_labels(config.labels_path())?;
        let model_path = config.model_path();
        let name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "classifier".to_string());

        self.load_session(&model_path, &name, vectorizer, labels)
    }

    fn load_session(
        &self,
        path: &Path,
        name: &str,
        vectorizer: TfidfVectorizer,
        labels: Vec<String>,
    ) -> Result<LoadedModel> {
        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("logits"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "probabilities".to_string())
            });

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            features = vectorizer.dimension(),
            classes = labels.len(),
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session,
            input_name,
            output_name,
            vectorizer,
            labels,
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self { onnx_threads: 1 }
    }
}

/// Read the ordered class-name list written next to the model
pub fn load_labels<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read labels from {}", path.display()))?;
    parse_labels(&raw).with_context(|| format!("Invalid labels file {}", path.display()))
}

fn parse_labels(raw: &str) -> Result<Vec<String>> {
    let labels: Vec<String> = serde_json::from_str(raw)?;
    if labels.is_empty() {
        bail!("label list is empty");
    }
    Ok(labels)
}
