//! Document type classification.
//!
//! The strategy is fixed when the classifier is built: a loaded ONNX model
//! with the keyword rules as a per-call fallback, or the keyword rules alone.

pub mod rules;

pub use rules::RuleBasedClassifier;

use crate::config::ModelsConfig;
use crate::models::{ModelClassifier, ModelInference};
use crate::types::document::DocumentType;
use crate::types::record::{ClassificationResult, ClassificationSource};
use tracing::{info, warn};

/// How documents are classified for the lifetime of the process
pub enum ClassificationStrategy {
    /// Trained model; keyword rules answer when inference fails
    ModelBacked(Box<dyn ModelInference>),
    RuleBased,
}

/// Text → (document type, confidence)
pub struct DocumentClassifier {
    strategy: ClassificationStrategy,
    rules: RuleBasedClassifier,
}

impl DocumentClassifier {
    /// Build from configuration, loading the model when enabled.
    ///
    /// A model that fails to load leaves the classifier rule-based.
    pub fn from_config(config: &ModelsConfig) -> Self {
        if !config.enabled {
            info!("Model classification disabled, using keyword rules");
            return Self::rule_based();
        }

        match ModelClassifier::new(config) {
            Ok(model) => Self::with_model(Box::new(model)),
            Err(e) => {
                let error = format!("{:#}", e);
                warn!(
                    models_dir = %config.models_dir,
                    error = %error,
                    "Failed to load classifier model, using keyword rules"
                );
                Self::rule_based()
            }
        }
    }

    pub fn rule_based() -> Self {
        Self {
            strategy: ClassificationStrategy::RuleBased,
            rules: RuleBasedClassifier::new(),
        }
    }

    pub fn with_model(model: Box<dyn ModelInference>) -> Self {
        Self {
            strategy: ClassificationStrategy::ModelBacked(model),
            rules: RuleBasedClassifier::new(),
        }
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self.strategy, ClassificationStrategy::ModelBacked(_))
    }

    pub fn strategy_name(&self) -> &str {
        match &self.strategy {
            ClassificationStrategy::ModelBacked(model) => model.name(),
            ClassificationStrategy::RuleBased => "keyword_rules",
        }
    }

    /// Classify extracted text. Never fails.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        if text.trim().is_empty() {
            return ClassificationResult::new(DocumentType::Invalid, 0.0, ClassificationSource::Rules);
        }

        if let ClassificationStrategy::ModelBacked(model) = &self.strategy {
            match model.predict(text) {
                Ok(prediction) => {
                    return ClassificationResult::new(
                        prediction.document_type,
                        prediction.confidence,
                        ClassificationSource::Model,
                    );
                }
                Err(e) => {
                    warn!(model = %model.name(), error = %e, "Model inference failed, using keyword rules");
                }
            }
        }

        let (document_type, confidence) = self.rules.classify(text);
        ClassificationResult::new(document_type, confidence, ClassificationSource::Rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassProbabilities, InferenceError, Prediction};

    struct FailingModel;

    impl ModelInference for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict(&self, _text: &str) -> Result<Prediction, InferenceError> {
            Err(InferenceError::Run("session unavailable".to_string()))
        }
    }

    struct FixedModel(&'static str);

    impl ModelInference for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict(&self, _text: &str) -> Result<Prediction, InferenceError> {
            Ok(Prediction {
                label: self.0.to_string(),
                document_type: DocumentType::from_model_label(self.0),
                confidence: 0.9,
                probabilities: ClassProbabilities::from_scores(&[0.9, 0.1]),
            })
        }
    }

    #[test]
    fn test_empty_text_is_invalid() {
        let classifier = DocumentClassifier::rule_based();
        let result = classifier.classify("   \n\t");
        assert_eq!(result.document_type, DocumentType::Invalid);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_disabled_model_is_rule_based() {
        let config = ModelsConfig {
            enabled: false,
            models_dir: "models".to_string(),
            model_file: "classifier.onnx".to_string(),
            vectorizer_file: "vectorizer.json".to_string(),
            labels_file: "labels.json".to_string(),
            onnx_threads: 1,
        };
        let classifier = DocumentClassifier::from_config(&config);
        assert!(!classifier.is_model_loaded());
        assert_eq!(classifier.strategy_name(), "keyword_rules");
    }

    #[test]
    fn test_rule_based_results() {
        let classifier = DocumentClassifier::rule_based();

        let result = classifier.classify(
            "Maharashtra RERA Registration Certificate. Certificate No: P52100000001. \
             This registration is granted under section 5.",
        );
        assert_eq!(result.document_type, DocumentType::ReraCertificate);
        assert!(result.confidence > 0.3);
        assert_eq!(result.source, ClassificationSource::Rules);

        let result = classifier.classify("fake forged sale deed, stamp duty not paid, no registration");
        assert_eq!(result.document_type, DocumentType::SaleDeed);

        let result = classifier.classify("Curriculum vitae, software engineer, 5 years experience");
        assert_eq!(result.document_type, DocumentType::Invalid);
        assert_eq!(result.confidence, 0.8);
    }

    #[test]
    fn test_model_prediction_is_used() {
        let classifier = DocumentClassifier::with_model(Box::new(FixedModel("real_estate")));
        assert!(classifier.is_model_loaded());
        assert_eq!(classifier.strategy_name(), "fixed");

        let result = classifier.classify("Curriculum vitae, software engineer");
        assert_eq!(result.document_type, DocumentType::PropertyAgreement);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.source, ClassificationSource::Model);
    }

    #[test]
    fn test_inference_failure_uses_rules() {
        let classifier = DocumentClassifier::with_model(Box::new(FailingModel));
        assert!(classifier.is_model_loaded());

        let result = classifier.classify("Curriculum vitae, software engineer, 5 years experience");
        assert_eq!(result.document_type, DocumentType::Invalid);
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.source, ClassificationSource::Rules);
    }

    #[test]
    fn test_empty_text_skips_model() {
        let classifier = DocumentClassifier::with_model(Box::new(FixedModel("sale_deed")));
        let result = classifier.classify("");
        assert_eq!(result.document_type, DocumentType::Invalid);
        assert_eq!(result.source, ClassificationSource::Rules);
    }
}
