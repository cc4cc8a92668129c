//! Verification pipeline: extraction, classification, fraud scoring, hashing
//! and history recording for a single document.

use crate::classifier::DocumentClassifier;
use crate::config::AppConfig;
use crate::error::VerifyError;
use crate::extraction::TextExtractor;
use crate::fraud::FraudDetector;
use crate::hashing::document_hash;
use crate::history::VerificationHistory;
use crate::metrics::PipelineMetrics;
use crate::types::document::Document;
use crate::types::record::{
    ClassificationSource, RecordDraft, RiskLevelThresholds, VerificationRecord,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runs documents through every verification stage and keeps the history
pub struct VerificationPipeline {
    extractor: TextExtractor,
    classifier: DocumentClassifier,
    fraud_detector: FraudDetector,
    history: VerificationHistory,
    thresholds: RiskLevelThresholds,
    metrics: Arc<PipelineMetrics>,
}

impl VerificationPipeline {
    pub fn new(
        extractor: TextExtractor,
        classifier: DocumentClassifier,
        thresholds: RiskLevelThresholds,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            extractor,
            classifier,
            fraud_detector: FraudDetector::new(),
            history: VerificationHistory::new(),
            thresholds,
            metrics,
        }
    }

    /// Build every stage from configuration; loads the classifier model if enabled
    pub fn from_config(config: &AppConfig, metrics: Arc<PipelineMetrics>) -> Self {
        Self::new(
            TextExtractor::new(&config.extraction),
            DocumentClassifier::from_config(&config.models),
            config.detection.risk_levels.clone(),
            metrics,
        )
    }

    /// Verify one document and append the result to the history.
    ///
    /// Runs synchronously; extraction may shell out to OCR.
    pub fn verify(&self, document: &Document) -> Result<VerificationRecord, VerifyError> {
        let start_time = Instant::now();

        let extraction = self.extractor.extract(document);
        if extraction.is_placeholder() {
            self.metrics.record_extraction_failure();
        }
        if extraction.text.trim().is_empty() {
            return Err(VerifyError::NoExtractableText);
        }

        let classification = self.classifier.classify(&extraction.text);
        if self.classifier.is_model_loaded() && classification.source == ClassificationSource::Rules
        {
            self.metrics.record_model_fallback();
        }

        let assessment = self.fraud_detector.analyze(&extraction.text);
        let risk_level = assessment.risk_level(&self.thresholds);
        let hash = document_hash(document.hash_input());

        debug!(
            document_type = %classification.document_type,
            confidence = classification.confidence,
            source = ?classification.source,
            risk_score = assessment.risk_score,
            "Document scored"
        );

        let record = self.history.append(RecordDraft {
            filename: document.filename.clone(),
            media_type: document.media_type,
            classification,
            assessment,
            risk_level,
            document_hash: hash,
            extracted_text: extraction.text,
            extraction_method: extraction.method.as_str().to_string(),
        });

        let processing_time = start_time.elapsed();
        self.metrics.record_verification(processing_time, &record);

        info!(
            verification_id = record.id,
            document_type = %record.document_type,
            risk_score = record.risk_score,
            risk_level = record.risk_level.as_str(),
            processing_time_us = processing_time.as_micros() as u64,
            "Document verified"
        );

        Ok(record)
    }

    pub fn history(&self) -> &VerificationHistory {
        &self.history
    }

    pub fn classifier(&self) -> &DocumentClassifier {
        &self.classifier
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }
}
