//! Request and response bodies

use crate::recorder::LedgerEntry;
use crate::types::record::VerificationRecord;
use serde::{Deserialize, Serialize};

/// Raw-text verification request; `certificate_text` wins when both are set
#[derive(Debug, Default, Deserialize)]
pub struct VerifyTextRequest {
    pub certificate_text: Option<String>,
    pub text: Option<String>,
}

impl VerifyTextRequest {
    pub fn into_text(self) -> Option<String> {
        self.certificate_text.or(self.text)
    }
}

/// Result of a single verification
#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationResponse {
    /// Classified document type
    pub status: String,
    pub ml_document_type: String,
    /// Classifier confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Classifier confidence as a percentage, two decimals
    pub ml_confidence: f64,
    /// Fraud risk score (0 - 100)
    pub fraud_risk: f64,
    pub risk_level: String,
    pub issues: Vec<String>,
    pub document_hash: String,
    pub verification_id: u64,
    pub extracted_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub blockchain_tx_hash: Option<String>,
    pub result: String,
    pub message: String,
}

impl VerificationResponse {
    /// Build from a stored record; `preview_chars` truncates the echoed text
    pub fn from_record(
        record: &VerificationRecord,
        blockchain_tx_hash: Option<String>,
        preview_chars: Option<usize>,
    ) -> Self {
        let extracted_text = match preview_chars {
            Some(limit) => truncate_preview(&record.extracted_text, limit),
            None => record.extracted_text.clone(),
        };
        let document_type = record.document_type.as_str().to_string();
        let ml_confidence = (record.confidence * 100.0 * 100.0).round() / 100.0;

        Self {
            message: format!(
                "Document classified as {} with {:.2}% confidence",
                document_type, ml_confidence
            ),
            status: document_type.clone(),
            ml_document_type: document_type,
            confidence: record.confidence,
            ml_confidence,
            fraud_risk: record.risk_score,
            risk_level: record.risk_level.as_str().to_string(),
            issues: record.issues.clone(),
            document_hash: record.document_hash.clone(),
            verification_id: record.id,
            extracted_text,
            filename: record.filename.clone(),
            blockchain_tx_hash,
            result: format!("{:?}", record.result),
        }
    }
}

/// First `limit` characters followed by "..." when the text is longer
pub fn truncate_preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub blockchain_connected: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub data: Vec<VerificationRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryItemResponse {
    pub success: bool,
    pub data: VerificationRecord,
}

#[derive(Debug, Serialize)]
pub struct LedgerEntryResponse {
    pub success: bool,
    pub data: LedgerEntry,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub classifier: String,
    pub endpoints: Vec<&'static str>,
}
