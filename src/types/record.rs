//! Classification, fraud assessment and verification record structures

use crate::types::document::{DocumentType, MediaType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk level banding of a fraud risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Determine risk level from a 0-100 score and thresholds.
    ///
    /// Bands are inclusive on the upper edge: a score equal to `low` is
    /// still `Low`.
    pub fn from_score(score: f64, thresholds: &RiskLevelThresholds) -> Self {
        if score <= thresholds.low {
            RiskLevel::Low
        } else if score <= thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Configurable risk level thresholds (upper bounds, inclusive)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskLevelThresholds {
    pub low: f64,
    pub medium: f64,
}

impl Default for RiskLevelThresholds {
    fn default() -> Self {
        Self {
            low: 30.0,
            medium: 70.0,
        }
    }
}

/// Which classification strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    Model,
    Rules,
}

/// Document type and confidence for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub document_type: DocumentType,
    /// Always within [0, 1]
    pub confidence: f64,
    pub source: ClassificationSource,
}

impl ClassificationResult {
    pub fn new(document_type: DocumentType, confidence: f64, source: ClassificationSource) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            document_type,
            confidence,
            source,
        }
    }
}

/// Heuristic fraud assessment of a document's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudAssessment {
    /// Sum of penalties clamped to [0, 100]
    pub risk_score: f64,
    /// Issues in detection order
    pub issues: Vec<String>,
}

impl FraudAssessment {
    pub fn risk_level(&self, thresholds: &RiskLevelThresholds) -> RiskLevel {
        RiskLevel::from_score(self.risk_score, thresholds)
    }
}

/// Overall outcome shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Genuine,
    Invalid,
}

impl From<RiskLevel> for Verdict {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Verdict::Genuine,
            RiskLevel::Medium | RiskLevel::High => Verdict::Invalid,
        }
    }
}

/// Outcome of a single verification call, kept in the in-memory history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// 1-based position in the verification history
    pub id: u64,

    /// Uploaded filename, absent for raw-text submissions
    pub filename: Option<String>,

    pub media_type: MediaType,

    pub document_type: DocumentType,

    /// Classifier confidence (0.0 - 1.0)
    pub confidence: f64,

    pub classification_source: ClassificationSource,

    /// Fraud risk score (0 - 100)
    pub risk_score: f64,

    pub risk_level: RiskLevel,

    pub issues: Vec<String>,

    /// "0x"-prefixed hex SHA-256 of the original content
    pub document_hash: String,

    pub extracted_text: String,

    pub extraction_method: String,

    pub result: Verdict,

    pub verified_at: DateTime<Utc>,
}

/// Everything needed for a record except the history position
#[derive(Debug, Clone)]
pub struct RecordDraft {
    pub filename: Option<String>,
    pub media_type: MediaType,
    pub classification: ClassificationResult,
    pub assessment: FraudAssessment,
    pub risk_level: RiskLevel,
    pub document_hash: String,
    pub extracted_text: String,
    pub extraction_method: String,
}

impl RecordDraft {
    /// Finalize the draft with its history id and the current time
    pub fn into_record(self, id: u64) -> VerificationRecord {
        VerificationRecord {
            id,
            filename: self.filename,
            media_type: self.media_type,
            document_type: self.classification.document_type,
            confidence: self.classification.confidence,
            classification_source: self.classification.source,
            risk_score: self.assessment.risk_score,
            risk_level: self.risk_level,
            issues: self.assessment.issues,
            document_hash: self.document_hash,
            extracted_text: self.extracted_text,
            extraction_method: self.extraction_method,
            result: self.risk_level.into(),
            verified_at: Utc::now(),
        }
    }
}
