//! Type definitions for the verification pipeline

pub mod document;
pub mod record;

pub use document::{Document, DocumentContent, DocumentType, MediaType};
pub use record::{
    ClassificationResult, ClassificationSource, FraudAssessment, RecordDraft, RiskLevel,
    RiskLevelThresholds, Verdict, VerificationRecord,
};
