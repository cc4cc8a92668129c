//! Heuristic fraud detection over extracted document text.
//!
//! Penalties are applied in a fixed order and summed; issues are reported in
//! the same order. The final score is clamped to 0-100.

pub mod rules;

use crate::types::record::FraudAssessment;
use rules::{
    extract_amounts, InferredType, AMOUNT_PENALTY, MAX_PLAUSIBLE_AMOUNT, MAX_RISK_SCORE,
    MIN_CONTENT_CHARS, MIN_PLAUSIBLE_AMOUNT, MISSING_ELEMENT_PENALTY, NO_SIGNATURE_PENALTY,
    SIGNATURE_MARKERS, SUSPICIOUS_KEYWORDS, SUSPICIOUS_KEYWORD_PENALTY, TOO_SHORT_PENALTY,
    UNRELATED_KEYWORDS, UNRELATED_PENALTY,
};
use tracing::debug;

/// Keyword and structure based fraud scorer
#[derive(Debug, Default, Clone, Copy)]
pub struct FraudDetector;

impl FraudDetector {
    pub fn new() -> Self {
        Self
    }

    /// Score `text` for fraud risk. Never fails.
    pub fn analyze(&self, text: &str) -> FraudAssessment {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return FraudAssessment {
                risk_score: MAX_RISK_SCORE,
                issues: vec!["Empty document".to_string()],
            };
        }

        let lowered = text.to_lowercase();
        let mut issues = Vec::new();
        let mut score = 0.0;

        for term in SUSPICIOUS_KEYWORDS.iter().filter(|k| lowered.contains(*k)) {
            issues.push(format!("Contains suspicious keyword: '{}'", term));
            score += SUSPICIOUS_KEYWORD_PENALTY;
        }

        let inferred = InferredType::infer(&lowered);
        for element in inferred
            .required_elements()
            .iter()
            .filter(|e| !lowered.contains(*e))
        {
            issues.push(format!(
                "Missing required element for {}: '{}'",
                inferred.as_str(),
                element
            ));
            score += MISSING_ELEMENT_PENALTY;
        }

        if UNRELATED_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            issues.push("Document appears unrelated to real estate".to_string());
            score += UNRELATED_PENALTY;
        }

        if trimmed.chars().count() < MIN_CONTENT_CHARS {
            issues.push("Document content too short".to_string());
            score += TOO_SHORT_PENALTY;
        }

        if !SIGNATURE_MARKERS.iter().any(|m| lowered.contains(m)) {
            issues.push("No signature found".to_string());
            score += NO_SIGNATURE_PENALTY;
        }

        let amounts = extract_amounts(text);
        if amounts.iter().any(|a| *a < MIN_PLAUSIBLE_AMOUNT) {
            issues.push("Suspiciously low amount mentioned".to_string());
            score += AMOUNT_PENALTY;
        }
        if amounts.iter().any(|a| *a > MAX_PLAUSIBLE_AMOUNT) {
            issues.push("Unrealistically high amount mentioned".to_string());
            score += AMOUNT_PENALTY;
        }

        let risk_score = f64::min(score, MAX_RISK_SCORE).max(0.0);
        debug!(
            inferred_type = inferred.as_str(),
            risk_score = risk_score,
            issues = issues.len(),
            "Fraud analysis complete"
        );

        FraudAssessment { risk_score, issues }
    }
}
