//! Keyword-rule document classification

use crate::types::document::DocumentType;

/// Declared label order; ties on score go to the earlier entry
const LABEL_KEYWORDS: &[(DocumentType, &[&str])] = &[
    (
        DocumentType::ReraCertificate,
        &[
            "rera",
            "real estate regulatory authority",
            "certificate",
            "registration",
            "maharashtra rera",
            "karnataka rera",
            "delhi rera",
        ],
    ),
    (
        DocumentType::SaleDeed,
        &[
            "sale deed",
            "deed of sale",
            "conveyance deed",
            "property deed",
            "stamp duty",
            "sub-registrar",
            "registration",
            "plot no",
            "survey no",
        ],
    ),
    (
        DocumentType::LeaseAgreement,
        &[
            "lease agreement",
            "rental agreement",
            "tenancy agreement",
            "lessor",
            "lessee",
            "landlord",
            "tenant",
            "rent",
        ],
    ),
    (
        DocumentType::PropertyAgreement,
        &[
            "property agreement",
            "development agreement",
            "construction agreement",
            "builder agreement",
            "real estate",
        ],
    ),
];

const UNRELATED_KEYWORDS: &[&str] = &[
    "resume",
    "cv",
    "curriculum vitae",
    "job",
    "employment",
    "tax invoice",
    "bill",
    "ticket",
    "receipt",
];

/// Confidence at or below which a rule match is not trusted
const LOW_CONFIDENCE: f64 = 0.3;

const UNRELATED_CONFIDENCE: f64 = 0.8;
const UNKNOWN_CONFIDENCE: f64 = 0.1;

/// Keyword-table classifier used when no model is loaded or inference fails
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `text` by counting label keywords it contains.
    ///
    /// Confidence is the fraction of the winning label's keywords present.
    pub fn classify(&self, text: &str) -> (DocumentType, f64) {
        let lowered = text.to_lowercase();

        let mut best: Option<(DocumentType, usize, usize)> = None;
        for (label, keywords) in LABEL_KEYWORDS {
            let score = count_matches(&lowered, keywords);
            match best {
                Some((_, best_score, _)) if best_score >= score => {}
                _ => best = Some((*label, score, keywords.len())),
            }
        }

        let (label, confidence) = match best {
            Some((label, score, total)) if total > 0 => {
                (label, (score as f64 / total as f64).min(1.0))
            }
            _ => (DocumentType::Unknown, 0.0),
        };

        if confidence <= LOW_CONFIDENCE {
            if count_matches(&lowered, UNRELATED_KEYWORDS) > 0 {
                return (DocumentType::Invalid, UNRELATED_CONFIDENCE);
            }
            return (DocumentType::Unknown, UNKNOWN_CONFIDENCE);
        }

        (label, confidence)
    }
}

fn count_matches(lowered: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lowered.contains(*k)).count()
}
