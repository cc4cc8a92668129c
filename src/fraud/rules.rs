//! Fraud heuristic tables and penalties

use once_cell::sync::Lazy;
use regex::Regex;

pub const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "fake",
    "forgery",
    "invalid",
    "suspicious",
    "fraudulent",
    "not paid",
    "missing",
    "no valid",
    "warning",
    "red flags",
    "void",
    "cancelled",
    "expired",
    "unauthorized",
    "illegal",
];

pub const UNRELATED_KEYWORDS: &[&str] = &[
    "resume",
    "cv",
    "curriculum vitae",
    "job",
    "employment",
    "tax invoice",
    "bill",
    "ticket",
    "receipt",
    "medical",
    "prescription",
];

pub const SIGNATURE_MARKERS: &[&str] = &["signature", "signed"];

pub const SUSPICIOUS_KEYWORD_PENALTY: f64 = 15.0;
pub const MISSING_ELEMENT_PENALTY: f64 = 10.0;
pub const UNRELATED_PENALTY: f64 = 50.0;
pub const TOO_SHORT_PENALTY: f64 = 20.0;
pub const NO_SIGNATURE_PENALTY: f64 = 10.0;
pub const AMOUNT_PENALTY: f64 = 10.0;

/// Trimmed documents shorter than this many characters are penalised
pub const MIN_CONTENT_CHARS: usize = 50;

pub const MIN_PLAUSIBLE_AMOUNT: f64 = 1_000.0;
pub const MAX_PLAUSIBLE_AMOUNT: f64 = 1_000_000_000.0;

pub const MAX_RISK_SCORE: f64 = 100.0;

/// Rupee amounts written as `Rs. 12,34,000` or `Rs.500.50`
pub static AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\brs\.\s*([0-9][0-9,]*(?:\.[0-9]+)?)").expect("amount pattern is valid")
});

/// Document families the detector knows required elements for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferredType {
    SaleDeed,
    LeaseAgreement,
    ReraCertificate,
    Unknown,
}

impl InferredType {
    /// First family whose markers appear in the lower-cased text
    pub fn infer(lowered: &str) -> Self {
        const MARKERS: &[(InferredType, &[&str])] = &[
            (
                InferredType::SaleDeed,
                &["sale deed", "deed of sale", "conveyance deed"],
            ),
            (
                InferredType::LeaseAgreement,
                &["lease", "rental agreement", "tenancy"],
            ),
            (
                InferredType::ReraCertificate,
                &["rera", "real estate regulatory authority"],
            ),
        ];

        MARKERS
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| lowered.contains(m)))
            .map(|(kind, _)| *kind)
            .unwrap_or(InferredType::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::SaleDeed => "sale_deed",
            InferredType::LeaseAgreement => "lease_agreement",
            InferredType::ReraCertificate => "rera_certificate",
            InferredType::Unknown => "unknown",
        }
    }

    pub fn required_elements(&self) -> &'static [&'static str] {
        match self {
            InferredType::SaleDeed => &[
                "stamp duty",
                "registration",
                "sub-registrar",
                "plot no",
                "survey no",
                "property address",
                "consideration amount",
                "seller",
                "buyer",
            ],
            InferredType::LeaseAgreement => &[
                "lessor",
                "lessee",
                "rent",
                "lease period",
                "security deposit",
                "premises",
            ],
            InferredType::ReraCertificate => &["rera", "registration", "certificate no"],
            InferredType::Unknown => &[],
        }
    }
}

/// Parse every `Rs.` amount in `text`; unparseable matches are skipped
pub fn extract_amounts(text: &str) -> Vec<f64> {
    AMOUNT_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .collect()
}
