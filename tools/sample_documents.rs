//! Sample Document Generator
//!
//! Generates legitimate, forged and unrelated documents and runs them
//! through an in-process verification pipeline.
//!
//! Usage: sample-documents [count] [forged_rate] [unrelated_rate]

use document_verification_pipeline::{
    classifier::DocumentClassifier,
    config::AppConfig,
    extraction::TextExtractor,
    metrics::PipelineMetrics,
    types::{Document, RiskLevel},
    VerificationPipeline,
};
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

const CITIES: &[&str] = &["Pune", "Mumbai", "Bengaluru", "Delhi", "Hyderabad"];
const NAMES: &[&str] = &[
    "Asha Kulkarni",
    "Rohan Mehta",
    "Priya Nair",
    "Vikram Singh",
    "Meera Iyer",
    "Arjun Rao",
];

/// Sample document generator
struct DocumentGenerator {
    rng: rand::rngs::ThreadRng,
    document_counter: u64,
}

impl DocumentGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            document_counter: 0,
        }
    }

    /// Generate a complete, signed real estate document
    fn generate_legitimate(&mut self) -> String {
        self.document_counter += 1;
        match self.rng.gen_range(0..3) {
            0 => self.sale_deed(),
            1 => self.lease_agreement(),
            _ => self.rera_certificate(),
        }
    }

    /// Generate a document with forgery markers and missing elements
    fn generate_forged(&mut self) -> String {
        self.document_counter += 1;
        let city = self.random_choice(CITIES);
        let marker = self.random_choice(&[
            "This copy is void",
            "stamp duty not paid",
            "registration cancelled",
            "unauthorized reproduction",
        ]);
        format!(
            "SALE DEED (copy {}). Fake deed of sale for a plot in {}. {}. Consideration Rs. {}.",
            self.document_counter,
            city,
            marker,
            self.rng.gen_range(10..900)
        )
    }

    /// Generate a document unrelated to real estate
    fn generate_unrelated(&mut self) -> String {
        self.document_counter += 1;
        let name = self.random_choice(NAMES);
        match self.rng.gen_range(0..3) {
            0 => format!(
                "Curriculum vitae of {}. {} years of employment as a software engineer.",
                name,
                self.rng.gen_range(1..15)
            ),
            1 => format!(
                "Tax invoice #{} issued to {} for consulting services. Bill total payable on receipt.",
                self.document_counter, name
            ),
            _ => format!(
                "Medical prescription for {}: take one tablet twice daily for {} days.",
                name,
                self.rng.gen_range(3..14)
            ),
        }
    }

    fn sale_deed(&mut self) -> String {
        let seller = self.random_choice(NAMES);
        let buyer = self.random_choice(NAMES);
        let city = self.random_choice(CITIES);
        format!(
            "SALE DEED. This deed of sale is executed between {seller} (seller) and {buyer} \
             (buyer) before the Sub-Registrar, {city}. Plot No {plot}, Survey No {survey}. \
             Property address: {plot} Main Road, {city}. Consideration amount Rs. {amount} \
             paid in full. Stamp duty Rs. {duty} paid at registration. Signed by both parties.",
            plot = self.rng.gen_range(1..500),
            survey = self.rng.gen_range(1..300),
            amount = self.rng.gen_range(1_500_000..90_000_000),
            duty = self.rng.gen_range(50_000..900_000),
        )
    }

    fn lease_agreement(&mut self) -> String {
        let lessor = self.random_choice(NAMES);
        let lessee = self.random_choice(NAMES);
        let city = self.random_choice(CITIES);
        format!(
            "LEASE AGREEMENT between {lessor} (lessor) and {lessee} (lessee) for the premises \
             at {flat} Park Street, {city}. Monthly rent Rs. {rent}, security deposit Rs. \
             {deposit}. Lease period: {months} months. Signature of lessor and lessee affixed.",
            flat = self.rng.gen_range(1..200),
            rent = self.rng.gen_range(8_000..90_000),
            deposit = self.rng.gen_range(50_000..500_000),
            months = self.rng.gen_range(11..60),
        )
    }

    fn rera_certificate(&mut self) -> String {
        let state = self.random_choice(&["Maharashtra", "Karnataka", "Delhi"]);
        format!(
            "{state} RERA Registration Certificate issued by the Real Estate Regulatory \
             Authority. Certificate No: P{number:011}. This registration is granted for the \
             project under section 5. Signed by the Secretary.",
            number = self.rng.gen_range(10_000_000_000u64..99_999_999_999u64),
        )
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_documents=info".parse()?),
        )
        .init();

    info!("Starting Sample Document Generator");

    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(20);
    let forged_rate: f64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0.3);
    let unrelated_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.2);
    if !(0.0..=1.0).contains(&(forged_rate + unrelated_rate)) || forged_rate < 0.0 || unrelated_rate < 0.0 {
        anyhow::bail!("forged_rate and unrelated_rate must be non-negative and sum to at most 1");
    }

    info!(
        count = count,
        forged_rate = forged_rate,
        unrelated_rate = unrelated_rate,
        "Configuration loaded"
    );

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Using default configuration");
        AppConfig::default()
    });
    let metrics = Arc::new(PipelineMetrics::new());
    let pipeline = VerificationPipeline::new(
        TextExtractor::new(&config.extraction),
        DocumentClassifier::from_config(&config.models),
        config.detection.risk_levels.clone(),
        metrics.clone(),
    );

    let mut generator = DocumentGenerator::new();
    let mut rng = rand::thread_rng();
    let (mut legitimate, mut forged, mut unrelated) = (0u64, 0u64, 0u64);
    let mut flagged = 0u64;

    for i in 0..count {
        let roll: f64 = rng.gen();
        let (kind, text) = if roll < forged_rate {
            forged += 1;
            ("forged", generator.generate_forged())
        } else if roll < forged_rate + unrelated_rate {
            unrelated += 1;
            ("unrelated", generator.generate_unrelated())
        } else {
            legitimate += 1;
            ("legitimate", generator.generate_legitimate())
        };

        let record = pipeline.verify(&Document::from_text(text))?;
        if record.risk_level != RiskLevel::Low {
            flagged += 1;
        }

        info!(
            sample = i + 1,
            kind = kind,
            document_type = %record.document_type,
            confidence = format!("{:.2}", record.confidence),
            risk_score = record.risk_score,
            risk_level = record.risk_level.as_str(),
            issues = record.issues.len(),
            "Sample verified"
        );
    }

    info!(
        "Completed! Verified {} documents ({} legitimate, {} forged, {} unrelated), {} flagged",
        count, legitimate, forged, unrelated, flagged
    );
    metrics.print_summary();

    Ok(())
}
