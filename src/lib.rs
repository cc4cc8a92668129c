//! Document Verification Pipeline Library
//!
//! Extracts text from uploaded documents, classifies the document type with
//! a trained model or keyword rules, scores fraud risk heuristically and
//! keeps an in-memory verification history.

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extraction;
pub mod fraud;
pub mod hashing;
pub mod history;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod recorder;
pub mod types;

pub use classifier::DocumentClassifier;
pub use config::AppConfig;
pub use error::VerifyError;
pub use extraction::TextExtractor;
pub use fraud::FraudDetector;
pub use history::VerificationHistory;
pub use pipeline::VerificationPipeline;
pub use recorder::BlockchainRecorder;
pub use types::{Document, DocumentType, VerificationRecord};
