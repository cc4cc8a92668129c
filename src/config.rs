//! Configuration management for the verification service

use crate::types::record::RiskLevelThresholds;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where verification hashes are recorded
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlockchainMode {
    /// No recording; `blockchain_tx_hash` is always null
    #[default]
    Disabled,
    /// In-process ledger that issues deterministic transaction hashes
    Simulated,
    /// Forward anchoring requests to a NATS subject
    Nats,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    pub detection: DetectionConfig,
    #[serde(default)]
    pub blockchain: BlockchainConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Accepted file extensions (lowercase, no dot)
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    /// Characters of extracted text echoed back for file uploads
    #[serde(default = "default_preview_chars")]
    pub extracted_text_preview_chars: usize,
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    ["txt", "pdf", "png", "jpg", "jpeg", "gif", "bmp", "tiff"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_preview_chars() -> usize {
    500
}

impl ServerConfig {
    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        let extension = extension.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|e| *e == extension)
    }
}

/// Trained classifier artifacts
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Disable to force the rule-based classifier
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Directory containing the model artifacts
    pub models_dir: String,
    #[serde(default = "default_model_file")]
    pub model_file: String,
    #[serde(default = "default_vectorizer_file")]
    pub vectorizer_file: String,
    #[serde(default = "default_labels_file")]
    pub labels_file: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_true() -> bool {
    true
}

fn default_model_file() -> String {
    "classifier.onnx".to_string()
}

fn default_vectorizer_file() -> String {
    "vectorizer.json".to_string()
}

fn default_labels_file() -> String {
    "labels.json".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

impl ModelsConfig {
    pub fn model_path(&self) -> PathBuf {
        Path::new(&self.models_dir).join(&self.model_file)
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        Path::new(&self.models_dir).join(&self.vectorizer_file)
    }

    pub fn labels_path(&self) -> PathBuf {
        Path::new(&self.models_dir).join(&self.labels_file)
    }
}

/// Text extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Tesseract executable used for image OCR
    pub tesseract_binary: String,
    /// Tesseract language code
    pub ocr_language: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tesseract_binary: "tesseract".to_string(),
            ocr_language: "eng".to_string(),
        }
    }
}

/// Detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Risk level classification thresholds
    #[serde(default)]
    pub risk_levels: RiskLevelThresholds,
}

/// Blockchain recorder configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BlockchainConfig {
    #[serde(default)]
    pub mode: BlockchainMode,
    /// NATS server URL (nats mode)
    pub nats_url: String,
    /// Subject anchoring requests are published to (nats mode)
    pub subject: String,
    /// Network name reported by the status endpoint
    pub network_name: String,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            mode: BlockchainMode::Disabled,
            nats_url: "nats://localhost:4222".to_string(),
            subject: "verifications.anchor".to_string(),
            network_name: "simulated".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between periodic summaries; 0 disables the reporter
    pub report_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: 300,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file plus environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path.
    ///
    /// Values can be overridden with `DOCVERIFY__SECTION__KEY` environment
    /// variables, e.g. `DOCVERIFY__SERVER__PORT=8080`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("DOCVERIFY").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_upload_bytes: default_max_upload_bytes(),
                allowed_extensions: default_allowed_extensions(),
                extracted_text_preview_chars: default_preview_chars(),
            },
            models: ModelsConfig {
                enabled: true,
                models_dir: "models".to_string(),
                model_file: default_model_file(),
                vectorizer_file: default_vectorizer_file(),
                labels_file: default_labels_file(),
                onnx_threads: 1,
            },
            extraction: ExtractionConfig::default(),
            detection: DetectionConfig {
                risk_levels: RiskLevelThresholds::default(),
            },
            blockchain: BlockchainConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            metrics: MetricsConfig::default(),
        }
    }
}
