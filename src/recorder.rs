//! Blockchain anchoring of verification results.
//!
//! Recording is best effort: callers log failures and report a null
//! transaction hash.

use crate::config::{BlockchainConfig, BlockchainMode};
use crate::hashing::document_hash;
use crate::types::document::DocumentType;
use crate::types::record::{Verdict, VerificationRecord};
use anyhow::Result;
use async_nats::Client;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Connection summary for the status endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInfo {
    pub connected: bool,
    pub network: String,
}

/// One anchored verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub document_hash: String,
    pub tx_hash: String,
    pub block_number: u64,
    pub verification_id: u64,
    pub document_type: DocumentType,
    pub risk_score: f64,
    pub result: Verdict,
    pub recorded_at: DateTime<Utc>,
}

#[async_trait]
pub trait BlockchainRecorder: Send + Sync {
    /// Anchor `record`; returns the transaction hash when one is known
    async fn record(&self, record: &VerificationRecord) -> Result<Option<String>>;

    fn is_connected(&self) -> bool;

    fn network_info(&self) -> NetworkInfo;

    /// Entry previously recorded for a document hash
    fn lookup(&self, _document_hash: &str) -> Option<LedgerEntry> {
        None
    }
}

/// Recorder used when anchoring is turned off
#[derive(Debug, Default)]
pub struct DisabledRecorder;

#[async_trait]
impl BlockchainRecorder for DisabledRecorder {
    async fn record(&self, _record: &VerificationRecord) -> Result<Option<String>> {
        Ok(None)
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn network_info(&self) -> NetworkInfo {
        NetworkInfo {
            connected: false,
            network: "disabled".to_string(),
        }
    }
}

/// In-process ledger issuing deterministic transaction hashes
pub struct SimulatedLedger {
    network: String,
    entries: Mutex<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    by_hash: HashMap<String, LedgerEntry>,
    next_block: u64,
}

impl SimulatedLedger {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            entries: Mutex::new(LedgerState::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|s| s.by_hash.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// sha256(document hash ‖ big-endian nonce)
fn simulated_tx_hash(document_hash_hex: &str, nonce: u64) -> String {
    let mut input = document_hash_hex.as_bytes().to_vec();
    input.extend_from_slice(&nonce.to_be_bytes());
    document_hash(&input)
}

#[async_trait]
impl BlockchainRecorder for SimulatedLedger {
    async fn record(&self, record: &VerificationRecord) -> Result<Option<String>> {
        let mut state = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("ledger lock poisoned"))?;

        // Content already anchored keeps its original transaction
        if let Some(existing) = state.by_hash.get(&record.document_hash) {
            debug!(document_hash = %record.document_hash, tx_hash = %existing.tx_hash, "Document already anchored");
            return Ok(Some(existing.tx_hash.clone()));
        }

        let block_number = state.next_block + 1;
        state.next_block = block_number;

        let entry = LedgerEntry {
            document_hash: record.document_hash.clone(),
            tx_hash: simulated_tx_hash(&record.document_hash, block_number),
            block_number,
            verification_id: record.id,
            document_type: record.document_type,
            risk_score: record.risk_score,
            result: record.result,
            recorded_at: Utc::now(),
        };
        let tx_hash = entry.tx_hash.clone();
        state.by_hash.insert(entry.document_hash.clone(), entry);

        debug!(
            verification_id = record.id,
            tx_hash = %tx_hash,
            block_number = block_number,
            "Recorded verification on simulated ledger"
        );
        Ok(Some(tx_hash))
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn network_info(&self) -> NetworkInfo {
        NetworkInfo {
            connected: true,
            network: self.network.clone(),
        }
    }

    fn lookup(&self, document_hash: &str) -> Option<LedgerEntry> {
        self.entries
            .lock()
            .ok()
            .and_then(|state| state.by_hash.get(document_hash).cloned())
    }
}

/// Anchoring request handed to the external anchoring service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorRequest {
    pub request_id: Uuid,
    pub verification_id: u64,
    pub document_hash: String,
    pub document_type: DocumentType,
    pub risk_score: f64,
    pub result: Verdict,
    pub requested_at: DateTime<Utc>,
}

impl AnchorRequest {
    pub fn from_record(record: &VerificationRecord) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            verification_id: record.id,
            document_hash: record.document_hash.clone(),
            document_type: record.document_type,
            risk_score: record.risk_score,
            result: record.result,
            requested_at: Utc::now(),
        }
    }
}

/// Publishes anchoring requests to a NATS subject.
///
/// The anchoring service answers asynchronously, so no transaction hash is
/// returned.
#[derive(Clone)]
pub struct NatsRecorder {
    client: Client,
    subject: String,
    network: String,
}

impl NatsRecorder {
    pub fn new(client: Client, subject: &str, network: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
            network: network.to_string(),
        }
    }

    pub async fn connect(config: &BlockchainConfig) -> Result<Self> {
        let client = async_nats::connect(&config.nats_url).await?;
        info!(url = %config.nats_url, subject = %config.subject, "Connected to NATS");
        Ok(Self::new(client, &config.subject, &config.network_name))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[async_trait]
impl BlockchainRecorder for NatsRecorder {
    async fn record(&self, record: &VerificationRecord) -> Result<Option<String>> {
        let request = AnchorRequest::from_record(record);
        let payload = serde_json::to_vec(&request)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            request_id = %request.request_id,
            verification_id = record.id,
            document_hash = %record.document_hash,
            "Published anchoring request"
        );

        Ok(None)
    }

    fn is_connected(&self) -> bool {
        self.client.connection_state() == async_nats::connection::State::Connected
    }

    fn network_info(&self) -> NetworkInfo {
        NetworkInfo {
            connected: self.is_connected(),
            network: self.network.clone(),
        }
    }
}

/// Build the recorder for the configured mode.
///
/// An unreachable NATS server disables recording rather than failing start-up.
pub async fn build_recorder(config: &BlockchainConfig) -> Arc<dyn BlockchainRecorder> {
    match config.mode {
        BlockchainMode::Disabled => {
            info!("Blockchain recording disabled");
            Arc::new(DisabledRecorder)
        }
        BlockchainMode::Simulated => {
            info!(network = %config.network_name, "Using simulated blockchain ledger");
            Arc::new(SimulatedLedger::new(config.network_name.clone()))
        }
        BlockchainMode::Nats => match NatsRecorder::connect(config).await {
            Ok(recorder) => Arc::new(recorder),
            Err(e) => {
                warn!(url = %config.nats_url, error = %e, "Failed to connect to NATS, blockchain recording disabled");
                Arc::new(DisabledRecorder)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::is_document_hash;
    use crate::types::document::MediaType;
    use crate::types::record::{
        ClassificationResult, ClassificationSource, FraudAssessment, RecordDraft, RiskLevel,
    };

    fn record(id: u64, text: &str) -> VerificationRecord {
        RecordDraft {
            filename: None,
            media_type: MediaType::Text,
            classification: ClassificationResult::new(
                DocumentType::SaleDeed,
                0.5,
                ClassificationSource::Rules,
            ),
            assessment: FraudAssessment {
                risk_score: 10.0,
                issues: vec![],
            },
            risk_level: RiskLevel::Low,
            document_hash: document_hash(text.as_bytes()),
            extracted_text: text.to_string(),
            extraction_method: "direct".to_string(),
        }
        .into_record(id)
    }

    #[tokio::test]
    async fn test_simulated_ledger_records_and_looks_up() {
        let ledger = SimulatedLedger::new("simulated");
        let first = record(1, "sale deed one");

        let tx = ledger.record(&first).await.unwrap().unwrap();
        assert!(is_document_hash(&tx));
        assert_eq!(tx, simulated_tx_hash(&first.document_hash, 1));

        let entry = ledger.lookup(&first.document_hash).unwrap();
        assert_eq!(entry.tx_hash, tx);
        assert_eq!(entry.verification_id, 1);
        assert_eq!(entry.block_number, 1);
        assert!(ledger.lookup("0xmissing").is_none());
    }

    #[tokio::test]
    async fn test_same_document_keeps_its_transaction() {
        let ledger = SimulatedLedger::new("simulated");
        let tx1 = ledger.record(&record(1, "same text")).await.unwrap();
        let tx2 = ledger.record(&record(2, "same text")).await.unwrap();
        let tx3 = ledger.record(&record(3, "other text")).await.unwrap();

        assert_eq!(tx1, tx2);
        assert_ne!(tx1, tx3);
        assert_eq!(ledger.len(), 2);
    }

    #[tokio::test]
    async fn test_disabled_recorder() {
        let recorder = DisabledRecorder;
        assert_eq!(recorder.record(&record(1, "x")).await.unwrap(), None);
        assert!(!recorder.is_connected());
        assert_eq!(recorder.network_info().network, "disabled");
    }

    #[tokio::test]
    async fn test_build_recorder_modes() {
        let mut config = BlockchainConfig::default();
        assert!(!build_recorder(&config).await.is_connected());

        config.mode = BlockchainMode::Simulated;
        config.network_name = "testnet".to_string();
        let recorder = build_recorder(&config).await;
        assert_eq!(
            recorder.network_info(),
            NetworkInfo {
                connected: true,
                network: "testnet".to_string()
            }
        );
    }

    #[test]
    fn test_anchor_request_serialization() {
        let request = AnchorRequest::from_record(&record(7, "deed"));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["verification_id"], 7);
        assert_eq!(json["document_type"], "sale_deed");
        assert_eq!(json["result"], "Genuine");
    }
}
