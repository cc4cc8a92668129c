//! Performance metrics and statistics tracking for the verification pipeline.

use crate::types::record::VerificationRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for pipeline performance
pub struct PipelineMetrics {
    /// Total documents verified
    pub verifications_processed: AtomicU64,
    /// Model inference failures answered by the keyword rules
    pub model_fallbacks: AtomicU64,
    /// Documents whose text had to be replaced by a placeholder
    pub extraction_failures: AtomicU64,
    /// Verifications by classified document type
    by_document_type: RwLock<HashMap<String, u64>>,
    /// Verifications by risk level
    by_risk_level: RwLock<HashMap<String, u64>>,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Risk score distribution buckets, 10 points wide
    score_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PipelineMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            verifications_processed: AtomicU64::new(0),
            model_fallbacks: AtomicU64::new(0),
            extraction_failures: AtomicU64::new(0),
            by_document_type: RwLock::new(HashMap::new()),
            by_risk_level: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a completed verification
    pub fn record_verification(&self, processing_time: Duration, record: &VerificationRecord) {
        self.verifications_processed.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = ((record.risk_score / 10.0) as usize).min(9);
        if let Ok(mut buckets) = self.score_buckets.write() {
            buckets[bucket] += 1;
        }

        if let Ok(mut by_type) = self.by_document_type.write() {
            *by_type
                .entry(record.document_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        if let Ok(mut by_level) = self.by_risk_level.write() {
            *by_level
                .entry(record.risk_level.as_str().to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn record_model_fallback(&self) {
        self.model_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_extraction_failure(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let sorted = match self.processing_times.read() {
            Ok(times) if !times.is_empty() => {
                let mut sorted = times.clone();
                sorted.sort_unstable();
                sorted
            }
            _ => return ProcessingStats::default(),
        };

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Get current throughput (verifications per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.verifications_processed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get score distribution
    pub fn get_score_distribution(&self) -> [u64; 10] {
        self.score_buckets.read().map(|b| *b).unwrap_or_default()
    }

    pub fn get_counts_by_document_type(&self) -> HashMap<String, u64> {
        self.by_document_type
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn get_counts_by_risk_level(&self) -> HashMap<String, u64> {
        self.by_risk_level
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let count = self.verifications_processed.load(Ordering::Relaxed);
        let fallbacks = self.model_fallbacks.load(Ordering::Relaxed);
        let extraction_failures = self.extraction_failures.load(Ordering::Relaxed);

        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();
        let by_type = self.get_counts_by_document_type();
        let by_level = self.get_counts_by_risk_level();
        let score_dist = self.get_score_distribution();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║       DOCUMENT VERIFICATION PIPELINE - METRICS SUMMARY       ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Documents Verified:     {:>8}  │  Throughput: {:>6.2} doc/s ║",
            count, throughput
        );
        info!(
            "║ Model Fallbacks:        {:>8}  │  Extraction Failures: {:>4} ║",
            fallbacks, extraction_failures
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Documents by Type:                                           ║");
        for (doc_type, n) in &by_type {
            info!("║   {:18}: {:>6} ({:>5.1}%)", doc_type, n, percent(*n, count));
        }
        info!("║ Documents by Risk Level:                                     ║");
        for (level, n) in &by_level {
            info!("║   {:18}: {:>6} ({:>5.1}%)", level, n, percent(*n, count));
        }
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Risk Score Distribution:                                     ║");
        let total: u64 = score_dist.iter().sum();
        for (i, &n) in score_dist.iter().enumerate() {
            let pct = percent(n, total);
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:>3}-{:<3}: {:>6} ({:>5.1}%) {}",
                i * 10,
                (i + 1) * 10,
                n,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        (part as f64 / whole as f64) * 100.0
    } else {
        0.0
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: Arc<PipelineMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<PipelineMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
