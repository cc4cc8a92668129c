//! Document Verification Service - Main Entry Point
//!
//! Serves the verification HTTP API: text extraction, document
//! classification, fraud scoring and optional blockchain anchoring.

use anyhow::{Context, Result};
use document_verification_pipeline::{
    api::{self, AppState},
    config::{AppConfig, LoggingConfig},
    metrics::{MetricsReporter, PipelineMetrics},
    recorder::build_recorder,
    VerificationPipeline,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config/config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_source) = load_config()?;
    init_tracing(&config.logging)?;

    info!("Starting Document Verification Service");
    info!(source = %config_source, "Configuration loaded");
    info!(
        "Risk levels: low<={:.0}, medium<={:.0}, high above",
        config.detection.risk_levels.low, config.detection.risk_levels.medium
    );

    let metrics = Arc::new(PipelineMetrics::new());

    // Model loading reads artifacts from disk and initializes ONNX Runtime
    let pipeline = {
        let config = config.clone();
        let metrics = metrics.clone();
        tokio::task::spawn_blocking(move || VerificationPipeline::from_config(&config, metrics))
            .await
            .context("Pipeline initialization panicked")?
    };
    info!(
        classifier = pipeline.classifier().strategy_name(),
        model_loaded = pipeline.classifier().is_model_loaded(),
        "Verification pipeline initialized"
    );

    let recorder = build_recorder(&config.blockchain).await;
    info!(network = ?recorder.network_info(), "Blockchain recorder ready");

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let state = AppState::new(Arc::new(pipeline), recorder, config.server.clone());
    let app = api::router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "Listening for verification requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

/// Load the configuration file, falling back to built-in defaults when absent
fn load_config() -> Result<(AppConfig, String)> {
    if Path::new(CONFIG_PATH).exists() {
        Ok((AppConfig::load()?, CONFIG_PATH.to_string()))
    } else {
        Ok((AppConfig::default(), "defaults".to_string()))
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "document_verification_pipeline={level},tower_http={level}",
            level = logging.level
        ))
    })?;

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    match logging.format.as_str() {
        "json" => builder.json().init(),
        "pretty" => builder.init(),
        other => {
            builder.init();
            warn!(format = %other, "Unknown log format, using pretty output");
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
