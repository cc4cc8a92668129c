//! HTTP API integration tests driving the router in-process.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use document_verification_pipeline::api::types::{
    HealthResponse, HistoryItemResponse, HistoryResponse, VerificationResponse,
};
use document_verification_pipeline::api::{router, AppState};
use document_verification_pipeline::classifier::DocumentClassifier;
use document_verification_pipeline::config::{AppConfig, ServerConfig};
use document_verification_pipeline::extraction::TextExtractor;
use document_verification_pipeline::metrics::PipelineMetrics;
use document_verification_pipeline::recorder::{BlockchainRecorder, DisabledRecorder, SimulatedLedger};
use document_verification_pipeline::VerificationPipeline;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "X-DOCVERIFY-BOUNDARY";

const RERA_TEXT: &str = "Maharashtra RERA Registration Certificate. Certificate No: P52100000001. \
    This registration is granted to the promoter for the project under section 5. \
    Signed by the Secretary, Real Estate Regulatory Authority.";

// ============================================================================
// Test Helpers
// ============================================================================

fn server_config() -> ServerConfig {
    let mut server = AppConfig::default().server;
    server.max_upload_bytes = 1024;
    server
}

fn app_with_recorder(recorder: Arc<dyn BlockchainRecorder>) -> Router {
    let config = AppConfig::default();
    let pipeline = VerificationPipeline::new(
        TextExtractor::new(&config.extraction),
        DocumentClassifier::rule_based(),
        config.detection.risk_levels.clone(),
        Arc::new(PipelineMetrics::new()),
    );
    router(AppState::new(Arc::new(pipeline), recorder, server_config()))
}

fn app() -> Router {
    app_with_recorder(Arc::new(DisabledRecorder))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_file(filename: &str, contents: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/verify")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();
    for uri in ["/health", "/api/health"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_value(body).unwrap();
        assert_eq!(health.status, "running");
        assert!(!health.model_loaded);
        assert!(!health.blockchain_connected);
    }
}

#[tokio::test]
async fn test_index_lists_endpoints() {
    let (status, body) = send(&app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classifier"], "keyword_rules");
    assert!(body["endpoints"].as_array().unwrap().len() >= 10);
}

// ============================================================================
// Text verification
// ============================================================================

#[tokio::test]
async fn test_verify_text() {
    let app = app();
    let (status, body) = send(&app, post_json("/verify", json!({ "certificate_text": RERA_TEXT }))).await;
    assert_eq!(status, StatusCode::OK);

    let response: VerificationResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.status, "rera_certificate");
    assert_eq!(response.ml_document_type, "rera_certificate");
    assert_eq!(response.verification_id, 1);
    assert_eq!(response.risk_level, "Low");
    assert_eq!(response.result, "Genuine");
    assert!(response.fraud_risk < 30.0);
    assert_eq!(response.ml_confidence, 71.43);
    assert_eq!(response.document_hash.len(), 66);
    assert_eq!(response.extracted_text, RERA_TEXT);
    assert_eq!(response.blockchain_tx_hash, None);
}

#[tokio::test]
async fn test_verify_text_alias_and_field() {
    let app = app();
    let text = "fake forged sale deed, stamp duty not paid, no registration";
    let (status, body) = send(&app, post_json("/api/verify-text", json!({ "text": text }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ml_document_type"], "sale_deed");
    assert_eq!(body["risk_level"], "High");
    assert_eq!(body["result"], "Invalid");
}

#[tokio::test]
async fn test_verify_text_errors() {
    let app = app();

    let (status, body) = send(&app, post_json("/verify", json!({ "certificate_text": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No text provided");

    let (status, body) = send(&app, post_json("/verify", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file or text provided");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/verify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No JSON data provided");
}

// ============================================================================
// File verification
// ============================================================================

#[tokio::test]
async fn test_verify_text_file_upload() {
    let app = app_with_recorder(Arc::new(SimulatedLedger::new("testnet")));
    let contents = "Lease agreement between the lessor and the lessee for the premises. \
                    Rent Rs. 25,000 per month, security deposit Rs. 1,00,000, lease period \
                    eleven months. Signed by both parties.";
    let (status, body) = send(&app, post_file("lease.txt", contents.as_bytes())).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let response: VerificationResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.filename.as_deref(), Some("lease.txt"));
    assert_eq!(response.ml_document_type, "lease_agreement");
    assert!(response.blockchain_tx_hash.is_some());

    let hash = response.document_hash.clone();
    let (status, body) = send(&app, get(&format!("/api/blockchain/records/{}", hash))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verification_id"], 1);

    let (status, body) = send(&app, get("/api/blockchain/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "connected": true, "network": "testnet" }));
}

#[tokio::test]
async fn test_uploaded_text_is_truncated() {
    let app = app();
    let contents = format!("Sale deed signed. {}", "x".repeat(700));
    let (status, body) = send(&app, post_file("long.txt", contents.as_bytes())).await;
    // 718 bytes is under the 1024 byte test limit
    assert_eq!(status, StatusCode::OK);
    let text = body["extracted_text"].as_str().unwrap();
    assert_eq!(text.chars().count(), 503);
    assert!(text.ends_with("..."));
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = app();

    let (status, body) = send(&app, post_file("malware.exe", b"MZ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File type not allowed: exe");

    let (status, body) = send(&app, post_file("big.txt", &vec![b'a'; 2048])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File too large: 2048 bytes (limit 1024 bytes)");

    let (status, body) = send(&app, post_file("blank.txt", b"  \n ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Could not extract text from document");
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_history() {
    let app = app();
    for text in ["first lease document", "second sale deed", "third rera certificate"] {
        let (status, _) = send(&app, post_json("/verify", json!({ "text": text }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get("/api/verify/history")).await;
    assert_eq!(status, StatusCode::OK);
    let history: HistoryResponse = serde_json::from_value(body).unwrap();
    assert!(history.success);
    assert_eq!(history.total, 3);
    let ids: Vec<u64> = history.data.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let (status, body) = send(&app, get("/api/verify/history/2")).await;
    assert_eq!(status, StatusCode::OK);
    let item: HistoryItemResponse = serde_json::from_value(body).unwrap();
    assert_eq!(item.data.extracted_text, "second sale deed");

    let (status, body) = send(&app, get("/api/verify/history/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Verification not found");

    let (status, body) = send(&app, get("/verify/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let (status, body) = send(&app, get("/verify/history/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["extracted_text"], "first lease document");

    let (status, body) = send(&app, get("/verify/history/9")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Verification not found");
}

// ============================================================================
// Error envelope
// ============================================================================

#[tokio::test]
async fn test_unknown_endpoint_and_method() {
    let app = app();

    let (status, body) = send(&app, get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");

    let (status, body) = send(&app, get("/verify")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");

    let (status, body) = send(&app, get("/api/blockchain/records/0xabc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Record not found");
}
