//! Route handlers

use crate::api::error::ApiError;
use crate::api::types::{
    HealthResponse, HistoryItemResponse, HistoryResponse, LedgerEntryResponse, ServiceInfo,
    VerificationResponse, VerifyTextRequest,
};
use crate::api::AppState;
use crate::error::VerifyError;
use crate::types::document::{extension_of, Document, MediaType};
use crate::types::record::VerificationRecord;
use axum::extract::multipart::Multipart;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, warn};

const ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /api/health",
    "POST /verify",
    "POST /api/verify-text",
    "POST /api/verify",
    "GET /verify/history",
    "GET /api/verify/history",
    "GET /verify/history/{id}",
    "GET /api/verify/history/{id}",
    "GET /api/blockchain/status",
    "GET /api/blockchain/records/{hash}",
];

pub async fn index(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        classifier: state.pipeline.classifier().strategy_name().to_string(),
        endpoints: ENDPOINTS.to_vec(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running".to_string(),
        model_loaded: state.pipeline.classifier().is_model_loaded(),
        blockchain_connected: state.recorder.is_connected(),
    })
}

/// Verify raw text sent as `{"certificate_text": ...}` or `{"text": ...}`
pub async fn verify_text(
    State(state): State<AppState>,
    payload: Result<Json<VerifyTextRequest>, JsonRejection>,
) -> Result<Json<VerificationResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected verification body");
        ApiError::bad_request("No JSON data provided")
    })?;

    let text = request.into_text().ok_or(VerifyError::MissingInput)?;
    if text.trim().is_empty() {
        return Err(VerifyError::EmptyText.into());
    }

    let record = run_verification(&state, Document::from_text(text)).await?;
    let tx_hash = anchor(&state, &record).await;
    Ok(Json(VerificationResponse::from_record(&record, tx_hash, None)))
}

/// Verify an uploaded file from the multipart field `file`
pub async fn verify_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<VerificationResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        upload = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = upload.ok_or(VerifyError::MissingInput)?;
    if filename.is_empty() {
        return Err(VerifyError::MissingInput.into());
    }

    let extension = extension_of(&filename).unwrap_or_default().to_ascii_lowercase();
    let media_type = MediaType::from_extension(&extension)
        .filter(|_| state.server.is_allowed_extension(&extension))
        .ok_or_else(|| VerifyError::UnsupportedExtension(extension.clone()))?;

    let limit = state.server.max_upload_bytes;
    if bytes.len() > limit {
        return Err(VerifyError::FileTooLarge {
            size: bytes.len(),
            limit,
        }
        .into());
    }

    let document = Document::from_file(bytes.to_vec(), media_type, filename);
    let record = run_verification(&state, document).await?;
    let tx_hash = anchor(&state, &record).await;
    Ok(Json(VerificationResponse::from_record(
        &record,
        tx_hash,
        Some(state.server.extracted_text_preview_chars),
    )))
}

pub async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let data = state.pipeline.history().list();
    Json(HistoryResponse {
        success: true,
        total: data.len(),
        data,
    })
}

pub async fn history_item(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<HistoryItemResponse>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::bad_request("Invalid verification id"))?;
    let record = state
        .pipeline
        .history()
        .get(id)
        .ok_or_else(|| ApiError::not_found("Verification not found"))?;
    Ok(Json(HistoryItemResponse {
        success: true,
        data: record,
    }))
}

pub async fn blockchain_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.recorder.network_info())
}

pub async fn blockchain_record(
    State(state): State<AppState>,
    Path(document_hash): Path<String>,
) -> Result<Json<LedgerEntryResponse>, ApiError> {
    let entry = state
        .recorder
        .lookup(&document_hash)
        .ok_or_else(|| ApiError::not_found("Record not found"))?;
    Ok(Json(LedgerEntryResponse {
        success: true,
        data: entry,
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

/// Replace axum's bare 405 with the JSON error envelope
pub async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return ApiError::method_not_allowed().into_response();
    }
    response
}

/// Run the blocking pipeline off the async runtime
async fn run_verification(
    state: &AppState,
    document: Document,
) -> Result<VerificationRecord, ApiError> {
    let pipeline = state.pipeline.clone();
    let record = tokio::task::spawn_blocking(move || pipeline.verify(&document))
        .await
        .map_err(|e| VerifyError::Internal(format!("verification task failed: {}", e)))??;
    Ok(record)
}

/// Best-effort blockchain recording; failures yield no transaction hash
async fn anchor(state: &AppState, record: &VerificationRecord) -> Option<String> {
    match state.recorder.record(record).await {
        Ok(tx_hash) => tx_hash,
        Err(e) => {
            warn!(
                verification_id = record.id,
                error = %e,
                "Failed to record verification on blockchain"
            );
            None
        }
    }
}
