use crate::dtos::{ExportRequest, ExportResponse};
use crate::error::AppError;
use crate::services::metrics::{
    EXPORT_FAILURES_TOTAL, EXPORT_REQUESTS_TOTAL, EXPORT_SUCCESS_TOTAL,
};
use crate::services::DOCX_MIME_TYPE;
use crate::startup::AppState;
use axum::{extract::State, Json};
use chrono::Utc;

/// Export a document as .docx and relay it to public blob storage.
///
/// The three upstream steps (token, export, upload) run strictly in
/// sequence; the upload only starts once the export is fully buffered, so a
/// failed upload leaves nothing behind to clean up.
pub async fn export_document(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<ExportResponse>, AppError> {
    metrics::counter!(EXPORT_REQUESTS_TOTAL).increment(1);

    if request.doc_id.is_empty() {
        return Err(AppError::BadRequest("docId is required".to_string()));
    }
    let doc_id = request.doc_id;

    tracing::info!(doc_id = %doc_id, "Document export requested");

    let data = state.exporter.export_docx(&doc_id).await.map_err(|e| {
        tracing::error!(doc_id = %doc_id, stage = e.stage(), error = %e, "Document export failed");
        metrics::counter!(EXPORT_FAILURES_TOTAL, "stage" => e.stage()).increment(1);
        AppError::from(e)
    })?;

    let key = storage_key(&doc_id);
    let blob = state
        .blob
        .put(&key, data, DOCX_MIME_TYPE)
        .await
        .map_err(|e| {
            tracing::error!(doc_id = %doc_id, key = %key, stage = e.stage(), error = %e, "Blob upload failed");
            metrics::counter!(EXPORT_FAILURES_TOTAL, "stage" => e.stage()).increment(1);
            AppError::from(e)
        })?;

    metrics::counter!(EXPORT_SUCCESS_TOTAL).increment(1);
    tracing::info!(doc_id = %doc_id, key = %key, url = %blob.url, "Document export completed");

    Ok(Json(ExportResponse {
        download_url: blob.url,
    }))
}

/// Fallback for non-POST methods on the export route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Storage key for one export: the docId plus the current millisecond
/// timestamp. Uniqueness across repeated exports of the same document is
/// best-effort; two requests within the same millisecond could collide.
fn storage_key(doc_id: &str) -> String {
    format!("{}-{}.docx", doc_id, Utc::now().timestamp_millis())
}
