//! HTTP handlers for report endpoints.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{ReportLookup, ReportLookupError, UploadReportError};
use crate::domain::conversation::texts::STILL_PROCESSING;
use crate::domain::foundation::ReportId;
use crate::ports::UploadedFile;

use super::dto::{ProcessingResponse, UploadResponse};

/// Parses a path id; malformed ids are client errors.
pub(crate) fn parse_report_id(raw: &str) -> Result<ReportId, ApiError> {
    ReportId::new(raw).map_err(|_| ApiError::bad_request("Invalid report ID"))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/report/:id
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/report/:id - Fetch a report.
///
/// # Responses
/// - 200: the report document
/// - 202: the report is still being generated
/// - 404: unknown report
/// - 410: polling gave up; upload again
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let report_id = parse_report_id(&id)?;

    match state.lookup.handle(&report_id).await {
        Ok(ReportLookup::Found(document)) => Ok((StatusCode::OK, Json(document)).into_response()),
        Ok(ReportLookup::Processing) => Ok((
            StatusCode::ACCEPTED,
            Json(ProcessingResponse::new(report_id.as_str())),
        )
            .into_response()),
        Err(ReportLookupError::NotFound(id)) => Err(ApiError::report_not_found(id.as_str())),
        Err(ReportLookupError::StillProcessing(_)) => Err(ApiError::Gone(STILL_PROCESSING.to_string())),
        Err(ReportLookupError::Collaborator(err)) => Err(state.upstream(err)),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/upload
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/upload - Upload a PDF for processing.
///
/// Expects multipart form data with a `file` field.
///
/// # Errors
/// - 400: no file, wrong type, empty, or too large
/// - 502: the ingestion backend failed
pub async fn upload_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        file = Some(UploadedFile::new(filename, content_type, bytes.to_vec()));
        break;
    }
    let file = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;

    let result = state.uploads.handle(file).await.map_err(|err| match err {
        UploadReportError::Collaborator(err) => state.upstream(err),
        other => ApiError::bad_request(other.to_string()),
    })?;

    Ok((StatusCode::OK, Json(UploadResponse::from(result))))
}
