//! HTTP handlers for stateless chat endpoints.

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::report::parse_report_id;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{AnswerQueryCommand, AnswerQueryError};
use crate::domain::report::ReportDocument;

use super::dto::{ChatRequest, ChatResponse};

/// Validates the request body into a command.
pub(super) fn to_command(id: &str, req: ChatRequest) -> Result<AnswerQueryCommand, ApiError> {
    let report_id = parse_report_id(id)?;
    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Message is required"))?;

    let mut cmd = AnswerQueryCommand::new(report_id, message);
    if let Some(document) = req.document {
        let document = ReportDocument::from_value(document)
            .map_err(|e| ApiError::bad_request(format!("Invalid document: {}", e)))?;
        cmd = cmd.with_document(document);
    }
    Ok(cmd)
}

pub(super) fn map_error(state: &AppState, err: AnswerQueryError) -> ApiError {
    match err {
        AnswerQueryError::EmptyMessage => ApiError::bad_request("Message is required"),
        AnswerQueryError::ReportNotFound(id) => ApiError::report_not_found(id.as_str()),
        AnswerQueryError::Router(_) | AnswerQueryError::Collaborator(_) => state.upstream(err),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/chat/:id
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat/:id - Ask a question about (or request a change to) a report.
///
/// # Errors
/// - 400: missing message or malformed document
/// - 404: unknown report
/// - 502: generation or retrieval failed; `reply` carries the apology
pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = to_command(&id, req)?;
    let result = state
        .answers
        .handle(cmd)
        .await
        .map_err(|e| map_error(&state, e))?;
    Ok(Json(ChatResponse::from(result)))
}
