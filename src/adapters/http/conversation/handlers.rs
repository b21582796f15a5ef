//! HTTP handlers for conversation endpoints.
//!
//! A conversation is one open chat panel over a report. Turns run through
//! the session's state machine, so the session view always reflects the
//! loading flag, the placeholder, and suggestion visibility.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::report::parse_report_id;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{ChatTurnCommand, TurnOutcome};
use crate::domain::conversation::ConversationError;
use crate::domain::foundation::SessionId;
use crate::ports::SessionHandle;

use super::dto::{PostMessageRequest, SessionView, TurnResponse};

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("Invalid conversation ID format"))
}

async fn find_session(state: &AppState, raw: &str) -> Result<SessionHandle, ApiError> {
    let id = parse_session_id(raw)?;
    state
        .conversations
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Conversation not found: {}", id)))
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/reports/:id/conversations
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/reports/:id/conversations - Open a chat panel over a report.
pub async fn open_conversation(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let report_id = parse_report_id(&report_id)?;
    let (session_id, handle) = state.conversations.open(report_id.clone()).await;
    tracing::info!(session_id = %session_id, report_id = %report_id, "Conversation opened");

    let view = SessionView::from(&*handle.lock().await);
    Ok((StatusCode::CREATED, Json(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/conversations/:sid
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/conversations/:sid - Current session view.
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = find_session(&state, &session_id).await?;
    let view = SessionView::from(&*handle.lock().await);
    Ok(Json(view))
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/conversations/:sid/messages
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations/:sid/messages - Run one turn.
///
/// # Errors
/// - 400: empty message, or a suggestion that is out of range or hidden
/// - 404: unknown conversation
/// - 409: a turn is already in flight
pub async fn post_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<PostMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = find_session(&state, &session_id).await?;
    let cmd = match (req.message, req.suggestion) {
        (Some(message), _) => ChatTurnCommand::Message(message),
        (None, Some(index)) => ChatTurnCommand::Suggestion(index),
        (None, None) => return Err(ApiError::bad_request("Message is required")),
    };

    let outcome = state
        .turns
        .handle(&handle, cmd)
        .await
        .map_err(|err| match err {
            ConversationError::TurnInFlight => ApiError::Conflict(err.to_string()),
            ConversationError::InvalidTransition(_) => ApiError::Internal(err.to_string()),
            other => ApiError::bad_request(other.to_string()),
        })?;

    if outcome == TurnOutcome::Rejected {
        return Err(ApiError::Conflict(
            ConversationError::TurnInFlight.to_string(),
        ));
    }

    let view = SessionView::from(&*handle.lock().await);
    Ok(Json(TurnResponse::new(outcome, view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// DELETE /api/conversations/:sid
// ════════════════════════════════════════════════════════════════════════════════

/// DELETE /api/conversations/:sid - Close a chat panel.
pub async fn close_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_session_id(&session_id)?;
    if state.conversations.close(&id).await {
        tracing::info!(session_id = %id, "Conversation closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Conversation not found: {}", id)))
    }
}
