//! HTTP error responses.
//!
//! Every failure renders as `{ "error": <code>, "message": <text> }`.
//! Upstream failures always show the fixed apology to the user.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::conversation::texts::APOLOGY;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    /// Chat clients render this in place of an answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Only populated when verbose errors are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            report_id: None,
            reply: None,
            details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    NotFound {
        message: String,
        report_id: Option<String>,
    },
    /// A turn is already in flight for the session.
    Conflict(String),
    /// Polling gave up on the report.
    Gone(String),
    /// A collaborator (model, backend, retrieval, store) failed.
    Upstream { details: Option<String> },
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn report_not_found(report_id: impl Into<String>) -> Self {
        Self::NotFound {
            message: "Report not found".to_string(),
            report_id: Some(report_id.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            report_id: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Gone(_) => StatusCode::GONE,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ErrorResponse {
        match self {
            ApiError::BadRequest(msg) => ErrorResponse::new("bad_request", msg),
            ApiError::NotFound { message, report_id } => ErrorResponse {
                report_id,
                ..ErrorResponse::new("not_found", message)
            },
            ApiError::Conflict(msg) => ErrorResponse::new("conflict", msg),
            ApiError::Gone(msg) => ErrorResponse::new("still_processing", msg),
            ApiError::Upstream { details } => ErrorResponse {
                reply: Some(APOLOGY.to_string()),
                details,
                ..ErrorResponse::new("upstream_failed", APOLOGY)
            },
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse::new("internal_error", "An internal error occurred")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}
