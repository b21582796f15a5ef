//! HTTP DTOs for chat endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::handlers::AnswerQueryResult;
use crate::domain::report::ReportDocument;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Client-side copy of the report; replaces the stored one for this turn.
    #[serde(default)]
    pub document: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<ReportDocument>,
}

impl From<AnswerQueryResult> for ChatResponse {
    fn from(result: AnswerQueryResult) -> Self {
        Self {
            reply: result.reply,
            outcome: result.outcome,
            document: result.document,
        }
    }
}

/// One SSE `data:` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StreamPayload {
    /// Sent before the retrieval call on escalations.
    Pending { pending: bool },
    Content { content: String },
    Document { document: ReportDocument },
    Error { error: &'static str },
}

impl StreamPayload {
    pub fn pending() -> Self {
        Self::Pending { pending: true }
    }

    pub fn failed() -> Self {
        Self::Error {
            error: "Streaming failed",
        }
    }
}
