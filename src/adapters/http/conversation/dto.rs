//! HTTP DTOs for conversation endpoints.
//!
//! These types decouple the HTTP API from domain types.

use serde::{Deserialize, Serialize};

use crate::application::handlers::TurnOutcome;
use crate::domain::conversation::{ConversationSession, Message, MessageContent, Role};
use crate::domain::report::ReportDocument;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Either free text or the index of a suggested question.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub suggestion: Option<usize>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: String,
    pub role: &'static str,
    /// `None` while the message is the escalation placeholder.
    pub content: Option<String>,
    pub pending: bool,
    pub timestamp: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        let (content, pending) = match message.content() {
            MessageContent::Text(text) => (Some(text.clone()), false),
            MessageContent::AwaitingEscalation => (None, true),
        };
        Self {
            id: message.id().to_string(),
            role: match message.role() {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content,
            pending,
            timestamp: message.timestamp().to_rfc3339(),
        }
    }
}

/// Everything a chat panel renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub report_id: String,
    pub messages: Vec<MessageView>,
    pub loading: bool,
    pub input_enabled: bool,
    pub suggestions_visible: bool,
    pub suggestions: Vec<&'static str>,
    pub created_at: String,
}

impl From<&ConversationSession> for SessionView {
    fn from(session: &ConversationSession) -> Self {
        Self {
            id: session.id().to_string(),
            report_id: session.report_id().to_string(),
            messages: session.messages().iter().map(MessageView::from).collect(),
            loading: session.loading(),
            input_enabled: session.input_enabled(),
            suggestions_visible: session.suggestions_visible(),
            suggestions: if session.suggestions_visible() {
                session.suggestions().to_vec()
            } else {
                Vec::new()
            },
            created_at: session.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<ReportDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<&'static str>,
    pub session: SessionView,
}

impl TurnResponse {
    pub fn new(outcome: TurnOutcome, session: SessionView) -> Self {
        let kind = outcome.kind();
        let (changed, document, failure) = match outcome {
            TurnOutcome::Updated { changed, document } => (changed, Some(document), None),
            TurnOutcome::Failed { kind } => (Vec::new(), None, Some(kind)),
            TurnOutcome::Answered | TurnOutcome::Escalated | TurnOutcome::Rejected => {
                (Vec::new(), None, None)
            }
        };
        Self {
            outcome: kind,
            changed,
            document,
            failure,
            session,
        }
    }
}
