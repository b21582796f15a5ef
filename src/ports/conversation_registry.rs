//! Conversation Registry Port - live chat sessions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::{ReportId, SessionId};

/// Shared handle to one session. The lock guards state transitions only;
/// an in-flight turn is tracked by the session's own turn state.
pub type SessionHandle = Arc<Mutex<ConversationSession>>;

#[async_trait]
pub trait ConversationRegistry: Send + Sync {
    /// Opens a new session over a report.
    async fn open(&self, report_id: ReportId) -> (SessionId, SessionHandle);

    async fn get(&self, id: &SessionId) -> Option<SessionHandle>;

    /// Closes a session. Returns whether it existed.
    async fn close(&self, id: &SessionId) -> bool;

    async fn len(&self) -> usize;
}
