//! In-Memory Conversation Registry Adapter
//!
//! Holds one session per open chat panel. Each session sits behind its own
//! async mutex so a turn on one session never blocks another.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::{ReportId, SessionId};
use crate::ports::{ConversationRegistry, SessionHandle};

#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl InMemoryConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRegistry for InMemoryConversationRegistry {
    async fn open(&self, report_id: ReportId) -> (SessionId, SessionHandle) {
        let session = ConversationSession::new(report_id);
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, Arc::clone(&handle));
        (id, handle)
    }

    async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    async fn close(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
