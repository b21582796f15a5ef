//! In-Memory Document Store Adapter
//!
//! Process-lifetime report storage. Documents are replaced wholesale on
//! every `set`; nothing is ever patched in place.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::ReportId;
use crate::domain::report::ReportDocument;
use crate::ports::{CollaboratorError, DocumentStore};

/// In-memory keyed report storage
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<ReportId, ReportDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Clear all stored documents (useful for tests)
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, id: &ReportId) -> Result<Option<ReportDocument>, CollaboratorError> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn set(&self, id: &ReportId, document: ReportDocument) -> Result<(), CollaboratorError> {
        self.documents.write().await.insert(id.clone(), document);
        Ok(())
    }

    async fn remove(&self, id: &ReportId) -> Result<bool, CollaboratorError> {
        Ok(self.documents.write().await.remove(id).is_some())
    }

    async fn contains(&self, id: &ReportId) -> Result<bool, CollaboratorError> {
        Ok(self.documents.read().await.contains_key(id))
    }
}
