//! Document Store Port - keyed storage of report documents.
//!
//! Owned by the composition root and shared by reference. Process-lifetime
//! only; there is no eviction.

use async_trait::async_trait;

use crate::domain::foundation::ReportId;
use crate::domain::report::ReportDocument;

use super::CollaboratorError;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the document, or `None` if nothing is stored under the id.
    async fn get(&self, id: &ReportId) -> Result<Option<ReportDocument>, CollaboratorError>;

    /// Stores (or replaces wholesale) the document for an id.
    async fn set(&self, id: &ReportId, document: ReportDocument) -> Result<(), CollaboratorError>;

    /// Removes a document. Returns whether one was stored.
    async fn remove(&self, id: &ReportId) -> Result<bool, CollaboratorError>;

    async fn contains(&self, id: &ReportId) -> Result<bool, CollaboratorError> {
        Ok(self.get(id).await?.is_some())
    }
}
