//! Report Source Port - fetches reports from the ingestion backend.

use async_trait::async_trait;

use crate::domain::foundation::ReportId;
use crate::domain::report::ReportDocument;

use super::CollaboratorError;

/// Result of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportAvailability {
    Ready(ReportDocument),
    /// The backend does not have the report (yet).
    NotReady,
}

#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch(&self, id: &ReportId) -> Result<ReportAvailability, CollaboratorError>;
}
