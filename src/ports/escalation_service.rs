//! Escalation Service Port - retrieval-augmented answers.
//!
//! Consulted only when routing decides the report cannot answer a query.

use async_trait::async_trait;

use crate::domain::report::ReportDocument;

use super::CollaboratorError;

#[async_trait]
pub trait EscalationService: Send + Sync {
    /// Answers the query with the report as context.
    async fn retrieve(
        &self,
        query: &str,
        document: &ReportDocument,
    ) -> Result<String, CollaboratorError>;
}
